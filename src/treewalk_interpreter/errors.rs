use super::object::{Object, ObjectType};
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Error)]
pub enum RuntimeError {
    #[error("infix operator {op} works only with integers. Got {left}{op}{right}")]
    IllegalInfixOperation {
        op: InfixOperator,
        left: ObjectType,
        right: ObjectType,
    },
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        op: InfixOperator,
        left: ObjectType,
        right: ObjectType,
    },
    #[error("unknown operator: {op}{operand}")]
    IllegalPrefixOperation {
        op: PrefixOperator,
        operand: ObjectType,
    },
    #[error("identifier not found: {0}")]
    UndefinedIdentifier(String),
    #[error("not a function: {0}")]
    NotCallable(ObjectType),
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArity { want: usize, got: usize },
    #[error("argument to `{name}` not supported, got {got}")]
    UnsupportedArgument { name: &'static str, got: ObjectType },
    #[error("argument to `{name}` must be {want}, got {got}")]
    WrongArgumentType {
        name: &'static str,
        want: ObjectType,
        got: ObjectType,
    },
    #[error("index operator not supported: {collection}[{index}]")]
    IllegalIndexOperation {
        collection: ObjectType,
        index: ObjectType,
    },
    #[error("division by zero")]
    DivideByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("failed to write output: {0}")]
    Output(String),
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Output(err.to_string())
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Non-local exits out of an evaluation step. `Return` travels up to the
/// nearest function call (or the program root), `Error` all the way up.
#[derive(Debug, PartialEq, Clone)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

pub type EvalResult<T> = Result<T, Unwind>;
