use super::errors::{RuntimeError, RuntimeResult};
use super::function::MonkeyFn;
use super::native_function::NativeFn;
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use std::fmt;
use std::rc::Rc;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ObjectType {
    Integer,
    String,
    Boolean,
    Null,
    Array,
    Function,
    Builtin,
    Error,
}

/// Runtime values. Arrays are immutable once built, so they are shared
/// rather than copied when bound to several names.
#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    Array(Rc<Vec<Object>>),
    Function(MonkeyFn),
    Builtin(NativeFn),
    Error(RuntimeError),
}

impl Object {
    pub fn from_native_bool(value: bool) -> Object {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn array(elements: Vec<Object>) -> Object {
        Object::Array(Rc::new(elements))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::String(_) => ObjectType::String,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    /// The `==` of the language. Integers and strings compare by value, the
    /// boolean and null singletons by which singleton they are, and every
    /// other object by identity.
    pub fn values_equal(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => a == b,
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            _ => false,
        }
    }

    pub fn apply_infix_op(op: InfixOperator, lhs: Object, rhs: Object) -> RuntimeResult<Object> {
        match op {
            InfixOperator::Add => match (lhs, rhs) {
                (Object::String(a), Object::String(b)) => Ok(Object::String(a + &b)),
                (lhs, rhs) if is_string(&lhs) || is_string(&rhs) => {
                    Err(RuntimeError::TypeMismatch {
                        op,
                        left: lhs.object_type(),
                        right: rhs.object_type(),
                    })
                }
                (lhs, rhs) => checked_binop(op, lhs, rhs, i64::checked_add),
            },
            InfixOperator::Subtract => checked_binop(op, lhs, rhs, i64::checked_sub),
            InfixOperator::Multiply => checked_binop(op, lhs, rhs, i64::checked_mul),
            InfixOperator::Divide => match (lhs, rhs) {
                (Object::Integer(_), Object::Integer(0)) => Err(RuntimeError::DivideByZero),
                (lhs, rhs) => checked_binop(op, lhs, rhs, i64::checked_div),
            },
            InfixOperator::EqualTo => Ok(Object::from_native_bool(lhs.values_equal(&rhs))),
            InfixOperator::NotEqualTo => Ok(Object::from_native_bool(!lhs.values_equal(&rhs))),
            InfixOperator::GreaterThan => comparison_binop(op, lhs, rhs, |a, b| a > b),
            InfixOperator::LessThan => comparison_binop(op, lhs, rhs, |a, b| a < b),
        }
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Object) -> RuntimeResult<Object> {
        match op {
            PrefixOperator::Negate => match value {
                Object::Integer(n) => n
                    .checked_neg()
                    .map(Object::Integer)
                    .ok_or(RuntimeError::IntegerOverflow),
                _ => Err(RuntimeError::IllegalPrefixOperation {
                    op,
                    operand: value.object_type(),
                }),
            },
            PrefixOperator::LogicalNot => Ok(Object::from_native_bool(!value.is_truthy())),
        }
    }

    /// Out of range indices give null rather than an error.
    pub fn index(collection: &Object, index: &Object) -> RuntimeResult<Object> {
        match (collection, index) {
            (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
                .ok()
                .and_then(|i| elements.get(i))
                .cloned()
                .unwrap_or(NULL)),
            _ => Err(RuntimeError::IllegalIndexOperation {
                collection: collection.object_type(),
                index: index.object_type(),
            }),
        }
    }
}

fn is_string(object: &Object) -> bool {
    matches!(object, Object::String(_))
}

fn checked_binop<F>(op: InfixOperator, lhs: Object, rhs: Object, func: F) -> RuntimeResult<Object>
where
    F: Fn(i64, i64) -> Option<i64>,
{
    match (lhs, rhs) {
        (Object::Integer(a), Object::Integer(b)) => func(a, b)
            .map(Object::Integer)
            .ok_or(RuntimeError::IntegerOverflow),
        (a, b) => Err(illegal_infix(op, &a, &b)),
    }
}

fn comparison_binop<F>(op: InfixOperator, lhs: Object, rhs: Object, func: F) -> RuntimeResult<Object>
where
    F: Fn(i64, i64) -> bool,
{
    match (lhs, rhs) {
        (Object::Integer(a), Object::Integer(b)) => Ok(Object::from_native_bool(func(a, b))),
        (a, b) => Err(illegal_infix(op, &a, &b)),
    }
}

fn illegal_infix(op: InfixOperator, lhs: &Object, rhs: &Object) -> RuntimeError {
    RuntimeError::IllegalInfixOperation {
        op,
        left: lhs.object_type(),
        right: rhs.object_type(),
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::String => "STRING",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{}", n),
            Object::String(s) => f.write_str(s),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::Null => f.write_str("null"),
            Object::Array(elements) => {
                let elements: Vec<_> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Object::Function(func) => write!(f, "{}", func),
            Object::Builtin(func) => write!(f, "builtin function {}", func.name()),
            Object::Error(err) => write!(f, "{}", err),
        }
    }
}
