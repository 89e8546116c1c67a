use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeResult, Unwind};
use super::interpreter::Interpreter;
use super::object::Object;
use crate::frontend::grammar::FuncInfo;

use std::fmt;
use std::io::Write;
use std::rc::Rc;

pub struct MonkeyFnData {
    func_info: Rc<FuncInfo>,
    closure: Environment,
}

/// A function literal closed over the environment it was evaluated in.
#[derive(Clone)]
pub struct MonkeyFn(Rc<MonkeyFnData>);

impl MonkeyFn {
    pub fn new(func_info: Rc<FuncInfo>, closure: Environment) -> Self {
        let data = MonkeyFnData { func_info, closure };
        MonkeyFn(Rc::new(data))
    }

    pub fn arity(&self) -> usize {
        self.0.func_info.params.len()
    }

    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        if args.len() != self.arity() {
            return Err(RuntimeError::WrongArity {
                want: self.arity(),
                got: args.len(),
            });
        }

        // Parameters live in a fresh scope chained to the closure, not to the caller.
        let env = Environment::with_enclosing(&self.0.closure);
        for (param, arg) in self.0.func_info.params.iter().zip(args.into_iter()) {
            env.set(param.name.clone(), arg);
        }

        let prev_env = interpreter.swap_env(env);
        let result = match interpreter.eval_block(&self.0.func_info.body) {
            Ok(object) => Ok(object),
            Err(Unwind::Return(object)) => Ok(object),
            Err(Unwind::Error(e)) => Err(e),
        };

        interpreter.swap_env(prev_env);
        result
    }
}

impl fmt::Debug for MonkeyFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<function/{}>", self.arity())
    }
}

impl fmt::Display for MonkeyFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.func_info)
    }
}

impl PartialEq<MonkeyFn> for MonkeyFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MonkeyFn {}
