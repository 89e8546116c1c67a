mod environment;
mod errors;
mod function;
mod interpreter;
mod native_function;
mod object;

pub use environment::Environment;
pub use errors::RuntimeError;
pub use interpreter::{Interpreter, DEFAULT_MAX_DEPTH};
pub use object::{Object, ObjectType};
