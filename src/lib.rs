pub mod frontend;
mod stack;
pub mod treewalk_interpreter;
