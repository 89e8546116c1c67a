use super::errors::{RuntimeError, RuntimeResult};
use super::object::{Object, ObjectType, NULL};

use std::fmt;
use std::io::Write;
use std::rc::Rc;

type FnType = fn(Vec<Object>, &mut dyn Write) -> RuntimeResult<Object>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

pub struct NativeFnData {
    pub func: FnType,
    pub arity: Arity,
    pub name: &'static str,
}

static NATIVE_FUNCS: [NativeFnData; 6] = [
    NativeFnData {
        func: len,
        arity: Arity::Fixed(1),
        name: "len",
    },
    NativeFnData {
        func: first,
        arity: Arity::Fixed(1),
        name: "first",
    },
    NativeFnData {
        func: last,
        arity: Arity::Fixed(1),
        name: "last",
    },
    NativeFnData {
        func: rest,
        arity: Arity::Fixed(1),
        name: "rest",
    },
    NativeFnData {
        func: push,
        arity: Arity::Fixed(2),
        name: "push",
    },
    NativeFnData {
        func: puts,
        arity: Arity::Variadic,
        name: "puts",
    },
];

/// Built-ins live in a static table, so a handle is just a reference into it.
#[derive(Clone, Copy)]
pub struct NativeFn(&'static NativeFnData);

impl NativeFn {
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    pub fn execute(&self, args: Vec<Object>, out: &mut dyn Write) -> RuntimeResult<Object> {
        match self.0.arity {
            Arity::Fixed(arity) if arity != args.len() => Err(RuntimeError::WrongArity {
                want: arity,
                got: args.len(),
            }),
            _ => (self.0.func)(args, out),
        }
    }
}

pub fn lookup_native_func(name: &str) -> Option<NativeFn> {
    NATIVE_FUNCS
        .iter()
        .find(|data| data.name == name)
        .map(NativeFn)
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native-func {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // Function pointers don't compare reliably, the table entries do.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for NativeFn {}

fn expect_array(name: &'static str, arg: &Object) -> RuntimeResult<Rc<Vec<Object>>> {
    match arg {
        Object::Array(elements) => Ok(elements.clone()),
        other => Err(RuntimeError::UnsupportedArgument {
            name,
            got: other.object_type(),
        }),
    }
}

fn len(args: Vec<Object>, _out: &mut dyn Write) -> RuntimeResult<Object> {
    match &args[0] {
        Object::String(s) => Ok(Object::Integer(s.len() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(RuntimeError::UnsupportedArgument {
            name: "len",
            got: other.object_type(),
        }),
    }
}

fn first(args: Vec<Object>, _out: &mut dyn Write) -> RuntimeResult<Object> {
    let elements = expect_array("first", &args[0])?;
    Ok(elements.first().cloned().unwrap_or(NULL))
}

fn last(args: Vec<Object>, _out: &mut dyn Write) -> RuntimeResult<Object> {
    let elements = expect_array("last", &args[0])?;
    Ok(elements.last().cloned().unwrap_or(NULL))
}

fn rest(args: Vec<Object>, _out: &mut dyn Write) -> RuntimeResult<Object> {
    let elements = expect_array("rest", &args[0])?;
    match elements.split_first() {
        Some((_, tail)) => Ok(Object::array(tail.to_vec())),
        None => Ok(NULL),
    }
}

fn push(mut args: Vec<Object>, _out: &mut dyn Write) -> RuntimeResult<Object> {
    let elements = match &args[0] {
        Object::Array(elements) => elements.clone(),
        other => {
            return Err(RuntimeError::WrongArgumentType {
                name: "push",
                want: ObjectType::Array,
                got: other.object_type(),
            })
        }
    };
    let value = args.swap_remove(1);

    let mut new_elements = Vec::with_capacity(elements.len() + 1);
    new_elements.extend(elements.iter().cloned());
    new_elements.push(value);

    Ok(Object::array(new_elements))
}

fn puts(args: Vec<Object>, out: &mut dyn Write) -> RuntimeResult<Object> {
    for arg in args.iter() {
        writeln!(out, "{}", arg)?;
    }
    Ok(NULL)
}
