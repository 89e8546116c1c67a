use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::object::Object;

/// A scope of bindings chained to the scope it was created in. Clones share
/// the same scope.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

struct EnvironmentData {
    values: HashMap<String, Object>,
    enclosing: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Binds `name` in this scope only, replacing an earlier binding of the
    /// same scope and shadowing any in the enclosing ones.
    pub fn set(&self, name: String, value: Object) {
        self.env_ptr.borrow_mut().values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let env_data = self.env_ptr.borrow();
        match env_data.values.get(name) {
            Some(obj) => Some(obj.clone()),
            None => env_data.enclosing.as_ref().and_then(|env| env.get(name)),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
