use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::lang::interpreter::RuntimeError;
use crate::lang::value::Value;

#[cfg(test)]
mod tests;

/// What assigning to a name that is bound nowhere in the chain does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssignPolicy {
    /// Create the binding in the innermost environment (implicit declaration).
    #[default]
    DefineInnermost,
    /// Fail with an undefined-variable error.
    Strict,
}

#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
    policy: AssignPolicy,
}

impl Environment {
    pub fn new_global(policy: AssignPolicy) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: None,
            policy,
        }))
    }

    /// A child environment inherits the parent's assign policy.
    pub fn new_with_parent(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        let policy = parent.borrow().policy;

        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(parent),
            policy,
        }))
    }

    pub fn policy(&self) -> AssignPolicy {
        self.policy
    }

    /// Binds `name` in this environment, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(value) => Some(value.clone()),
            None => self.enclosing.as_ref().and_then(|enclosing| enclosing.borrow().get(name)),
        }
    }

    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.values.contains_key(name)
            || self.enclosing.as_ref().map(|enclosing| enclosing.borrow().has_variable(name)).unwrap_or(false)
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let value = match self.assign_existing(name, value) {
            Some(value) => value,
            None => return Ok(()),
        };

        match self.policy {
            AssignPolicy::DefineInnermost => {
                self.define(name, value);
                Ok(())
            },
            AssignPolicy::Strict => Err(RuntimeError::UndefinedVariable(name.to_owned())),
        }
    }

    /// Updates the nearest existing binding. Hands the value back if there is none.
    fn assign_existing(&mut self, name: &str, value: Value) -> Option<Value> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return None;
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign_existing(name, value),
            None => Some(value),
        }
    }
}
