//! Scope chain and binding management.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// Chained scope record. Lookup walks the outer chain; writes always land in
/// the local frame, so rebinding a name from an enclosing scope shadows it
/// rather than mutating it.
#[derive(Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            bindings: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        self.bindings.get(name).cloned().or_else(|| {
            self.outer.as_ref().and_then(|outer| outer.borrow().get(name))
        })
    }

    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.bindings.insert(name.into(), value);
    }
}
