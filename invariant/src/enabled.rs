use std::sync::Arc;

use indexmap::IndexMap;

use crate::{error::InvariantError, invariant::Invariant, registry::InvariantRegistry};

/// Registered invariants that are actually evaluated.
///
/// Evaluation order is enable order.
#[derive(Default)]
pub struct EnabledSet {
    invariants: IndexMap<String, Arc<dyn Invariant>>,
}

impl EnabledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a registered invariant, appending it to the evaluation order
    pub fn enable(&mut self, registry: &InvariantRegistry, name: &str) -> Result<(), InvariantError> {
        let invariant = registry.lookup(name)?;
        if self.invariants.contains_key(name) {
            return Err(InvariantError::AlreadyEnabled(name.to_owned()));
        }

        self.invariants.insert(name.to_owned(), Arc::clone(invariant));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.invariants.contains_key(name)
    }

    /// Enabled invariants in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Invariant>> + '_ {
        self.invariants.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.invariants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
