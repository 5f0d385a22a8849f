use std::{collections::BTreeMap, sync::Arc};

use crate::{error::InvariantError, invariant::Invariant};

/// Every invariant known to the process, keyed by name.
///
/// Entries are never removed or replaced once registered.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: BTreeMap<String, Arc<dyn Invariant>>,
}

impl InvariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an invariant under its name.
    /// Fails if the name is taken, leaving the existing entry in place.
    pub fn register(&mut self, invariant: Arc<dyn Invariant>) -> Result<(), InvariantError> {
        let name = invariant.name();
        if self.invariants.contains_key(name) {
            return Err(InvariantError::DuplicateRegistration(name.to_owned()));
        }

        self.invariants.insert(name.to_owned(), invariant);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Invariant>> {
        self.invariants.get(name)
    }

    /// Resolve a name, describing every registered invariant on failure
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Invariant>, InvariantError> {
        self.get(name).ok_or_else(|| InvariantError::NotRegistered {
            name: name.to_owned(),
            registered: self.names().map(str::to_owned).collect(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.invariants.contains_key(name)
    }

    /// Registered names in sorted order
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
