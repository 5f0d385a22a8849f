use thiserror::Error;

/// Errors raised while wiring invariants at start-up.
///
/// These are configuration errors: the caller must fix its setup and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("Invariant {0} already registered")]
    DuplicateRegistration(String),

    #[error("Invariant {name} is not registered.{}", describe_registered(.registered))]
    NotRegistered {
        name: String,
        /// Names registered at the time of the failed lookup, in sorted order
        registered: Vec<String>,
    },

    #[error("Invariant {0} already enabled")]
    AlreadyEnabled(String),
}

fn describe_registered(registered: &[String]) -> String {
    if registered.is_empty() {
        " There are no registered invariants".to_owned()
    } else {
        format!(" Registered invariants are: {}", registered.join(", "))
    }
}

/// A strict invariant was violated.
///
/// Continuing would operate on corrupted or unverified ledger state: the
/// caller must abort the ledger operation in progress and halt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct InvariantDoesNotHold {
    message: String,
}

impl InvariantDoesNotHold {
    pub fn new(message: String) -> Self {
        Self { message }
    }

    /// Full diagnostic of the violation
    pub fn message(&self) -> &str {
        &self.message
    }
}
