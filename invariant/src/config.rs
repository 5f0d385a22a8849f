use serde::{Deserialize, Serialize};

// Log target used for every invariant diagnostic
pub const LOG_TARGET: &str = "invariant";

// Operation-apply checks were introduced with ledger protocol version 8
// Below it the checkpoint is skipped, which is not a failure
pub const OPERATION_APPLY_MIN_LEDGER_VERSION: u32 = 8;

// Violation counters are namespaced as <domain>/<kind>/<invariant name>
pub const METRIC_DOMAIN: &str = "invariant";
pub const METRIC_KIND_DOES_NOT_HOLD: &str = "does-not-hold";

// Name under which violation counters are exported to the global recorder
pub const METRIC_INVARIANT_DOES_NOT_HOLD: &str = "tos_invariant_does_not_hold";

/// Invariant checks configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
pub struct InvariantConfig {
    /// Invariants to enable at start-up, by name.
    ///
    /// They are evaluated in the order given here.
    /// Every name must match a registered invariant.
    #[clap(name = "invariant-checks", long, value_delimiter = ',')]
    #[serde(default)]
    pub invariant_checks: Vec<String>,
}

impl InvariantConfig {
    pub fn new(invariant_checks: Vec<String>) -> Self {
        Self { invariant_checks }
    }

    /// Check if any invariant should be enabled.
    pub fn has_checks(&self) -> bool {
        !self.invariant_checks.is_empty()
    }
}
