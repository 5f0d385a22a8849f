use std::fmt::{self, Display, Formatter};

use metrics::{counter, describe_counter, Counter, Unit};

use crate::config::{METRIC_DOMAIN, METRIC_INVARIANT_DOES_NOT_HOLD, METRIC_KIND_DOES_NOT_HOLD};

/// Fully qualified name of a metric: a fixed domain and kind plus a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricName {
    pub domain: &'static str,
    pub kind: &'static str,
    pub name: String,
}

impl MetricName {
    /// Violation counter of an invariant
    pub fn invariant_does_not_hold(invariant: &str) -> Self {
        Self {
            domain: METRIC_DOMAIN,
            kind: METRIC_KIND_DOES_NOT_HOLD,
            name: invariant.to_owned(),
        }
    }

    /// Name under which the metric family is exported, e.g. `tos_invariant_does_not_hold`
    pub fn export_name(&self) -> String {
        format!("tos_{}_{}", self.domain, self.kind).replace('-', "_")
    }
}

impl Display for MetricName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.domain, self.kind, self.name)
    }
}

/// Source of named counters.
///
/// Getting a counter creates it when it does not exist yet.
pub trait MetricsRegistry: Send + Sync {
    fn counter(&self, name: &MetricName) -> Counter;
}

/// Registry backed by the process-wide `metrics` recorder
#[derive(Debug, Clone, Copy)]
pub struct GlobalMetrics;

impl GlobalMetrics {
    pub fn new() -> Self {
        describe_counter!(
            METRIC_INVARIANT_DOES_NOT_HOLD,
            Unit::Count,
            "Number of times an invariant did not hold, by invariant"
        );
        Self
    }
}

impl Default for GlobalMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry for GlobalMetrics {
    fn counter(&self, name: &MetricName) -> Counter {
        counter!(name.export_name(), name.domain => name.name.clone())
    }
}
