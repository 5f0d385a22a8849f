use std::sync::Arc;

use crate::{
    counters::{MetricName, MetricsRegistry},
    error::InvariantDoesNotHold,
    invariant::Invariant,
    sink::LogSink,
};

/// Counts and routes invariant violations.
///
/// Every violation increments the invariant's counter. A strict invariant
/// then logs at fatal severity and the violation is returned to the caller as
/// [`InvariantDoesNotHold`]; an advisory one logs at error severity and
/// checking carries on.
pub struct FailureEscalator {
    metrics: Arc<dyn MetricsRegistry>,
    sink: Arc<dyn LogSink>,
}

impl FailureEscalator {
    pub fn new(metrics: Arc<dyn MetricsRegistry>, sink: Arc<dyn LogSink>) -> Self {
        Self { metrics, sink }
    }

    pub fn on_failure(
        &self,
        invariant: &dyn Invariant,
        message: String,
    ) -> Result<(), InvariantDoesNotHold> {
        self.metrics
            .counter(&MetricName::invariant_does_not_hold(invariant.name()))
            .increment(1);

        if invariant.is_strict() {
            self.sink.fatal(&message);
            return Err(InvariantDoesNotHold::new(message));
        }

        self.sink.error(&message);
        Ok(())
    }
}
