//! Checkpoint dispatch.
//!
//! Invariants are registered and enabled through [`InvariantManagerBuilder`]
//! during start-up. [`InvariantManagerBuilder::build`] freezes both sets into
//! an [`InvariantManager`], which only exposes the checkpoint entry points
//! and read-only accessors: nothing can be registered or enabled once
//! checkpoints are reachable.
//!
//! Each checkpoint evaluates every enabled invariant in enable order. Advisory
//! violations are counted and logged and evaluation carries on. The first
//! strict violation aborts the checkpoint with [`InvariantDoesNotHold`].

use std::sync::Arc;

use log::{debug, info, trace};
use tos_ledger::{
    bucket::{Bucket, BucketGeneration, BucketListGeometry},
    ledger::StateDelta,
    serializer::to_canonical_string,
    transaction::{Operation, OperationResult, TransactionSet},
};

use crate::{
    config::{InvariantConfig, LOG_TARGET, OPERATION_APPLY_MIN_LEDGER_VERSION},
    counters::{MetricName, MetricsRegistry},
    enabled::EnabledSet,
    error::{InvariantDoesNotHold, InvariantError},
    escalation::FailureEscalator,
    invariant::{
        as_violation, BucketApplyContext, Invariant, LedgerCloseContext, OperationApplyContext,
    },
    registry::InvariantRegistry,
    sink::{LogFacadeSink, LogSink},
};

/// Start-up wiring of the invariant manager
pub struct InvariantManagerBuilder {
    registry: InvariantRegistry,
    enabled: EnabledSet,
    metrics: Arc<dyn MetricsRegistry>,
    sink: Arc<dyn LogSink>,
    geometry: Arc<dyn BucketListGeometry>,
}

impl InvariantManagerBuilder {
    pub fn new(metrics: Arc<dyn MetricsRegistry>, geometry: Arc<dyn BucketListGeometry>) -> Self {
        Self {
            registry: InvariantRegistry::new(),
            enabled: EnabledSet::new(),
            metrics,
            sink: Arc::new(LogFacadeSink),
            geometry,
        }
    }

    /// Replace the default sink forwarding to the `log` facade
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Register an invariant and create its violation counter
    pub fn register(&mut self, invariant: Arc<dyn Invariant>) -> Result<(), InvariantError> {
        let metric = MetricName::invariant_does_not_hold(invariant.name());
        self.registry.register(invariant)?;
        let _counter = self.metrics.counter(&metric);

        if log::log_enabled!(target: LOG_TARGET, log::Level::Debug) {
            debug!(target: LOG_TARGET, "Registered invariant {}", metric.name);
        }
        Ok(())
    }

    /// Enable a registered invariant, it is evaluated after those enabled before it
    pub fn enable(&mut self, name: &str) -> Result<(), InvariantError> {
        self.enabled.enable(&self.registry, name)?;

        if log::log_enabled!(target: LOG_TARGET, log::Level::Debug) {
            debug!(target: LOG_TARGET, "Enabled invariant {}", name);
        }
        Ok(())
    }

    /// Enable every invariant listed in the configuration, in order.
    /// Stops at the first name that cannot be enabled.
    pub fn enable_from_config(&mut self, config: &InvariantConfig) -> Result<(), InvariantError> {
        if !config.has_checks() {
            if log::log_enabled!(target: LOG_TARGET, log::Level::Debug) {
                debug!(target: LOG_TARGET, "No invariant checks configured");
            }
            return Ok(());
        }

        for name in &config.invariant_checks {
            self.enable(name)?;
        }
        Ok(())
    }

    pub fn build(self) -> InvariantManager {
        if log::log_enabled!(target: LOG_TARGET, log::Level::Info) {
            info!(
                target: LOG_TARGET,
                "{} invariants registered, {} enabled: [{}]",
                self.registry.len(),
                self.enabled.len(),
                self.enabled.names().collect::<Vec<_>>().join(", ")
            );
        }

        InvariantManager {
            registry: self.registry,
            enabled: self.enabled,
            escalator: FailureEscalator::new(self.metrics, self.sink),
            geometry: self.geometry,
        }
    }
}

/// Runs enabled invariants at ledger-processing checkpoints
pub struct InvariantManager {
    registry: InvariantRegistry,
    enabled: EnabledSet,
    escalator: FailureEscalator,
    geometry: Arc<dyn BucketListGeometry>,
}

impl InvariantManager {
    pub fn builder(
        metrics: Arc<dyn MetricsRegistry>,
        geometry: Arc<dyn BucketListGeometry>,
    ) -> InvariantManagerBuilder {
        InvariantManagerBuilder::new(metrics, geometry)
    }

    /// Check every enabled invariant against a closed ledger.
    ///
    /// Violations carry the full transaction set so the ledger can be
    /// replayed offline.
    pub fn check_on_ledger_close(
        &self,
        tx_set: &TransactionSet,
        delta: &dyn StateDelta,
    ) -> Result<(), InvariantDoesNotHold> {
        let ledger_seq = delta.header().ledger_seq;
        if log::log_enabled!(target: LOG_TARGET, log::Level::Trace) {
            trace!(
                target: LOG_TARGET,
                "Checking {} invariants on ledger {} ({} changes, {} operations)",
                self.enabled.len(),
                ledger_seq,
                delta.changes().len(),
                tx_set.operations_count()
            );
        }

        let context = LedgerCloseContext {
            ledger_seq,
            delta,
            tx_set,
        };
        for invariant in self.enabled.iter() {
            let Some(result) = as_violation(invariant.check_on_ledger_close(&context)) else {
                continue;
            };

            let message = format!(
                "invariant \"{}\" does not hold on ledger {}: {}\n{}",
                invariant.name(),
                ledger_seq,
                result,
                to_canonical_string(tx_set)
            );
            self.escalator.on_failure(&**invariant, message)?;
        }

        Ok(())
    }

    /// Check every enabled invariant against a bucket being applied at
    /// `level` of the bucket list for ledger `ledger`.
    pub fn check_on_bucket_apply(
        &self,
        bucket: &dyn Bucket,
        ledger: u32,
        level: u32,
        generation: BucketGeneration,
    ) -> Result<(), InvariantDoesNotHold> {
        let (oldest_ledger, newest_ledger) = self.bucket_ledger_range(ledger, level, generation);
        if log::log_enabled!(target: LOG_TARGET, log::Level::Trace) {
            trace!(
                target: LOG_TARGET,
                "Checking {} invariants on bucket {}[{}] covering ledgers {}..={}",
                self.enabled.len(),
                generation,
                level,
                oldest_ledger,
                newest_ledger
            );
        }

        let context = BucketApplyContext {
            bucket,
            oldest_ledger,
            newest_ledger,
            level,
            generation,
        };
        for invariant in self.enabled.iter() {
            let Some(result) = as_violation(invariant.check_on_bucket_apply(&context)) else {
                continue;
            };

            let message = format!(
                "invariant \"{}\" does not hold on bucket {}[{}] = {}: {}",
                invariant.name(),
                generation,
                level,
                bucket.hash(),
                result
            );
            self.escalator.on_failure(&**invariant, message)?;
        }

        Ok(())
    }

    /// Check every enabled invariant against an applied operation.
    ///
    /// Operation-apply checks do not exist before ledger version
    /// [`OPERATION_APPLY_MIN_LEDGER_VERSION`]: older ledgers are skipped.
    pub fn check_on_operation_apply(
        &self,
        operation: &Operation,
        result: &OperationResult,
        delta: &dyn StateDelta,
    ) -> Result<(), InvariantDoesNotHold> {
        if delta.header().ledger_version < OPERATION_APPLY_MIN_LEDGER_VERSION {
            return Ok(());
        }

        if log::log_enabled!(target: LOG_TARGET, log::Level::Trace) {
            trace!(
                target: LOG_TARGET,
                "Checking {} invariants on {} operation in ledger {}",
                self.enabled.len(),
                if result.is_success() { "successful" } else { "failed" },
                delta.header().ledger_seq
            );
        }

        let context = OperationApplyContext {
            operation,
            result,
            delta,
        };
        for invariant in self.enabled.iter() {
            let Some(violation) = as_violation(invariant.check_on_operation_apply(&context)) else {
                continue;
            };

            let message = format!(
                "Invariant \"{}\" does not hold on operation: {}\n{}",
                invariant.name(),
                violation,
                to_canonical_string(operation)
            );
            self.escalator.on_failure(&**invariant, message)?;
        }

        Ok(())
    }

    // Inclusive range of ledgers a bucket may hold changes from
    // newest = oldest - 1 + size, wrapping in u32 like the bucket list arithmetic
    fn bucket_ledger_range(
        &self,
        ledger: u32,
        level: u32,
        generation: BucketGeneration,
    ) -> (u32, u32) {
        let oldest = self.geometry.oldest_ledger(ledger, level, generation);
        let size = self.geometry.size_of(ledger, level, generation);
        (oldest, oldest.wrapping_sub(1).wrapping_add(size))
    }

    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Invariant>, InvariantError> {
        self.registry.lookup(name)
    }

    /// Registered names in sorted order
    pub fn registered_names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.registry.names()
    }

    /// Enabled names in evaluation order
    pub fn enabled_names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.enabled.names()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}
