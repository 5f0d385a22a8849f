//! Runtime invariant checks for the ledger state machine.
//!
//! Invariants are pluggable correctness rules implementing [`Invariant`].
//! They are registered and enabled once at start-up through
//! [`InvariantManagerBuilder`], then evaluated by [`InvariantManager`] at
//! three checkpoints:
//!
//! - ledger close, with the state delta and transaction set of the ledger
//! - bucket apply, with the bucket and the range of ledgers it may cover
//! - operation apply, with the operation, its result and the ledger delta
//!   (only from ledger version 8)
//!
//! Every violation increments the `invariant.does-not-hold.<name>` counter.
//! Advisory invariants only log the violation. Strict invariants log it as
//! fatal and the checkpoint returns [`InvariantDoesNotHold`], which callers
//! must treat as unrecoverable.

pub mod config;
pub mod counters;
pub mod enabled;
pub mod error;
pub mod escalation;
pub mod invariant;
pub mod manager;
pub mod registry;
pub mod sink;


pub use config::InvariantConfig;
pub use counters::{GlobalMetrics, MetricName, MetricsRegistry};
pub use error::{InvariantDoesNotHold, InvariantError};
pub use invariant::{BucketApplyContext, Invariant, LedgerCloseContext, OperationApplyContext};
pub use manager::{InvariantManager, InvariantManagerBuilder};
pub use sink::{LogFacadeSink, LogSink};
