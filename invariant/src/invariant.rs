//! The contract every pluggable invariant implements.
//!
//! An invariant observes one or more checkpoints. For each checkpoint it
//! returns `None` (or an empty string) when the property holds, and a
//! human-readable description of the violation otherwise. The engine never
//! looks at invariant-specific state.

use tos_ledger::{
    bucket::{Bucket, BucketGeneration},
    ledger::StateDelta,
    transaction::{Operation, OperationResult, TransactionSet},
};

/// Inputs of a ledger-close check
pub struct LedgerCloseContext<'a> {
    pub ledger_seq: u32,
    /// Every change applied while closing the ledger
    pub delta: &'a dyn StateDelta,
    pub tx_set: &'a TransactionSet,
}

/// Inputs of a bucket-apply check.
///
/// The bucket may only contain changes made in the inclusive range
/// `[oldest_ledger, newest_ledger]`.
pub struct BucketApplyContext<'a> {
    pub bucket: &'a dyn Bucket,
    pub oldest_ledger: u32,
    pub newest_ledger: u32,
    pub level: u32,
    pub generation: BucketGeneration,
}

/// Inputs of an operation-apply check
pub struct OperationApplyContext<'a> {
    pub operation: &'a Operation,
    pub result: &'a OperationResult,
    /// Delta of the enclosing ledger, including this operation's changes
    pub delta: &'a dyn StateDelta,
}

pub trait Invariant: Send + Sync {
    /// Unique name, used for registration, enabling and metrics.
    fn name(&self) -> &str;

    /// A violation of a strict invariant is treated as data corruption
    /// and halts ledger processing. Other invariants are advisory.
    fn is_strict(&self) -> bool;

    fn check_on_ledger_close(&self, _context: &LedgerCloseContext<'_>) -> Option<String> {
        None
    }

    fn check_on_bucket_apply(&self, _context: &BucketApplyContext<'_>) -> Option<String> {
        None
    }

    fn check_on_operation_apply(&self, _context: &OperationApplyContext<'_>) -> Option<String> {
        None
    }
}

// Only an absent or empty result means the property holds
// Anything else, whitespace included, is reported as is
#[inline]
pub(crate) fn as_violation(result: Option<String>) -> Option<String> {
    result.filter(|message| !message.is_empty())
}
