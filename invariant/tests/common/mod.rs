// Common test utilities for invariant manager integration tests
//
// Each test binary only uses part of these helpers
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use metrics::Counter;
use tos_invariant::{
    BucketApplyContext, Invariant, InvariantManager, InvariantManagerBuilder, LedgerCloseContext,
    LogSink, MetricName, MetricsRegistry, OperationApplyContext,
};
use tos_ledger::{
    bucket::BucketListGeometry,
    crypto::hash,
    ledger::{EntryChange, LedgerDelta, LedgerEntry, LedgerHeader},
    transaction::{Operation, OperationBody, Transaction, TransactionSet},
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type LedgerCloseCheck = Box<dyn Fn(&LedgerCloseContext<'_>) -> Option<String> + Send + Sync>;
type BucketApplyCheck = Box<dyn Fn(&BucketApplyContext<'_>) -> Option<String> + Send + Sync>;
type OperationApplyCheck = Box<dyn Fn(&OperationApplyContext<'_>) -> Option<String> + Send + Sync>;

/// Invariant built from closures, counting how often each checkpoint runs
pub struct FnInvariant {
    name: String,
    strict: bool,
    on_ledger_close: Option<LedgerCloseCheck>,
    on_bucket_apply: Option<BucketApplyCheck>,
    on_operation_apply: Option<OperationApplyCheck>,
    calls: [AtomicUsize; 3],
}

const LEDGER_CLOSE: usize = 0;
const BUCKET_APPLY: usize = 1;
const OPERATION_APPLY: usize = 2;

impl FnInvariant {
    pub fn advisory(name: &str) -> Self {
        Self::new(name, false)
    }

    pub fn strict(name: &str) -> Self {
        Self::new(name, true)
    }

    fn new(name: &str, strict: bool) -> Self {
        Self {
            name: name.to_owned(),
            strict,
            on_ledger_close: None,
            on_bucket_apply: None,
            on_operation_apply: None,
            calls: Default::default(),
        }
    }

    /// Fail every checkpoint with the same message
    pub fn always_failing(name: &str, strict: bool, message: &str) -> Self {
        let (a, b, c) = (message.to_owned(), message.to_owned(), message.to_owned());
        Self::new(name, strict)
            .on_ledger_close(move |_| Some(a.clone()))
            .on_bucket_apply(move |_| Some(b.clone()))
            .on_operation_apply(move |_| Some(c.clone()))
    }

    pub fn on_ledger_close(
        mut self,
        check: impl Fn(&LedgerCloseContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.on_ledger_close = Some(Box::new(check));
        self
    }

    pub fn on_bucket_apply(
        mut self,
        check: impl Fn(&BucketApplyContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.on_bucket_apply = Some(Box::new(check));
        self
    }

    pub fn on_operation_apply(
        mut self,
        check: impl Fn(&OperationApplyContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.on_operation_apply = Some(Box::new(check));
        self
    }

    pub fn ledger_close_calls(&self) -> usize {
        self.calls[LEDGER_CLOSE].load(Ordering::SeqCst)
    }

    pub fn bucket_apply_calls(&self) -> usize {
        self.calls[BUCKET_APPLY].load(Ordering::SeqCst)
    }

    pub fn operation_apply_calls(&self) -> usize {
        self.calls[OPERATION_APPLY].load(Ordering::SeqCst)
    }
}

impl Invariant for FnInvariant {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_strict(&self) -> bool {
        self.strict
    }

    fn check_on_ledger_close(&self, context: &LedgerCloseContext<'_>) -> Option<String> {
        self.calls[LEDGER_CLOSE].fetch_add(1, Ordering::SeqCst);
        self.on_ledger_close.as_ref()?(context)
    }

    fn check_on_bucket_apply(&self, context: &BucketApplyContext<'_>) -> Option<String> {
        self.calls[BUCKET_APPLY].fetch_add(1, Ordering::SeqCst);
        self.on_bucket_apply.as_ref()?(context)
    }

    fn check_on_operation_apply(&self, context: &OperationApplyContext<'_>) -> Option<String> {
        self.calls[OPERATION_APPLY].fetch_add(1, Ordering::SeqCst);
        self.on_operation_apply.as_ref()?(context)
    }
}

/// In-memory violation counters
#[derive(Default)]
pub struct RecordingMetrics {
    counters: Mutex<HashMap<MetricName, Arc<AtomicU64>>>,
}

impl RecordingMetrics {
    pub fn is_registered(&self, invariant: &str) -> bool {
        self.counters
            .lock()
            .unwrap()
            .contains_key(&MetricName::invariant_does_not_hold(invariant))
    }

    pub fn violations(&self, invariant: &str) -> u64 {
        self.counters
            .lock()
            .unwrap()
            .get(&MetricName::invariant_does_not_hold(invariant))
            .map(|value| value.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl MetricsRegistry for RecordingMetrics {
    fn counter(&self, name: &MetricName) -> Counter {
        let mut counters = self.counters.lock().unwrap();
        let value = counters.entry(name.clone()).or_default();
        Counter::from_arc(Arc::clone(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Error,
}

#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }
}

impl LogSink for RecordingSink {
    fn fatal(&self, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((Severity::Fatal, message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((Severity::Error, message.to_owned()));
    }
}

/// Geometry answering the same oldest ledger and size for every level
pub struct ConstantGeometry {
    pub oldest: u32,
    pub size: u32,
}

impl BucketListGeometry for ConstantGeometry {
    fn oldest_ledger_in_curr(&self, _ledger: u32, _level: u32) -> u32 {
        self.oldest
    }

    fn oldest_ledger_in_snap(&self, _ledger: u32, _level: u32) -> u32 {
        self.oldest
    }

    fn size_of_curr(&self, _ledger: u32, _level: u32) -> u32 {
        self.size
    }

    fn size_of_snap(&self, _ledger: u32, _level: u32) -> u32 {
        self.size
    }
}

pub struct Harness {
    pub builder: InvariantManagerBuilder,
    pub metrics: Arc<RecordingMetrics>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    /// Freeze the builder, keeping the recording collaborators
    pub fn build(self) -> (InvariantManager, Arc<RecordingMetrics>, Arc<RecordingSink>) {
        (self.builder.build(), self.metrics, self.sink)
    }
}

pub fn harness() -> Harness {
    harness_with_geometry(ConstantGeometry { oldest: 1, size: 1 })
}

pub fn harness_with_geometry(geometry: impl BucketListGeometry + 'static) -> Harness {
    init_logger();
    let metrics = Arc::new(RecordingMetrics::default());
    let sink = Arc::new(RecordingSink::default());
    let builder =
        InvariantManager::builder(metrics.clone(), Arc::new(geometry)).with_log_sink(sink.clone());
    Harness {
        builder,
        metrics,
        sink,
    }
}

pub fn entry(seed: &[u8], ledger_seq: u32) -> LedgerEntry {
    LedgerEntry {
        key: hash(seed),
        last_modified_ledger_seq: ledger_seq,
        data: seed.to_vec(),
    }
}

pub fn delta(ledger_seq: u32, ledger_version: u32) -> LedgerDelta {
    let mut delta = LedgerDelta::new(LedgerHeader::new(ledger_seq, ledger_version));
    delta.add_change(EntryChange::Created(entry(b"account", ledger_seq)));
    delta
}

pub fn payment() -> Operation {
    Operation {
        source_account: Some(hash(b"source")),
        body: OperationBody::Payment {
            destination: hash(b"destination"),
            asset: hash(b"TOS"),
            amount: 1_000,
        },
    }
}

pub fn tx_set() -> TransactionSet {
    TransactionSet::new(
        hash(b"previous ledger"),
        vec![Transaction {
            source_account: hash(b"source"),
            fee: 100,
            seq_num: 1,
            operations: vec![payment()],
        }],
    )
}
