//! Ledger header and state delta contracts.
//!
//! A state delta is produced by the ledger-close pipeline and describes every
//! entry-level change applied while closing one ledger. The invariant engine
//! only ever reads it.

use serde::{Deserialize, Serialize};

use crate::crypto::Hash;

/// Header of a closed ledger, as far as the invariant engine is concerned.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerHeader {
    /// Sequence number of the ledger
    pub ledger_seq: u32,
    /// Protocol version the ledger was closed with
    pub ledger_version: u32,
    pub previous_ledger_hash: Hash,
}

impl LedgerHeader {
    pub fn new(ledger_seq: u32, ledger_version: u32) -> Self {
        Self {
            ledger_seq,
            ledger_version,
            previous_ledger_hash: Hash::zero(),
        }
    }
}

/// A single ledger entry, identified by its key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub key: Hash,
    pub last_modified_ledger_seq: u32,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

/// Entry-level change recorded in a state delta.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryChange {
    Created(LedgerEntry),
    Updated {
        previous: LedgerEntry,
        current: LedgerEntry,
    },
    Removed(LedgerEntry),
}

impl EntryChange {
    /// Key of the entry touched by this change
    pub fn key(&self) -> &Hash {
        match self {
            EntryChange::Created(entry) | EntryChange::Removed(entry) => &entry.key,
            EntryChange::Updated { current, .. } => &current.key,
        }
    }

    /// Entry state before the change, if it existed
    pub fn previous(&self) -> Option<&LedgerEntry> {
        match self {
            EntryChange::Created(_) => None,
            EntryChange::Updated { previous, .. } => Some(previous),
            EntryChange::Removed(entry) => Some(entry),
        }
    }

    /// Entry state after the change, if it still exists
    pub fn current(&self) -> Option<&LedgerEntry> {
        match self {
            EntryChange::Created(entry) => Some(entry),
            EntryChange::Updated { current, .. } => Some(current),
            EntryChange::Removed(_) => None,
        }
    }
}

/// Read access to the changes applied while closing a ledger.
pub trait StateDelta {
    fn header(&self) -> &LedgerHeader;

    fn changes(&self) -> &[EntryChange];
}

/// In-memory state delta
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerDelta {
    header: LedgerHeader,
    changes: Vec<EntryChange>,
}

impl LedgerDelta {
    pub fn new(header: LedgerHeader) -> Self {
        Self {
            header,
            changes: Vec::new(),
        }
    }

    pub fn add_change(&mut self, change: EntryChange) {
        self.changes.push(change);
    }
}

impl StateDelta for LedgerDelta {
    fn header(&self) -> &LedgerHeader {
        &self.header
    }

    fn changes(&self) -> &[EntryChange] {
        &self.changes
    }
}
