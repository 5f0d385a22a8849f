//! Immutable snapshot ("bucket") contracts.
//!
//! The bucket list is a leveled, log-structured store of historical ledger
//! entries. Each level holds a "current" and a "snapshot" generation. The
//! level/age arithmetic belongs to the bucket list itself; only the read side
//! needed to bound a bucket's contents is exposed here.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::{
    crypto::{hash, Hash},
    ledger::LedgerEntry,
};

/// Which generation of a bucket list level a bucket belongs to
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BucketGeneration {
    Curr,
    Snap,
}

impl BucketGeneration {
    pub fn from_is_curr(is_curr: bool) -> Self {
        if is_curr {
            BucketGeneration::Curr
        } else {
            BucketGeneration::Snap
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BucketGeneration::Curr => "Curr",
            BucketGeneration::Snap => "Snap",
        }
    }
}

impl Display for BucketGeneration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An immutable snapshot of ledger entries
pub trait Bucket {
    /// Content hash of the bucket
    fn hash(&self) -> &Hash;

    fn entries(&self) -> &[LedgerEntry];
}

/// Level/age arithmetic of the bucket list.
///
/// For a bucket list at ledger `ledger`, each level and generation holds the
/// changes of a contiguous range of ledgers starting at the oldest ledger
/// returned here and spanning `size_of_*` ledgers.
pub trait BucketListGeometry: Send + Sync {
    fn oldest_ledger_in_curr(&self, ledger: u32, level: u32) -> u32;

    fn oldest_ledger_in_snap(&self, ledger: u32, level: u32) -> u32;

    fn size_of_curr(&self, ledger: u32, level: u32) -> u32;

    fn size_of_snap(&self, ledger: u32, level: u32) -> u32;

    /// Oldest ledger representable by the given generation of a level
    fn oldest_ledger(&self, ledger: u32, level: u32, generation: BucketGeneration) -> u32 {
        match generation {
            BucketGeneration::Curr => self.oldest_ledger_in_curr(ledger, level),
            BucketGeneration::Snap => self.oldest_ledger_in_snap(ledger, level),
        }
    }

    /// Number of ledgers spanned by the given generation of a level
    fn size_of(&self, ledger: u32, level: u32, generation: BucketGeneration) -> u32 {
        match generation {
            BucketGeneration::Curr => self.size_of_curr(ledger, level),
            BucketGeneration::Snap => self.size_of_snap(ledger, level),
        }
    }
}

/// Bucket held in memory, hashed over its serialized entries
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryBucket {
    hash: Hash,
    entries: Vec<LedgerEntry>,
}

impl InMemoryBucket {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        let mut bytes = Vec::new();
        for entry in &entries {
            bytes.extend_from_slice(entry.key.as_bytes());
            bytes.extend_from_slice(&entry.last_modified_ledger_seq.to_be_bytes());
            bytes.extend_from_slice(&(entry.data.len() as u64).to_be_bytes());
            bytes.extend_from_slice(&entry.data);
        }

        Self {
            hash: hash(&bytes),
            entries,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Bucket for InMemoryBucket {
    fn hash(&self) -> &Hash {
        &self.hash
    }

    fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}
