use serde::{Deserialize, Serialize};

use crate::crypto::Hash;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationBody {
    CreateAccount {
        destination: Hash,
        starting_balance: i64,
    },
    Payment {
        destination: Hash,
        asset: Hash,
        amount: i64,
    },
    ManageData {
        name: String,
        #[serde(with = "hex::serde")]
        value: Vec<u8>,
    },
    BumpSequence {
        bump_to: i64,
    },
}

/// A single operation of a transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    /// Overrides the transaction source account when set
    pub source_account: Option<Hash>,
    pub body: OperationBody,
}

/// Outcome of applying an operation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationResult {
    Success,
    Failed { code: i32 },
    NotSupported,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub source_account: Hash,
    pub fee: u32,
    pub seq_num: i64,
    pub operations: Vec<Operation>,
}

/// Set of transactions applied to close a ledger
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct TransactionSet {
    pub previous_ledger_hash: Hash,
    pub transactions: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new(previous_ledger_hash: Hash, transactions: Vec<Transaction>) -> Self {
        Self {
            previous_ledger_hash,
            transactions,
        }
    }

    pub fn operations_count(&self) -> usize {
        self.transactions.iter().map(|tx| tx.operations.len()).sum()
    }
}
