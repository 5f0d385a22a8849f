//! Ledger types and the collaborator contracts consumed by the invariant
//! engine: state deltas, transaction sets, operations, buckets and the
//! bucket-list geometry.

pub mod bucket;
pub mod crypto;
pub mod ledger;
pub mod serializer;
pub mod transaction;
