mod hash;

pub use hash::{hash, Hash, HASH_SIZE};
