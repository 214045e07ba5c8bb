//! Allocation and collection types.
//!
//! - `HashMap` backed by AHash
//! - [`SparseSet`](sparse_set::SparseSet) with generational indices

pub mod sparse_set;

pub use ahash::AHashMap as HashMap;
