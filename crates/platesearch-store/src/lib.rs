//! platesearch-store
//!
//! In-memory document store for plate and archive records. Documents are
//! loaded from JSON files and matched with MongoDB-style semantics; see
//! `eval` for predicate evaluation and `order` for collated sorting.
pub mod eval;
pub mod load;
pub mod memory;
pub mod order;

pub use memory::MemoryStore;
