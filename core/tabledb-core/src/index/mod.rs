//! Ordered index module
//!
//! One B+Tree per table, keyed by the indexed column's integer key and
//! storing the row's position in table storage.

pub mod bplus_tree;
pub mod range;

pub use bplus_tree::{BPlusTree, NodeId, ORDER};
pub use range::KeyRange;

/// Position of a row within its table's row storage.
pub type Locator = usize;
