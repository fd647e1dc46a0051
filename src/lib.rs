//! Extensible object-graph serialization over a labeled-tree document
//! format.
//!
//! Values are converted to and from [`xg_tree::XNode`] trees by
//! pluggable, priority-resolved [contracts](xg_serial::contract),
//! with reference and type deduplication handled by a per-pass
//! [`SerializationContext`](xg_serial::context::SerializationContext).

pub use xg_serial as serial;
pub use xg_tree as tree;
