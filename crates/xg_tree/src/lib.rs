//! The labeled-tree document model consumed and produced by the
//! `xg_serial` engine.
//!
//! An [`XNode`] is a tag, an ordered attribute list, child nodes and
//! optional text. Parsing and printing trees from and to bytes is the
//! host's concern; the node type derives `serde` traits so trees can
//! travel through any serde format.

// -----------------------------------------------------------------------------
// Modules

mod node;

pub mod vocab;

// -----------------------------------------------------------------------------
// Exports

pub use node::XNode;
