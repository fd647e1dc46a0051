//! An extensible object-graph serialization engine.
//!
//! Runtime values are converted to and from [`xg_tree::XNode`] trees
//! by pluggable [contracts](crate::contract), ranked per resolution
//! site by a [support priority](crate::priority). A per-pass
//! [`SerializationContext`](crate::context::SerializationContext)
//! keeps the object and type reference tables that make shared and
//! cyclic graphs finite in the document, and the process-wide
//! [`ContractCatalog`](crate::catalog::ContractCatalog) and
//! [`TypeRegistry`](crate::registry::TypeRegistry) hold the
//! registered strategies and type records.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod priority;

pub mod catalog;
pub mod context;
pub mod contract;
pub mod error;
pub mod external;
pub mod hash;
pub mod legacy;
pub mod registry;
pub mod value;

#[cfg(all(debug_assertions, feature = "debug"))]
pub(crate) mod trace;

// -----------------------------------------------------------------------------
// Macro support

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __private {
    pub use inventory;
}

// -----------------------------------------------------------------------------
// Top-Level exports

pub use descriptor::{TypeDescriptor, strip_version_suffix};
pub use priority::{SupportLevel, SupportPriority};
pub use value::{GraphValue, SharedValue, TypePath, shared};
