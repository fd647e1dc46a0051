//! The contract capability model.
//!
//! A [`Contract`] is a pluggable strategy describing how to create,
//! read and write values of some applicability. Contracts advertise
//! how well they match a resolution site through four independent
//! capability probes, each returning a [`SupportPriority`]; the
//! context globally ranks the candidates and the minimum wins.
//!
//! Concrete variants shipped here:
//! - [`NullContract`] — element-matched on the dedicated `Null` tag;
//! - [`ScalarContract`] — type-matched leaf for primitives/strings;
//! - [`ListContract`] / [`MapContract`] — container contracts using
//!   the `XItem`/`XKey`/`XValue` vocabulary;
//! - [`ObjectContract`] — Default-level property-table fallback;
//! - [`PropertyContract`] — exact property-triple override;
//! - [`DecoratorContract`] — annotation-driven, materializing a fresh
//!   sub-contract per occurrence;
//! - [`VersionGate`] — applicability window around any contract.

use xg_tree::XNode;

use crate::catalog::ContractCatalog;
use crate::context::SerializationContext;
use crate::priority::{SupportLevel, SupportPriority};
use crate::registry::{PropertyDescriptor, TypeRecord};
use crate::value::{GraphValue, SharedValue};

mod collection;
mod decorator;
mod null;
mod object;
mod property;
mod scalar;
mod typed;
mod version;

pub use collection::{ListContract, MapContract};
pub(crate) use object::{is_null_node, null_value};
pub use decorator::DecoratorContract;
pub use null::NullContract;
pub use object::ObjectContract;
pub use property::PropertyContract;
pub use scalar::ScalarContract;
pub use typed::TypeMatch;
pub use version::VersionGate;

// -----------------------------------------------------------------------------
// Contract

/// A pluggable serialization strategy.
///
/// Probes default to [`SupportPriority::NOT_SUPPORTED`]; a contract
/// overrides the probes for the sources it understands. The value
/// probe defaults to delegating to the type probe through the
/// value's registered record, which is correct for every
/// type-matched contract.
///
/// `read` both instantiates and populates when
/// [`needs_external_creation`](Contract::needs_external_creation) is
/// true; otherwise the engine calls [`create`](Contract::create)
/// first and passes the empty instance in.
pub trait Contract: Send + Sync {
    /// Stable contract-kind identifier, also the factory key space
    /// for annotations.
    fn kind(&self) -> &'static str;

    /// Whether `read` creates the value itself instead of populating
    /// an engine-created instance.
    fn needs_external_creation(&self) -> bool {
        false
    }

    /// How well this contract matches a tree node.
    fn support_for_node(&self, _node: &XNode, _ctx: &SerializationContext) -> SupportPriority {
        SupportPriority::NOT_SUPPORTED
    }

    /// How well this contract matches a runtime type.
    fn support_for_type(
        &self,
        _record: &TypeRecord,
        _ctx: &SerializationContext,
    ) -> SupportPriority {
        SupportPriority::NOT_SUPPORTED
    }

    /// How well this contract matches a live instance.
    fn support_for_value(
        &self,
        value: &dyn GraphValue,
        ctx: &SerializationContext,
    ) -> SupportPriority {
        match ctx.registry().record_of(value) {
            Some(record) => self.support_for_type(record, ctx),
            None => SupportPriority::NOT_SUPPORTED,
        }
    }

    /// How well this contract matches a property descriptor.
    fn support_for_property(
        &self,
        _property: &PropertyDescriptor,
        _ctx: &SerializationContext,
    ) -> SupportPriority {
        SupportPriority::NOT_SUPPORTED
    }

    /// Build an empty/default instance for `read` to populate. The
    /// node is available for resolving the declared type.
    fn create(&self, _node: &XNode, _ctx: &mut SerializationContext) -> Option<SharedValue> {
        None
    }

    /// Populate (or create and populate) a value from a node.
    ///
    /// Must never return a partially constructed value: on failure,
    /// record an error on the context and return `None`.
    fn read(
        &self,
        node: &XNode,
        instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue>;

    /// Write a value into a new node.
    fn write(&self, value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode>;

    /// Replace the winning contract with a per-occurrence instance.
    ///
    /// `None` means "use self". The decorator overrides this to build
    /// a fresh sub-contract from the annotation's factory key.
    fn materialize(
        &self,
        _property: Option<&PropertyDescriptor>,
        _catalog: &ContractCatalog,
    ) -> Option<Box<dyn Contract>> {
        None
    }
}

// -----------------------------------------------------------------------------
// ElementMatch

/// Exact tag-name matching for element contracts, fixed at
/// `(Element, 0)`.
#[derive(Copy, Clone, Debug)]
pub struct ElementMatch {
    tag: &'static str,
}

impl ElementMatch {
    /// Create a matcher for the given tag.
    #[inline]
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    /// Returns the matched tag.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Probe a node.
    pub fn support(&self, node: &XNode) -> SupportPriority {
        if node.tag() == self.tag {
            SupportPriority::exact(SupportLevel::Element)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use xg_tree::XNode;

    use super::ElementMatch;
    use crate::priority::{SupportLevel, SupportPriority};

    #[test]
    fn element_match_is_exact() {
        let matcher = ElementMatch::new("Widget");
        assert_eq!(
            matcher.support(&XNode::new("Widget")),
            SupportPriority::exact(SupportLevel::Element)
        );
        assert_eq!(
            matcher.support(&XNode::new("widget")),
            SupportPriority::NOT_SUPPORTED
        );
    }
}
