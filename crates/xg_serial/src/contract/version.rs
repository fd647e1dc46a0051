use xg_tree::XNode;

use crate::catalog::ContractCatalog;
use crate::context::{SerializationContext, VERSION_PARAMETER};
use crate::contract::Contract;
use crate::priority::SupportPriority;
use crate::registry::{PropertyDescriptor, TypeRecord};
use crate::value::{GraphValue, SharedValue};

// -----------------------------------------------------------------------------
// VersionGate

/// Restricts another contract to a document-version window.
///
/// The window is inclusive on both ends; an unbounded maximum means
/// "current". The version comes from the context's `Version`
/// parameter. When the run carries no version at all, only contracts
/// with an unbounded maximum stay eligible, so legacy-only contracts
/// cannot capture unversioned documents.
pub struct VersionGate<C> {
    min: u32,
    max: Option<u32>,
    inner: C,
}

impl<C: Contract> VersionGate<C> {
    /// Gate `inner` to versions `min..` (unbounded maximum).
    pub fn since(min: u32, inner: C) -> Self {
        Self {
            min,
            max: None,
            inner,
        }
    }

    /// Gate `inner` to the inclusive window `min..=max`.
    pub fn between(min: u32, max: u32, inner: C) -> Self {
        Self {
            min,
            max: Some(max),
            inner,
        }
    }

    /// The inclusive lower bound.
    #[inline]
    pub fn min(&self) -> u32 {
        self.min
    }

    /// The inclusive upper bound, `None` for "current".
    #[inline]
    pub fn max(&self) -> Option<u32> {
        self.max
    }

    fn eligible(&self, ctx: &SerializationContext) -> bool {
        match ctx.parameter::<u32>(VERSION_PARAMETER) {
            Some(&version) => self.min <= version && self.max.is_none_or(|max| version <= max),
            None => self.max.is_none(),
        }
    }
}

impl<C: Contract> Contract for VersionGate<C> {
    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn needs_external_creation(&self) -> bool {
        self.inner.needs_external_creation()
    }

    fn support_for_node(&self, node: &XNode, ctx: &SerializationContext) -> SupportPriority {
        if self.eligible(ctx) {
            self.inner.support_for_node(node, ctx)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }

    fn support_for_type(&self, record: &TypeRecord, ctx: &SerializationContext) -> SupportPriority {
        if self.eligible(ctx) {
            self.inner.support_for_type(record, ctx)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }

    fn support_for_value(
        &self,
        value: &dyn GraphValue,
        ctx: &SerializationContext,
    ) -> SupportPriority {
        if self.eligible(ctx) {
            self.inner.support_for_value(value, ctx)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }

    fn support_for_property(
        &self,
        property: &PropertyDescriptor,
        ctx: &SerializationContext,
    ) -> SupportPriority {
        if self.eligible(ctx) {
            self.inner.support_for_property(property, ctx)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }

    fn create(&self, node: &XNode, ctx: &mut SerializationContext) -> Option<SharedValue> {
        self.inner.create(node, ctx)
    }

    fn read(
        &self,
        node: &XNode,
        instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        self.inner.read(node, instance, ctx)
    }

    fn write(&self, value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode> {
        self.inner.write(value, ctx)
    }

    fn materialize(
        &self,
        property: Option<&PropertyDescriptor>,
        catalog: &ContractCatalog,
    ) -> Option<Box<dyn Contract>> {
        self.inner.materialize(property, catalog)
    }
}
