use xg_tree::XNode;

use crate::catalog::ContractCatalog;
use crate::context::SerializationContext;
use crate::contract::Contract;
use crate::error::{ErrorKind, SerializationError};
use crate::priority::{SupportLevel, SupportPriority};
use crate::registry::PropertyDescriptor;
use crate::value::SharedValue;

// -----------------------------------------------------------------------------
// DecoratorContract

/// Annotation-driven contract.
///
/// Matches any property carrying a contract annotation at the
/// Attribute level, with the annotation's depth as the sub-priority
/// so nearer annotations win. Never converts anything itself: before
/// use the engine calls [`materialize`](Contract::materialize), which
/// builds a fresh sub-contract from the catalog's factory map keyed
/// by the annotation's factory key. Every occurrence gets its own
/// instance, so stateful factory contracts never leak state between
/// sites.
#[derive(Debug, Default)]
pub struct DecoratorContract;

impl DecoratorContract {
    /// Create the contract.
    pub const fn new() -> Self {
        Self
    }

    fn report_unmaterialized(&self, ctx: &mut SerializationContext) {
        ctx.report(SerializationError::new(
            ErrorKind::User,
            "annotation contract used without a registered factory",
        ));
    }
}

impl Contract for DecoratorContract {
    fn kind(&self) -> &'static str {
        "Decorator"
    }

    fn support_for_property(
        &self,
        property: &PropertyDescriptor,
        _ctx: &SerializationContext,
    ) -> SupportPriority {
        match property.annotation() {
            Some(annotation) => SupportPriority::new(SupportLevel::Attribute, annotation.depth()),
            None => SupportPriority::NOT_SUPPORTED,
        }
    }

    fn materialize(
        &self,
        property: Option<&PropertyDescriptor>,
        catalog: &ContractCatalog,
    ) -> Option<Box<dyn Contract>> {
        let annotation = property?.annotation()?;
        catalog.factory(annotation.factory_key()).map(|build| build())
    }

    fn read(
        &self,
        _node: &XNode,
        _instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        self.report_unmaterialized(ctx);
        None
    }

    fn write(&self, _value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode> {
        self.report_unmaterialized(ctx);
        None
    }
}
