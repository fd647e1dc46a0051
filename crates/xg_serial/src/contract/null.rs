use xg_tree::{XNode, vocab};

use crate::contract::{Contract, ElementMatch};
use crate::context::SerializationContext;
use crate::priority::{SupportLevel, SupportPriority};
use crate::value::{GraphValue, SharedValue, XNull, shared};

// -----------------------------------------------------------------------------
// NullContract

/// Element contract for the dedicated `Null` tag.
#[derive(Debug)]
pub struct NullContract {
    matcher: ElementMatch,
}

impl Default for NullContract {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl NullContract {
    /// Create the contract.
    pub const fn new() -> Self {
        Self {
            matcher: ElementMatch::new(vocab::NULL_TAG),
        }
    }
}

impl Contract for NullContract {
    fn kind(&self) -> &'static str {
        "Null"
    }

    fn needs_external_creation(&self) -> bool {
        true
    }

    fn support_for_node(&self, node: &XNode, _ctx: &SerializationContext) -> SupportPriority {
        self.matcher.support(node)
    }

    fn support_for_value(
        &self,
        value: &dyn GraphValue,
        _ctx: &SerializationContext,
    ) -> SupportPriority {
        if value.is::<XNull>() {
            SupportPriority::exact(SupportLevel::Element)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }

    fn read(
        &self,
        _node: &XNode,
        _instance: Option<&SharedValue>,
        _ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        Some(shared(XNull))
    }

    fn write(&self, _value: &SharedValue, _ctx: &mut SerializationContext) -> Option<XNode> {
        Some(XNode::new(vocab::NULL_TAG))
    }
}
