use core::any::TypeId;
use std::sync::Arc;

use xg_tree::XNode;

use crate::context::SerializationContext;
use crate::contract::Contract;
use crate::priority::{SupportLevel, SupportPriority};
use crate::registry::PropertyDescriptor;
use crate::value::{SharedValue, TypePath};

// -----------------------------------------------------------------------------
// PropertyContract

/// Overrides the handling of one exact property.
///
/// Matches only the `(owner, name, property type)` triple and wraps
/// another contract that does the actual conversion. Because the
/// PropertyDescriptor level outranks every type level, an installed
/// property contract always beats the value's own type contract at
/// that site.
pub struct PropertyContract {
    owner: TypeId,
    owner_path: &'static str,
    name: &'static str,
    property_type: TypeId,
    inner: Arc<dyn Contract>,
}

impl PropertyContract {
    /// Create an override for property `name` of owner `O` with
    /// value type `P`, delegating conversion to `inner`.
    pub fn new<O, P>(name: &'static str, inner: Arc<dyn Contract>) -> Self
    where
        O: TypePath + 'static,
        P: 'static,
    {
        Self {
            owner: TypeId::of::<O>(),
            owner_path: O::type_path(),
            name,
            property_type: TypeId::of::<P>(),
            inner,
        }
    }

    /// The targeted property name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The targeted owner's type path.
    #[inline]
    pub fn owner_path(&self) -> &'static str {
        self.owner_path
    }
}

impl Contract for PropertyContract {
    fn kind(&self) -> &'static str {
        "Property"
    }

    fn needs_external_creation(&self) -> bool {
        self.inner.needs_external_creation()
    }

    fn support_for_property(
        &self,
        property: &PropertyDescriptor,
        _ctx: &SerializationContext,
    ) -> SupportPriority {
        if property.matches(self.owner, self.name, self.property_type) {
            SupportPriority::exact(SupportLevel::PropertyDescriptor)
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
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::Any;
    use std::sync::Arc;

    use super::PropertyContract;
    use crate::catalog::ContractCatalog;
    use crate::context::SerializationContext;
    use crate::contract::{Contract, NullContract};
    use crate::priority::{SupportLevel, SupportPriority};
    use crate::registry::{PropertyDescriptor, TypeRegistry};
    use crate::value::{GraphValue, TypePath};

    struct Widget;
    impl TypePath for Widget {
        fn type_path() -> &'static str {
            "tests::Widget"
        }
        fn type_name() -> &'static str {
            "Widget"
        }
    }
    impl GraphValue for Widget {
        fn type_path(&self) -> &'static str {
            "tests::Widget"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn descriptor(name: &'static str) -> PropertyDescriptor {
        PropertyDescriptor::new::<Widget, i32>(name, |_| None, |_, _| false)
    }

    #[test]
    fn matches_only_the_exact_triple() {
        let catalog = ContractCatalog::empty();
        let registry = TypeRegistry::empty();
        let ctx = SerializationContext::with(&catalog, &registry);

        let contract =
            PropertyContract::new::<Widget, i32>("width", Arc::new(NullContract::new()));
        assert_eq!(
            contract.support_for_property(&descriptor("width"), &ctx),
            SupportPriority::exact(SupportLevel::PropertyDescriptor)
        );
        assert_eq!(
            contract.support_for_property(&descriptor("height"), &ctx),
            SupportPriority::NOT_SUPPORTED
        );
        // Other probe kinds never match.
        assert!(!contract.support_for_value(&Widget, &ctx).is_supported());
    }
}
