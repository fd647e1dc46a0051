use xg_tree::{XNode, vocab};

use crate::context::{RefId, SerializationContext};
use crate::contract::Contract;
use crate::error::{ErrorKind, SerializationError};
use crate::priority::{SupportLevel, SupportPriority};
use crate::registry::TypeRecord;
use crate::value::{SharedValue, XNull, shared};

// -----------------------------------------------------------------------------
// ObjectContract

/// Default-level fallback contract for any type with a registered
/// property table.
///
/// Writes one child node per property, tagged with the exact property
/// name; each property value is resolved through the context again,
/// so annotation and property contracts take precedence over the
/// value's own type contract. Consults the object-reference table
/// before descending and emits a `ref` marker for an already-written
/// instance, which is what keeps shared and cyclic graphs finite.
#[derive(Debug, Default)]
pub struct ObjectContract;

impl ObjectContract {
    /// Create the contract.
    pub const fn new() -> Self {
        Self
    }

    fn wrap_property(name: &str, mut value_node: XNode) -> XNode {
        if value_node.tag() == vocab::NULL_TAG {
            let mut wrapper = XNode::new(name);
            wrapper.add_child(value_node);
            wrapper
        } else {
            value_node.set_tag(name);
            value_node
        }
    }
}

impl Contract for ObjectContract {
    fn kind(&self) -> &'static str {
        "Object"
    }

    fn support_for_type(
        &self,
        record: &TypeRecord,
        _ctx: &SerializationContext,
    ) -> SupportPriority {
        if !record.properties().is_empty() || record.has_constructor() {
            SupportPriority::exact(SupportLevel::Default)
        } else {
            SupportPriority::NOT_SUPPORTED
        }
    }

    fn create(&self, node: &XNode, ctx: &mut SerializationContext) -> Option<SharedValue> {
        let type_id = ctx.resolve_type(node)?;
        let record = ctx.registry().get(type_id)?;
        let instance = record.construct();
        if instance.is_none() {
            ctx.report(SerializationError::at_node(
                ErrorKind::User,
                format!("type `{}` has no registered constructor", record.type_path()),
                node,
            ));
        }
        instance
    }

    fn read(
        &self,
        node: &XNode,
        instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        let instance = instance?.clone();
        let record = {
            let borrow = instance.borrow();
            ctx.registry().record_of(&*borrow)?
        };

        // Replay the recorded reference id before descending, so back
        // references inside the subtree resolve to this instance.
        let ref_id = match node.attribute(vocab::ATTR_REF_ID) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) => RefId::Explicit(id),
                Err(_) => {
                    ctx.report(SerializationError::at_node(
                        ErrorKind::InvalidXml,
                        format!("malformed object reference id `{raw}`"),
                        node,
                    ));
                    RefId::System
                }
            },
            None => RefId::System,
        };
        ctx.push_object(&instance, ref_id);

        for child in node.children() {
            let Some(property) = record.property(child.tag()) else {
                // Unknown child elements are tolerated for forward
                // compatibility.
                continue;
            };
            let Some(value) = ctx.read_property_value(child, property) else {
                continue;
            };
            // The value may alias the instance (self-referential
            // graphs replay the same handle), so the setter borrows
            // for itself.
            if !property.set(&instance, &value) {
                ctx.report(SerializationError::at_node(
                    ErrorKind::User,
                    format!(
                        "cannot apply value to property `{}` of `{}`",
                        property.name(),
                        record.type_path(),
                    ),
                    child,
                ));
            }
        }

        ctx.pop_object();
        Some(instance)
    }

    fn write(&self, value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode> {
        let record = {
            let borrow = value.borrow();
            match ctx.registry().record_of(&*borrow) {
                Some(record) => record,
                None => {
                    ctx.report(SerializationError::new(
                        ErrorKind::UnknownType,
                        format!("type `{}` is not registered", borrow.type_path()),
                    ));
                    return None;
                }
            }
        };

        // Already written in this pass: emit a reference marker
        // instead of re-descending.
        if let Some(existing) = ctx.object_reference(value) {
            let mut node = XNode::new(record.type_name());
            node.set_attribute(vocab::ATTR_REF, existing.to_string());
            return Some(node);
        }

        let assigned = ctx.push_object(value, RefId::System);

        let mut node = XNode::new(record.type_name());
        if let Some(type_ref) = ctx.reference_type(record.type_id()) {
            node.set_attribute(vocab::ATTR_TYPE, type_ref);
        }
        if let Some(id) = assigned {
            node.set_attribute(vocab::ATTR_REF_ID, id.to_string());
        }

        for property in record.properties() {
            let current = property.get(&*value.borrow());
            let Some(current) = current else {
                let mut wrapper = XNode::new(property.name());
                wrapper.add_child(XNode::new(vocab::NULL_TAG));
                node.add_child(wrapper);
                continue;
            };

            match ctx.write_property_value(&current, property) {
                Some(value_node) => {
                    node.add_child(Self::wrap_property(property.name(), value_node));
                }
                None => {
                    // Partial progress: the error is already recorded,
                    // siblings keep resolving.
                    continue;
                }
            }
        }

        ctx.pop_object();
        Some(node)
    }
}

// -----------------------------------------------------------------------------
// Null property handling

/// Whether a property child node encodes a null value: either the
/// dedicated tag itself or a wrapper with a single `Null` child and
/// no declared type.
pub(crate) fn is_null_node(node: &XNode) -> bool {
    node.tag() == vocab::NULL_TAG
        || (node.attribute(vocab::ATTR_TYPE).is_none()
            && node.attribute(vocab::ATTR_REF).is_none()
            && node.child(vocab::NULL_TAG).is_some())
}

/// The shared null placeholder.
pub(crate) fn null_value() -> SharedValue {
    shared(XNull)
}
