use core::any::TypeId;

use xg_tree::{XNode, vocab};

use crate::context::{RefId, SerializationContext};
use crate::contract::object::{is_null_node, null_value};
use crate::contract::{Contract, TypeMatch};
use crate::error::{ErrorKind, SerializationError};
use crate::priority::SupportPriority;
use crate::registry::TypeRecord;
use crate::value::{SharedValue, XList, XMap, XNull, shared};

// Collections are reference types: consult the table before
// descending and register under the recorded id while reading.

fn reference_marker(type_name: &str, id: u64) -> XNode {
    let mut node = XNode::new(type_name);
    node.set_attribute(vocab::ATTR_REF, id.to_string());
    node
}

fn replay_ref_id(node: &XNode, ctx: &mut SerializationContext) -> RefId {
    match node.attribute(vocab::ATTR_REF_ID) {
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
    }
}

fn wrap_item(tag: &str, value_node: XNode) -> XNode {
    if value_node.tag() == vocab::NULL_TAG {
        let mut wrapper = XNode::new(tag);
        wrapper.add_child(value_node);
        wrapper
    } else {
        let mut node = value_node;
        node.set_tag(tag);
        node
    }
}

// -----------------------------------------------------------------------------
// ListContract

/// Type-matched contract for [`XList`], one `XItem` child per
/// element.
pub struct ListContract {
    matcher: TypeMatch,
}

impl Default for ListContract {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ListContract {
    /// Create the contract.
    pub fn new() -> Self {
        Self {
            matcher: TypeMatch::of::<XList>(),
        }
    }
}

impl Contract for ListContract {
    fn kind(&self) -> &'static str {
        "List"
    }

    fn support_for_type(&self, record: &TypeRecord, ctx: &SerializationContext) -> SupportPriority {
        self.matcher.support(record.type_id(), ctx.registry())
    }

    fn create(&self, _node: &XNode, _ctx: &mut SerializationContext) -> Option<SharedValue> {
        Some(shared(XList::new()))
    }

    fn read(
        &self,
        node: &XNode,
        instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        let instance = instance?.clone();
        let ref_id = replay_ref_id(node, ctx);
        ctx.push_object(&instance, ref_id);

        for child in node.children() {
            if child.tag() != vocab::X_ITEM {
                continue;
            }
            let element = if is_null_node(child) {
                Some(null_value())
            } else {
                ctx.read_value(child)
            };
            let Some(element) = element else { continue };
            match instance.borrow_mut().downcast_mut::<XList>() {
                Some(list) => list.0.push(element),
                None => {
                    ctx.report(SerializationError::at_node(
                        ErrorKind::User,
                        "list contract applied to a non-list instance",
                        node,
                    ));
                    ctx.pop_object();
                    return None;
                }
            }
        }

        ctx.pop_object();
        Some(instance)
    }

    fn write(&self, value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode> {
        if let Some(existing) = ctx.object_reference(value) {
            return Some(reference_marker("XList", existing));
        }

        let elements = {
            let borrow = value.borrow();
            let Some(list) = borrow.downcast_ref::<XList>() else {
                panic!(
                    "list contract type mismatched with value type `{}`",
                    borrow.type_path(),
                );
            };
            list.0.clone()
        };

        let assigned = ctx.push_object(value, RefId::System);

        let mut node = XNode::new("XList");
        if let Some(type_ref) = ctx.reference_type(TypeId::of::<XList>()) {
            node.set_attribute(vocab::ATTR_TYPE, type_ref);
        }
        if let Some(id) = assigned {
            node.set_attribute(vocab::ATTR_REF_ID, id.to_string());
        }

        for element in &elements {
            if element.borrow().is::<XNull>() {
                let mut item = XNode::new(vocab::X_ITEM);
                item.add_child(XNode::new(vocab::NULL_TAG));
                node.add_child(item);
                continue;
            }
            match ctx.write_value(element) {
                Some(element_node) => node.add_child(wrap_item(vocab::X_ITEM, element_node)),
                None => continue,
            }
        }

        ctx.pop_object();
        Some(node)
    }
}

// -----------------------------------------------------------------------------
// MapContract

/// Type-matched contract for [`XMap`], one `XItem` child per entry
/// nesting `XKey` and `XValue`.
pub struct MapContract {
    matcher: TypeMatch,
}

impl Default for MapContract {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MapContract {
    /// Create the contract.
    pub fn new() -> Self {
        Self {
            matcher: TypeMatch::of::<XMap>(),
        }
    }

    fn read_slot(
        item: &XNode,
        tag: &str,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        let Some(slot) = item.child(tag) else {
            ctx.report(SerializationError::at_node(
                ErrorKind::InvalidXml,
                format!("map item is missing its `{tag}` child"),
                item,
            ));
            return None;
        };
        if is_null_node(slot) {
            Some(null_value())
        } else {
            ctx.read_value(slot)
        }
    }

    fn write_slot(
        tag: &'static str,
        value: &SharedValue,
        ctx: &mut SerializationContext,
    ) -> Option<XNode> {
        if value.borrow().is::<XNull>() {
            let mut wrapper = XNode::new(tag);
            wrapper.add_child(XNode::new(vocab::NULL_TAG));
            return Some(wrapper);
        }
        ctx.write_value(value).map(|node| wrap_item(tag, node))
    }
}

impl Contract for MapContract {
    fn kind(&self) -> &'static str {
        "Map"
    }

    fn support_for_type(&self, record: &TypeRecord, ctx: &SerializationContext) -> SupportPriority {
        self.matcher.support(record.type_id(), ctx.registry())
    }

    fn create(&self, _node: &XNode, _ctx: &mut SerializationContext) -> Option<SharedValue> {
        Some(shared(XMap::new()))
    }

    fn read(
        &self,
        node: &XNode,
        instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        let instance = instance?.clone();
        let ref_id = replay_ref_id(node, ctx);
        ctx.push_object(&instance, ref_id);

        for item in node.children() {
            if item.tag() != vocab::X_ITEM {
                continue;
            }
            let Some(key) = Self::read_slot(item, vocab::X_KEY, ctx) else {
                continue;
            };
            let Some(value) = Self::read_slot(item, vocab::X_VALUE, ctx) else {
                continue;
            };
            match instance.borrow_mut().downcast_mut::<XMap>() {
                Some(map) => map.0.push((key, value)),
                None => {
                    ctx.report(SerializationError::at_node(
                        ErrorKind::User,
                        "map contract applied to a non-map instance",
                        node,
                    ));
                    ctx.pop_object();
                    return None;
                }
            }
        }

        ctx.pop_object();
        Some(instance)
    }

    fn write(&self, value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode> {
        if let Some(existing) = ctx.object_reference(value) {
            return Some(reference_marker("XMap", existing));
        }

        let entries = {
            let borrow = value.borrow();
            let Some(map) = borrow.downcast_ref::<XMap>() else {
                panic!(
                    "map contract type mismatched with value type `{}`",
                    borrow.type_path(),
                );
            };
            map.0.clone()
        };

        let assigned = ctx.push_object(value, RefId::System);

        let mut node = XNode::new("XMap");
        if let Some(type_ref) = ctx.reference_type(TypeId::of::<XMap>()) {
            node.set_attribute(vocab::ATTR_TYPE, type_ref);
        }
        if let Some(id) = assigned {
            node.set_attribute(vocab::ATTR_REF_ID, id.to_string());
        }

        for (key, entry_value) in &entries {
            let mut item = XNode::new(vocab::X_ITEM);
            let Some(key_node) = Self::write_slot(vocab::X_KEY, key, ctx) else {
                continue;
            };
            let Some(value_node) = Self::write_slot(vocab::X_VALUE, entry_value, ctx) else {
                continue;
            };
            item.add_child(key_node);
            item.add_child(value_node);
            node.add_child(item);
        }

        ctx.pop_object();
        Some(node)
    }
}
