//! The per-pass serialization context.
//!
//! A [`SerializationContext`] drives one serialize or deserialize
//! pass: it resolves the winning contract per site, keeps the object
//! and type reference tables that make shared and cyclic graphs
//! finite, carries the run parameters and the error list, and hosts
//! the optional legacy-name overlay and external-reference resolver.
//!
//! The context borrows its catalog and registry; only the outermost
//! composition point defaults to the process-wide instances via
//! [`SerializationContext::new`].

use core::any::{Any, TypeId};
use std::sync::Arc;

use xg_tree::{XNode, vocab};

use crate::catalog::ContractCatalog;
use crate::contract::{Contract, is_null_node, null_value};
use crate::descriptor::{TypeDescriptor, strip_version_suffix};
use crate::error::{ErrorChannel, ErrorKind, SerializationError};
use crate::external::ExternalReferenceResolver;
use crate::legacy::LegacyTypeMap;
use crate::priority::SupportPriority;
use crate::registry::{PropertyDescriptor, TypeRecord, TypeRegistry};
use crate::value::SharedValue;

mod object_refs;
mod params;
mod type_refs;

pub use object_refs::{ObjectRefTable, RefId};
pub use params::{ParameterBag, VERSION_PARAMETER};
pub use type_refs::TypeRefTable;

#[cfg(all(debug_assertions, feature = "debug"))]
use crate::trace;

#[cfg(not(all(debug_assertions, feature = "debug")))]
mod trace {
    pub(super) fn push(_type_path: &'static str) {}
    pub(super) fn pop() {}
    pub(super) fn clear() {}
}

// -----------------------------------------------------------------------------
// SerializationContext

/// The state of one serialization pass.
pub struct SerializationContext<'r> {
    catalog: &'r ContractCatalog,
    registry: &'r TypeRegistry,
    run_contracts: Vec<Arc<dyn Contract>>,
    object_stack: Vec<SharedValue>,
    object_refs: ObjectRefTable,
    type_refs: TypeRefTable,
    parameters: ParameterBag,
    errors: ErrorChannel,
    external_resolver: Option<Box<dyn ExternalReferenceResolver>>,
    legacy_map: Option<LegacyTypeMap>,
}

impl Default for SerializationContext<'static> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerializationContext<'static> {
    /// Create a context over the process-wide catalog and registry.
    pub fn new() -> Self {
        Self::with(ContractCatalog::global(), TypeRegistry::global())
    }
}

impl<'r> SerializationContext<'r> {
    /// Create a context over an explicit catalog and registry.
    pub fn with(catalog: &'r ContractCatalog, registry: &'r TypeRegistry) -> Self {
        Self {
            catalog,
            registry,
            run_contracts: Vec::new(),
            object_stack: Vec::new(),
            object_refs: ObjectRefTable::new(),
            type_refs: TypeRefTable::new(),
            parameters: ParameterBag::new(),
            errors: ErrorChannel::new(),
            external_resolver: None,
            legacy_map: None,
        }
    }

    /// The registry this pass resolves types against.
    #[inline]
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// The catalog this pass resolves contracts against.
    #[inline]
    pub fn catalog(&self) -> &'r ContractCatalog {
        self.catalog
    }

    /// Add a run-local contract, consulted before the catalog.
    pub fn add_contract(&mut self, contract: Arc<dyn Contract>) {
        self.run_contracts.push(contract);
    }

    /// Install the legacy type-name overlay.
    pub fn set_legacy_map(&mut self, map: LegacyTypeMap) {
        self.legacy_map = Some(map);
    }

    /// Install the external-reference resolver.
    pub fn set_external_resolver(&mut self, resolver: Box<dyn ExternalReferenceResolver>) {
        self.external_resolver = Some(resolver);
    }

    // ---- errors

    /// Record an error and fire the notification hook.
    pub fn report(&mut self, error: SerializationError) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        let error = {
            let mut error = error;
            error.append_message(&trace::suffix());
            error
        };
        self.errors.report(error);
    }

    /// The errors recorded this pass, in report order.
    #[inline]
    pub fn errors(&self) -> &[SerializationError] {
        self.errors.errors()
    }

    /// Install the per-error notification hook.
    pub fn set_error_hook(&mut self, hook: impl Fn(&SerializationError) + 'static) {
        self.errors.set_hook(hook);
    }

    // ---- parameters

    /// Install or replace a run parameter. Parameters survive pass
    /// resets.
    pub fn set_parameter<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.parameters.set(name, value);
    }

    /// Read a run parameter.
    pub fn parameter<T: Any>(&self, name: &str) -> Option<&T> {
        self.parameters.get(name)
    }

    /// Remove a run parameter, returning whether it existed.
    pub fn remove_parameter(&mut self, name: &str) -> bool {
        self.parameters.remove(name)
    }

    // ---- object references

    /// Enter an object: push it on the walk stack and track it in the
    /// reference table according to `ref_id`. Returns the tracked id,
    /// `None` for excluded or untracked values.
    pub fn push_object(&mut self, value: &SharedValue, ref_id: RefId) -> Option<u64> {
        let assigned = match ref_id {
            RefId::Untracked => None,
            RefId::System => {
                let excluded = {
                    let borrow = value.borrow();
                    self.registry
                        .record_of(&*borrow)
                        .is_some_and(TypeRecord::is_excluded)
                };
                if excluded {
                    None
                } else {
                    Some(self.object_refs.allocate(value))
                }
            }
            RefId::Explicit(id) => {
                if self.object_refs.insert_explicit(id, value) {
                    Some(id)
                } else {
                    self.report(SerializationError::new(
                        ErrorKind::User,
                        format!("object reference id {id} is already bound to another instance"),
                    ));
                    None
                }
            }
        };
        self.object_stack.push(value.clone());
        assigned
    }

    /// Leave the innermost object.
    pub fn pop_object(&mut self) {
        self.object_stack.pop();
    }

    /// The object currently being walked, if any. Lets a contract
    /// running for a property reach its owning instance.
    pub fn current_object(&self) -> Option<&SharedValue> {
        self.object_stack.last()
    }

    /// The id under which `value` was already tracked this pass.
    pub fn object_reference(&self, value: &SharedValue) -> Option<u64> {
        self.object_refs.id_of(value)
    }

    /// The instance tracked under a document id this pass.
    pub fn object_by_reference(&self, id: u64) -> Option<SharedValue> {
        self.object_refs.value_of(id).cloned()
    }

    // ---- type references

    /// The `type_N` reference for a registered type, allocating a
    /// type-container entry on first use. `None` for unregistered
    /// types.
    pub fn reference_type(&mut self, type_id: TypeId) -> Option<String> {
        let record = self.registry.get(type_id)?;
        Some(self.type_refs.allocate(type_id, record.type_path()))
    }

    /// Resolve a node's declared type, from its `type` attribute or a
    /// non-numeric `ref` attribute (stored documents use either
    /// spelling; numeric `ref` values are object back references).
    ///
    /// `None` without an error when the node declares no type at all;
    /// `None` with exactly one recorded `UnknownType` error when the
    /// declaration cannot be resolved.
    pub fn resolve_type(&mut self, node: &XNode) -> Option<TypeId> {
        let declared = declared_type_name(node)?;

        if declared.starts_with(vocab::TYPE_REF_PREFIX) {
            return match self.type_refs.resolve(declared) {
                Some(type_id) => Some(type_id),
                None => {
                    let message = format!("unresolved type reference `{declared}`");
                    self.report(SerializationError::at_node(
                        ErrorKind::UnknownType,
                        message,
                        node,
                    ));
                    None
                }
            };
        }

        let rewritten = match &self.legacy_map {
            Some(map) => map.rewrite(declared).to_owned(),
            None => strip_version_suffix(declared).to_owned(),
        };
        match self.registry.resolve_name(&rewritten) {
            Some(record) => Some(record.type_id()),
            None => {
                if let Some(map) = &self.legacy_map {
                    map.note_unresolved(declared, &rewritten);
                }
                let message = format!("cannot resolve type name `{rewritten}`");
                self.report(SerializationError::at_node(
                    ErrorKind::UnknownType,
                    message,
                    node,
                ));
                None
            }
        }
    }

    // ---- pass entry points

    /// Serialize a value graph into a complete document.
    ///
    /// Resets the per-pass state first (parameters and hooks stay).
    /// Returns `None` when the root value resolves no contract; check
    /// [`errors`](Self::errors) either way, a `Some` result may still
    /// carry partial-progress errors.
    pub fn serialize(&mut self, value: &SharedValue) -> Option<XNode> {
        self.reset_pass();
        let body = self.write_value(value)?;
        let mut root = XNode::new(vocab::X_ROOT);
        root.add_child(body);
        if let Some(container) = self.type_refs.flush() {
            root.prepend_child(container);
        }
        Some(root)
    }

    /// Deserialize a document back into a value graph.
    ///
    /// Accepts either a full document rooted at `XRoot` (the type
    /// container, when present, is ingested first) or a bare value
    /// node.
    pub fn deserialize(&mut self, node: &XNode) -> Option<SharedValue> {
        self.reset_pass();
        if node.tag() != vocab::X_ROOT {
            return self.read_value(node);
        }

        if let Some(container) = node.child(vocab::X_TYPE_CONTAINER) {
            self.ingest_type_container(container);
        }
        match node
            .children()
            .iter()
            .find(|child| child.tag() != vocab::X_TYPE_CONTAINER)
        {
            Some(body) => self.read_value(body),
            None => {
                self.report(SerializationError::at_node(
                    ErrorKind::InvalidXml,
                    "document carries no content node",
                    node,
                ));
                None
            }
        }
    }

    fn reset_pass(&mut self) {
        self.errors.clear();
        self.object_refs.clear();
        self.type_refs.clear();
        self.object_stack.clear();
        trace::clear();
    }

    // ---- value conversion

    /// Write a standalone value through contract resolution.
    pub fn write_value(&mut self, value: &SharedValue) -> Option<XNode> {
        self.write_with(value, None)
    }

    /// Write a property value; the descriptor participates in
    /// contract resolution, so property and annotation contracts can
    /// take over.
    pub fn write_property_value(
        &mut self,
        value: &SharedValue,
        property: &PropertyDescriptor,
    ) -> Option<XNode> {
        self.write_with(value, Some(property))
    }

    fn write_with(
        &mut self,
        value: &SharedValue,
        property: Option<&PropertyDescriptor>,
    ) -> Option<XNode> {
        // Externally resolved instances collapse to a url marker.
        if let Some(resolver) = &self.external_resolver {
            if let Some(url) = resolver.location(value) {
                let tag = {
                    let borrow = value.borrow();
                    self.registry
                        .record_of(&*borrow)
                        .map_or("XExternal", TypeRecord::type_name)
                };
                let mut node = XNode::new(tag);
                node.set_attribute(vocab::ATTR_URL, url);
                return Some(node);
            }
        }

        let record = {
            let borrow = value.borrow();
            self.registry.record_of(&*borrow)
        };
        let Some(contract) = self.select_contract(None, property, record, Some(value)) else {
            let type_path = value.borrow().type_path();
            self.report(SerializationError::new(
                ErrorKind::UnknownType,
                format!("no contract accepts a value of type `{type_path}`"),
            ));
            return None;
        };

        trace::push(value.borrow().type_path());
        let node = contract.write(value, self);
        trace::pop();
        node
    }

    /// Read a standalone value node through contract resolution.
    pub fn read_value(&mut self, node: &XNode) -> Option<SharedValue> {
        self.read_with(node, None)
    }

    /// Read a property value node; see
    /// [`write_property_value`](Self::write_property_value).
    pub fn read_property_value(
        &mut self,
        node: &XNode,
        property: &PropertyDescriptor,
    ) -> Option<SharedValue> {
        self.read_with(node, Some(property))
    }

    fn read_with(
        &mut self,
        node: &XNode,
        property: Option<&PropertyDescriptor>,
    ) -> Option<SharedValue> {
        if is_null_node(node) {
            return Some(null_value());
        }

        // A numeric `ref` replays an already-read instance; anything
        // else in `ref` is a type declaration handled below.
        if let Some(raw) = node.attribute(vocab::ATTR_REF) {
            if let Ok(id) = raw.parse::<u64>() {
                return match self.object_by_reference(id) {
                    Some(value) => Some(value),
                    None => {
                        let message = format!("unresolved object reference `{id}`");
                        self.report(SerializationError::at_node(
                            ErrorKind::InvalidXml,
                            message,
                            node,
                        ));
                        None
                    }
                };
            }
        }

        if let Some(url) = node.attribute(vocab::ATTR_URL) {
            let resolved = self
                .external_resolver
                .as_ref()
                .and_then(|resolver| resolver.resolve(url));
            return match resolved {
                Some(value) => Some(value),
                None => {
                    let message = format!("external reference `{url}` cannot be resolved");
                    self.report(SerializationError::at_node(ErrorKind::User, message, node));
                    None
                }
            };
        }

        // A declared type that fails to resolve aborts this node with
        // the single error resolve_type already recorded.
        let had_type = declared_type_name(node).is_some();
        let type_id = self.resolve_type(node);
        if had_type && type_id.is_none() {
            return None;
        }
        let record = type_id.and_then(|id| self.registry.get(id));

        let Some(contract) = self.select_contract(Some(node), property, record, None) else {
            let message = format!("no contract accepts node `{}`", node.tag());
            self.report(SerializationError::at_node(
                ErrorKind::UnknownType,
                message,
                node,
            ));
            return None;
        };

        if let Some(record) = record {
            trace::push(record.type_path());
        }
        let before = self.errors.len();
        let value = if contract.needs_external_creation() {
            contract.read(node, None, self)
        } else {
            match contract.create(node, self) {
                Some(instance) => contract.read(node, Some(&instance), self),
                None => {
                    if self.errors.len() == before {
                        let message =
                            format!("contract `{}` produced no instance", contract.kind());
                        self.report(SerializationError::at_node(
                            ErrorKind::User,
                            message,
                            node,
                        ));
                    }
                    None
                }
            }
        };
        if record.is_some() {
            trace::pop();
        }
        value
    }

    // ---- contract resolution

    fn pick(
        &self,
        node: Option<&XNode>,
        property: Option<&PropertyDescriptor>,
        record: Option<&TypeRecord>,
        value: Option<&SharedValue>,
    ) -> (Option<Arc<dyn Contract>>, u32) {
        let mut best: Option<Arc<dyn Contract>> = None;
        let mut best_priority = SupportPriority::NOT_SUPPORTED;
        let mut ties = 0_u32;

        let candidates = self
            .run_contracts
            .iter()
            .chain(self.catalog.contracts().iter());
        for contract in candidates {
            let mut priority = SupportPriority::NOT_SUPPORTED;
            if let Some(node) = node {
                priority = priority.min(contract.support_for_node(node, self));
            }
            if let Some(record) = record {
                priority = priority.min(contract.support_for_type(record, self));
            }
            if let Some(value) = value {
                priority = priority.min(contract.support_for_value(&*value.borrow(), self));
            }
            if let Some(property) = property {
                priority = priority.min(contract.support_for_property(property, self));
            }
            if !priority.is_supported() {
                continue;
            }

            // Strict comparison keeps the first-registered winner on
            // genuine ties.
            if priority < best_priority || best.is_none() {
                best = Some(contract.clone());
                best_priority = priority;
                ties = 1;
            } else if priority == best_priority {
                ties += 1;
            }
        }
        (best, ties)
    }

    fn select_contract(
        &mut self,
        node: Option<&XNode>,
        property: Option<&PropertyDescriptor>,
        record: Option<&TypeRecord>,
        value: Option<&SharedValue>,
    ) -> Option<Arc<dyn Contract>> {
        let (winner, ties) = self.pick(node, property, record, value);
        let winner = winner?;
        if ties > 1 {
            self.report(SerializationError::new(
                ErrorKind::MultipleContract,
                format!(
                    "{ties} contracts claim the winning priority; `{}` was registered first and \
                     is used",
                    winner.kind(),
                ),
            ));
        }
        match winner.materialize(property, self.catalog) {
            Some(materialized) => Some(Arc::from(materialized)),
            None => Some(winner),
        }
    }

    // ---- type container ingestion

    fn ingest_type_container(&mut self, container: &XNode) {
        for entry in container.children() {
            if entry.tag() != vocab::X_TYPE {
                continue;
            }
            let Some(id) = entry.attribute(vocab::ATTR_REF) else {
                self.report(SerializationError::at_node(
                    ErrorKind::InvalidXml,
                    "type entry carries no reference id",
                    entry,
                ));
                continue;
            };
            let id = id.to_owned();
            let Some(descriptor) = TypeDescriptor::from_node(entry) else {
                self.report(SerializationError::at_node(
                    ErrorKind::InvalidXml,
                    "type entry carries no name",
                    entry,
                ));
                continue;
            };

            let full = descriptor.full_path();
            let rewritten = match &self.legacy_map {
                Some(map) => map.rewrite(&full).to_owned(),
                None => strip_version_suffix(&full).to_owned(),
            };
            match self.registry.resolve_name(&rewritten) {
                Some(matched) => {
                    self.type_refs
                        .bind(id, matched.type_id(), matched.type_path());
                }
                None => {
                    if let Some(map) = &self.legacy_map {
                        map.note_unresolved(&full, &rewritten);
                    }
                    let message = format!("cannot resolve stored type `{full}`");
                    self.report(SerializationError::at_node(
                        ErrorKind::UnknownType,
                        message,
                        entry,
                    ));
                }
            }
        }
    }
}

/// The type declaration a value node carries, through either the
/// `type` attribute or a non-numeric `ref` attribute.
fn declared_type_name(node: &XNode) -> Option<&str> {
    node.attribute(vocab::ATTR_TYPE).or_else(|| {
        node.attribute(vocab::ATTR_REF)
            .filter(|raw| raw.parse::<u64>().is_err())
    })
}

// -----------------------------------------------------------------------------
// Tests
