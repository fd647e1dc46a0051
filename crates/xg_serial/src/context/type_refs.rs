use core::any::TypeId;

use xg_tree::{XNode, vocab};

use crate::descriptor::TypeDescriptor;
use crate::hash::HashMap;

// -----------------------------------------------------------------------------
// TypeRefTable

/// Per-pass type deduplication table.
///
/// The first value of each type allocates a `type_N` id and a
/// descriptor entry; later values of the same type reuse the id. On
/// read, ids bound from the document's type container resolve back
/// to registry types, and a legacy name that collapses onto an
/// already-bound id becomes an alias instead of a duplicate entry.
#[derive(Default)]
pub struct TypeRefTable {
    // Insertion-ordered so the flushed container is deterministic.
    entries: Vec<(String, TypeId, TypeDescriptor)>,
    id_by_type: HashMap<TypeId, String>,
    type_by_id: HashMap<String, TypeId>,
    aliases: HashMap<String, String>,
    next: usize,
}

impl TypeRefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.id_by_type.clear();
        self.type_by_id.clear();
        self.aliases.clear();
        self.next = 0;
    }

    /// The id already allocated for a type, if any.
    pub fn id_of(&self, type_id: TypeId) -> Option<&str> {
        self.id_by_type.get(&type_id).map(String::as_str)
    }

    /// Allocate (or reuse) the id for a type, recording the
    /// descriptor parsed from its full path.
    pub fn allocate(&mut self, type_id: TypeId, type_path: &str) -> String {
        if let Some(existing) = self.id_by_type.get(&type_id) {
            return existing.clone();
        }
        let id = format!("{}{}", vocab::TYPE_REF_PREFIX, self.next);
        self.next += 1;
        let descriptor = TypeDescriptor::parse(type_path);
        self.entries.push((id.clone(), type_id, descriptor));
        self.id_by_type.insert(type_id, id.clone());
        self.type_by_id.insert(id.clone(), type_id);
        id
    }

    /// Resolve a document id (following one alias hop) to the bound
    /// type.
    pub fn resolve(&self, id: &str) -> Option<TypeId> {
        let canonical = self.aliases.get(id).map(String::as_str).unwrap_or(id);
        self.type_by_id.get(canonical).copied()
    }

    /// Bind a document id to a type while ingesting a container.
    ///
    /// When the type is already bound under another id, the new id
    /// becomes an alias of the existing binding, which is how a
    /// legacy rename collapses two document entries onto one runtime
    /// type.
    pub fn bind(&mut self, id: String, type_id: TypeId, type_path: &str) {
        if let Some(existing) = self.id_by_type.get(&type_id) {
            if existing != &id {
                self.aliases.insert(id, existing.clone());
            }
            return;
        }
        let descriptor = TypeDescriptor::parse(type_path);
        self.entries.push((id.clone(), type_id, descriptor));
        self.id_by_type.insert(type_id, id.clone());
        self.type_by_id.insert(id, type_id);
    }

    /// Render the type container, or `None` when no type was
    /// referenced this pass.
    pub fn flush(&self) -> Option<XNode> {
        if self.entries.is_empty() {
            return None;
        }
        let mut container = XNode::new(vocab::X_TYPE_CONTAINER);
        for (id, _, descriptor) in &self.entries {
            container.add_child(descriptor.to_node(id));
        }
        Some(container)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use xg_tree::vocab;

    use super::TypeRefTable;

    #[test]
    fn allocation_deduplicates_types() {
        let mut table = TypeRefTable::new();
        let first = table.allocate(TypeId::of::<i32>(), "i32");
        let second = table.allocate(TypeId::of::<String>(), "alloc::string::String");
        let again = table.allocate(TypeId::of::<i32>(), "i32");

        assert_eq!(first, "type_0");
        assert_eq!(second, "type_1");
        assert_eq!(again, "type_0");
        assert_eq!(table.resolve("type_1"), Some(TypeId::of::<String>()));
    }

    #[test]
    fn binding_collapses_to_aliases() {
        let mut table = TypeRefTable::new();
        table.bind("type_0".to_owned(), TypeId::of::<i32>(), "i32");
        // A second document entry for the same runtime type.
        table.bind("type_7".to_owned(), TypeId::of::<i32>(), "i32");

        assert_eq!(table.resolve("type_0"), Some(TypeId::of::<i32>()));
        assert_eq!(table.resolve("type_7"), Some(TypeId::of::<i32>()));
        assert!(table.resolve("type_1").is_none());

        // Only the canonical entry is flushed.
        let container = table.flush().unwrap();
        assert_eq!(container.children().len(), 1);
    }

    #[test]
    fn empty_table_flushes_nothing() {
        let table = TypeRefTable::new();
        assert!(table.flush().is_none());
    }

    #[test]
    fn flushed_container_carries_descriptors() {
        let mut table = TypeRefTable::new();
        table.allocate(TypeId::of::<i32>(), "i32");
        let container = table.flush().unwrap();
        assert_eq!(container.tag(), vocab::X_TYPE_CONTAINER);
        let entry = &container.children()[0];
        assert_eq!(entry.tag(), vocab::X_TYPE);
        assert_eq!(entry.attribute(vocab::ATTR_REF), Some("type_0"));
        assert_eq!(entry.attribute(vocab::ATTR_NAME), Some("i32"));
    }
}
