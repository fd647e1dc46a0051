use crate::hash::HashMap;
use crate::value::{SharedValue, identity};

// -----------------------------------------------------------------------------
// RefId

/// How an object entering the context wants to be tracked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefId {
    /// Let the table allocate the next free id (write pass), or skip
    /// tracking for excluded types.
    System,
    /// Replay the id recorded in the document (read pass).
    Explicit(u64),
    /// Never track this object, regardless of its type.
    Untracked,
}

// -----------------------------------------------------------------------------
// ObjectRefTable

/// Bidirectional instance/id table for one serialization pass.
///
/// Ids are dense and start at 1; identity is the allocation address
/// of the shared handle, so clones of the same `Rc` are the same
/// object and equal but distinct values are not.
#[derive(Default)]
pub struct ObjectRefTable {
    by_id: HashMap<u64, SharedValue>,
    id_by_identity: HashMap<usize, u64>,
    next: u64,
}

impl ObjectRefTable {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::default(),
            id_by_identity: HashMap::default(),
            next: 1,
        }
    }

    /// Forget everything and restart id allocation at 1.
    pub fn clear(&mut self) {
        self.by_id.clear();
        self.id_by_identity.clear();
        self.next = 1;
    }

    /// The id previously assigned to this instance.
    pub fn id_of(&self, value: &SharedValue) -> Option<u64> {
        self.id_by_identity.get(&identity(value)).copied()
    }

    /// The instance behind a document id.
    pub fn value_of(&self, id: u64) -> Option<&SharedValue> {
        self.by_id.get(&id)
    }

    /// Assign the next free id to `value`, or return the existing
    /// assignment.
    pub fn allocate(&mut self, value: &SharedValue) -> u64 {
        if let Some(existing) = self.id_of(value) {
            return existing;
        }
        let id = self.next;
        self.next += 1;
        self.by_id.insert(id, value.clone());
        self.id_by_identity.insert(identity(value), id);
        id
    }

    /// Bind `value` to a specific document id. Returns `false` when
    /// the id is already bound to a different instance.
    pub fn insert_explicit(&mut self, id: u64, value: &SharedValue) -> bool {
        if let Some(existing) = self.by_id.get(&id) {
            return identity(existing) == identity(value);
        }
        self.by_id.insert(id, value.clone());
        self.id_by_identity.insert(identity(value), id);
        if id >= self.next {
            self.next = id + 1;
        }
        true
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ObjectRefTable;
    use crate::value::shared;

    #[test]
    fn allocation_is_dense_from_one() {
        let mut table = ObjectRefTable::new();
        let a = shared(1_i32);
        let b = shared(2_i32);
        assert_eq!(table.allocate(&a), 1);
        assert_eq!(table.allocate(&b), 2);
        assert_eq!(table.allocate(&a), 1);
        assert_eq!(table.id_of(&b), Some(2));
    }

    #[test]
    fn explicit_binding_rejects_conflicts() {
        let mut table = ObjectRefTable::new();
        let a = shared("a".to_owned());
        let b = shared("b".to_owned());
        assert!(table.insert_explicit(5, &a));
        assert!(table.insert_explicit(5, &a));
        assert!(!table.insert_explicit(5, &b));
        // Allocation continues past the highest explicit id.
        assert_eq!(table.allocate(&b), 6);
    }

    #[test]
    fn clear_restarts_allocation() {
        let mut table = ObjectRefTable::new();
        let a = shared(0_u8);
        table.allocate(&a);
        table.clear();
        assert!(table.id_of(&a).is_none());
        assert_eq!(table.allocate(&a), 1);
    }
}
