//! The explicit type registry.
//!
//! Every serializable type is described by a [`TypeRecord`] holding
//! its naming, declared base chain and facets, property table and
//! constructor. The registry indexes records by [`TypeId`], full path
//! and short name, and answers the assignability-distance queries the
//! type-matched contracts rank with.

use core::any::TypeId;
use std::sync::OnceLock;

use crate::hash::{HashMap, HashSet};
use crate::value::{GraphValue, XList, XMap, XNull};

mod property;
mod record;

pub use property::{ContractAnnotation, PropertyDescriptor, PropertyGetFn, PropertySetFn};
pub use record::TypeRecord;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The central store of [`TypeRecord`]s.
///
/// Built once, passed by reference into every serialization context;
/// only the outermost composition point defaults to the shared
/// process-wide instance from [`TypeRegistry::global`].
///
/// # Example
///
/// ```
/// use xg_serial::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let record = registry.get_with_type_name("String").unwrap();
/// assert_eq!(record.type_path(), "alloc::string::String");
/// ```
pub struct TypeRegistry {
    records: HashMap<TypeId, TypeRecord>,
    path_to_id: HashMap<&'static str, TypeId>,
    name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            records: HashMap::default(),
            path_to_id: HashMap::default(),
            name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a registry with default registrations for the built-in
    /// value types.
    ///
    /// Primitives and `String` are registered as excluded types: they
    /// are always written inline and never reference-tracked.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        macro_rules! register_scalar {
            ($($ty:ty),*) => {
                $( registry.register(TypeRecord::of::<$ty>().excluded()); )*
            };
        }
        register_scalar!(
            bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
            String
        );

        registry.register(TypeRecord::of::<XNull>().excluded());
        registry.register(
            TypeRecord::of::<XList>().with_constructor(|| crate::value::shared(XList::new())),
        );
        registry
            .register(TypeRecord::of::<XMap>().with_constructor(|| crate::value::shared(XMap::new())));
        registry
    }

    /// The process-wide registry: built-in registrations plus every
    /// [`register_type!`](crate::register_type) submission. Built
    /// lazily, immutable afterwards.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let mut registry = TypeRegistry::new();
            registry.auto_register();
            registry
        })
    }

    /// Register a record, doing nothing if the type is already
    /// present. Returns whether the record was inserted.
    pub fn register(&mut self, record: TypeRecord) -> bool {
        let type_id = record.type_id();
        if self.records.contains_key(&type_id) {
            return false;
        }

        let type_name = record.type_name();
        if !self.ambiguous_names.contains(type_name) {
            if self.name_to_id.contains_key(type_name) {
                self.name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.name_to_id.insert(type_name, type_id);
            }
        }

        // For new types, the full path cannot be duplicated.
        self.path_to_id.insert(record.type_path(), type_id);
        self.records.insert(type_id, record);
        true
    }

    /// Registers every type declared via
    /// [`register_type!`](crate::register_type).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    /// Requires the `auto_register` feature; without it this is a
    /// no-op returning `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for registration in inventory::iter::<TypeRegistration> {
                self.register((registration.build)());
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Whether the type with the given [`TypeId`] is registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.records.contains_key(&type_id)
    }

    /// Returns the record of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeRecord> {
        self.records.get(&type_id)
    }

    /// Returns the record of the type with the given full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeRecord> {
        match self.path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the record of the type with the given short name.
    ///
    /// If the name is ambiguous, returns `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeRecord> {
        match (self.name_to_id.get(type_name), self.path_to_id.get(type_name)) {
            (Some(id), _) | (None, Some(id)) => self.get(*id),
            (None, None) => None,
        }
    }

    /// Resolve a stored type name: full path first, then unambiguous
    /// short name.
    pub fn resolve_name(&self, name: &str) -> Option<&TypeRecord> {
        self.get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
    }

    /// Returns `true` if the given short name matches multiple
    /// registered types.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the record of a live value's concrete type.
    pub fn record_of(&self, value: &dyn GraphValue) -> Option<&TypeRecord> {
        self.get(value.as_any().type_id())
    }

    /// Returns an iterator over the registered records.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeRecord> {
        self.records.values()
    }

    /// Inheritance distance from `candidate` up its declared base
    /// chain to `target`: 0 for the type itself, 1 for a direct base,
    /// and so on. `None` when `target` is not an ancestor.
    pub fn base_distance(&self, candidate: TypeId, target: TypeId) -> Option<u32> {
        if candidate == target {
            return Some(0);
        }
        let mut visited = HashSet::default();
        let mut frontier = vec![candidate];
        let mut depth = 0_u32;

        while !frontier.is_empty() {
            depth += 1;
            let mut next = Vec::new();
            for ty in frontier.drain(..) {
                let Some(record) = self.get(ty) else { continue };
                for base in record.bases() {
                    if *base == target {
                        return Some(depth);
                    }
                    if visited.insert(*base) {
                        next.push(*base);
                    }
                }
            }
            frontier = next;
        }
        None
    }

    /// Facet distance from `candidate` to a facet `target`: 1 when
    /// declared on the type itself, 1 + base depth when declared on an
    /// ancestor. `None` when no ancestor declares the facet.
    pub fn facet_distance(&self, candidate: TypeId, target: TypeId) -> Option<u32> {
        let mut visited = HashSet::default();
        let mut frontier = vec![candidate];
        let mut depth = 0_u32;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for ty in frontier.drain(..) {
                let Some(record) = self.get(ty) else { continue };
                if record.facets().contains(&target) {
                    return Some(depth + 1);
                }
                for base in record.bases() {
                    if visited.insert(*base) {
                        next.push(*base);
                    }
                }
            }
            frontier = next;
            depth += 1;
        }
        None
    }
}

// -----------------------------------------------------------------------------
// Auto registration

/// One [`register_type!`](crate::register_type) submission.
pub struct TypeRegistration {
    /// Builds the record at registry construction time.
    pub build: fn() -> TypeRecord,
}

#[cfg(feature = "auto_register")]
inventory::collect!(TypeRegistration);

/// Declare a [`TypeRecord`] for process-wide auto registration.
///
/// The record is built lazily when [`TypeRegistry::global`] (or any
/// explicit [`TypeRegistry::auto_register`] call) collects the
/// submissions. Without the `auto_register` feature the declaration
/// compiles away.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! register_type {
    ($record:expr) => {
        $crate::__private::inventory::submit! {
            $crate::registry::TypeRegistration { build: || $record }
        }
    };
}

/// Declare a [`TypeRecord`] for process-wide auto registration.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! register_type {
    ($record:expr) => {};
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::{Any, TypeId};

    use super::{TypeRecord, TypeRegistry};
    use crate::value::{GraphValue, TypePath};

    macro_rules! test_type {
        ($ty:ident, $path:literal) => {
            struct $ty;
            impl TypePath for $ty {
                fn type_path() -> &'static str {
                    $path
                }
                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }
            impl GraphValue for $ty {
                fn type_path(&self) -> &'static str {
                    $path
                }
                fn as_any(&self) -> &dyn Any {
                    self
                }
                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }
            }
        };
    }

    test_type!(Animal, "tests::Animal");
    test_type!(Dog, "tests::Dog");
    test_type!(Puppy, "tests::Puppy");
    struct Pet; // facet marker

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::empty();
        registry.register(TypeRecord::of::<Animal>());
        registry.register(TypeRecord::of::<Dog>().with_base::<Animal>().with_facet::<Pet>());
        registry.register(TypeRecord::of::<Puppy>().with_base::<Dog>());
        registry
    }

    #[test]
    fn base_distance_walks_chain() {
        let registry = registry();
        let d = |a: TypeId, b: TypeId| registry.base_distance(a, b);

        assert_eq!(d(TypeId::of::<Dog>(), TypeId::of::<Dog>()), Some(0));
        assert_eq!(d(TypeId::of::<Dog>(), TypeId::of::<Animal>()), Some(1));
        assert_eq!(d(TypeId::of::<Puppy>(), TypeId::of::<Animal>()), Some(2));
        assert_eq!(d(TypeId::of::<Animal>(), TypeId::of::<Dog>()), None);
    }

    #[test]
    fn facet_distance_counts_from_declaration() {
        let registry = registry();
        let pet = TypeId::of::<Pet>();

        assert_eq!(registry.facet_distance(TypeId::of::<Dog>(), pet), Some(1));
        assert_eq!(registry.facet_distance(TypeId::of::<Puppy>(), pet), Some(2));
        assert_eq!(registry.facet_distance(TypeId::of::<Animal>(), pet), None);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut registry = registry();
        assert!(!registry.register(TypeRecord::of::<Dog>()));
    }

    #[test]
    fn name_resolution_prefers_path() {
        let registry = registry();
        assert_eq!(
            registry.resolve_name("tests::Dog").unwrap().type_id(),
            TypeId::of::<Dog>()
        );
        assert_eq!(
            registry.resolve_name("Dog").unwrap().type_id(),
            TypeId::of::<Dog>()
        );
        assert!(registry.resolve_name("Cat").is_none());
    }

    #[test]
    fn ambiguous_short_names_do_not_resolve() {
        struct OtherDog;
        impl TypePath for OtherDog {
            fn type_path() -> &'static str {
                "tests::other::Dog"
            }
            fn type_name() -> &'static str {
                "Dog"
            }
        }

        let mut registry = registry();
        registry.register(TypeRecord::of::<OtherDog>());

        assert!(registry.is_ambiguous("Dog"));
        assert!(registry.get_with_type_name("Dog").is_none());
        assert!(registry.resolve_name("tests::other::Dog").is_some());
    }

    #[test]
    fn builtins_are_excluded_scalars() {
        let registry = TypeRegistry::new();
        assert!(registry.get(TypeId::of::<i32>()).unwrap().is_excluded());
        assert!(registry.get(TypeId::of::<String>()).unwrap().is_excluded());
        assert!(!registry
            .get(TypeId::of::<crate::value::XList>())
            .unwrap()
            .is_excluded());
    }
}
