use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use crate::hash::HashMap;
use crate::priority::{SupportLevel, SupportPriority};
use crate::registry::TypeRegistry;
use crate::value::TypePath;

// -----------------------------------------------------------------------------
// TypeMatch

/// Assignability matching against a target type, for type-matched
/// contracts.
///
/// A candidate matches when the target is reachable up its declared
/// base chain (priority `(Type, distance)`) or, for a facet target,
/// when any ancestor declares the facet (priority
/// `(Interface, distance)`). The result per concrete candidate is
/// cached the first time it is queried.
pub struct TypeMatch {
    target: TypeId,
    target_path: &'static str,
    facet: bool,
    cache: RwLock<HashMap<TypeId, SupportPriority>>,
}

impl TypeMatch {
    /// Match candidates assignable to the concrete type `T`.
    pub fn of<T: TypePath + 'static>() -> Self {
        Self {
            target: TypeId::of::<T>(),
            target_path: T::type_path(),
            facet: false,
            cache: RwLock::new(HashMap::default()),
        }
    }

    /// Match candidates satisfying the facet marker `T`.
    pub fn facet<T: TypePath + 'static>() -> Self {
        Self {
            target: TypeId::of::<T>(),
            target_path: T::type_path(),
            facet: true,
            cache: RwLock::new(HashMap::default()),
        }
    }

    /// Returns the target type id.
    #[inline]
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Returns the target type path.
    #[inline]
    pub fn target_path(&self) -> &'static str {
        self.target_path
    }

    /// Whether the target is a facet marker.
    #[inline]
    pub fn is_facet(&self) -> bool {
        self.facet
    }

    /// Probe a candidate type.
    pub fn support(&self, candidate: TypeId, registry: &TypeRegistry) -> SupportPriority {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&candidate)
        {
            return *cached;
        }

        let priority = if self.facet {
            match registry.facet_distance(candidate, self.target) {
                Some(distance) => SupportPriority::new(SupportLevel::Interface, distance),
                None => SupportPriority::NOT_SUPPORTED,
            }
        } else {
            match registry.base_distance(candidate, self.target) {
                Some(distance) => SupportPriority::new(SupportLevel::Type, distance),
                None => SupportPriority::NOT_SUPPORTED,
            }
        };

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(candidate, priority);
        priority
    }
}

impl core::fmt::Debug for TypeMatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMatch")
            .field("target", &self.target_path)
            .field("facet", &self.facet)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::{Any, TypeId};

    use super::TypeMatch;
    use crate::priority::{SupportLevel, SupportPriority};
    use crate::registry::{TypeRecord, TypeRegistry};
    use crate::value::{GraphValue, TypePath};

    struct Base;
    impl TypePath for Base {
        fn type_path() -> &'static str {
            "tests::Base"
        }
        fn type_name() -> &'static str {
            "Base"
        }
    }

    struct Derived;
    impl TypePath for Derived {
        fn type_path() -> &'static str {
            "tests::Derived"
        }
        fn type_name() -> &'static str {
            "Derived"
        }
    }
    impl GraphValue for Derived {
        fn type_path(&self) -> &'static str {
            "tests::Derived"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Marker;
    impl TypePath for Marker {
        fn type_path() -> &'static str {
            "tests::Marker"
        }
        fn type_name() -> &'static str {
            "Marker"
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::empty();
        registry.register(TypeRecord::of::<Base>().with_facet::<Marker>());
        registry.register(TypeRecord::of::<Derived>().with_base::<Base>());
        registry
    }

    #[test]
    fn base_target_ranks_at_type_level() {
        let registry = registry();
        let matcher = TypeMatch::of::<Base>();

        assert_eq!(
            matcher.support(TypeId::of::<Base>(), &registry),
            SupportPriority::exact(SupportLevel::Type)
        );
        assert_eq!(
            matcher.support(TypeId::of::<Derived>(), &registry),
            SupportPriority::new(SupportLevel::Type, 1)
        );
        assert_eq!(
            matcher.support(TypeId::of::<Marker>(), &registry),
            SupportPriority::NOT_SUPPORTED
        );
    }

    #[test]
    fn facet_target_ranks_at_interface_level() {
        let registry = registry();
        let matcher = TypeMatch::facet::<Marker>();

        assert_eq!(
            matcher.support(TypeId::of::<Base>(), &registry),
            SupportPriority::new(SupportLevel::Interface, 1)
        );
        assert_eq!(
            matcher.support(TypeId::of::<Derived>(), &registry),
            SupportPriority::new(SupportLevel::Interface, 2)
        );
    }

    #[test]
    fn cached_result_survives_registry_swap() {
        let matcher = TypeMatch::of::<Base>();
        let registry = registry();
        let first = matcher.support(TypeId::of::<Derived>(), &registry);

        // An empty registry would answer NotSupported, but the cache
        // holds the first answer for this concrete candidate.
        let empty = TypeRegistry::empty();
        assert_eq!(matcher.support(TypeId::of::<Derived>(), &empty), first);
    }
}
