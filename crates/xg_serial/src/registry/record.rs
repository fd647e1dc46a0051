use core::any::TypeId;

use crate::registry::PropertyDescriptor;
use crate::value::{SharedValue, TypePath};

// -----------------------------------------------------------------------------
// TypeRecord

/// The explicit registration of a serializable runtime type.
///
/// A record replaces what the engine would otherwise need runtime
/// reflection for: the type's naming, its declared base chain and
/// facet set (feeding assignability distances), its property table
/// and default constructor, and whether the type is excluded from
/// object-reference tracking.
///
/// # Example
///
/// ```
/// use xg_serial::registry::TypeRecord;
/// use xg_serial::{TypePath, shared};
///
/// # use core::any::Any;
/// # #[derive(Default)]
/// # struct Sprite;
/// # impl TypePath for Sprite {
/// #     fn type_path() -> &'static str { "demo::Sprite" }
/// #     fn type_name() -> &'static str { "Sprite" }
/// # }
/// # impl xg_serial::GraphValue for Sprite {
/// #     fn type_path(&self) -> &'static str { "demo::Sprite" }
/// #     fn as_any(&self) -> &dyn Any { self }
/// #     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// # }
/// # struct Drawable;
/// # impl TypePath for Drawable {
/// #     fn type_path() -> &'static str { "demo::Drawable" }
/// #     fn type_name() -> &'static str { "Drawable" }
/// # }
/// let record = TypeRecord::of::<Sprite>()
///     .with_facet::<Drawable>()
///     .with_constructor(|| shared(Sprite::default()));
///
/// assert_eq!(record.type_name(), "Sprite");
/// ```
#[derive(Clone)]
pub struct TypeRecord {
    type_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    // Ordered closest-first; transitive bases come from their own records.
    bases: Vec<TypeId>,
    facets: Vec<TypeId>,
    excluded: bool,
    properties: Vec<PropertyDescriptor>,
    construct: Option<fn() -> SharedValue>,
}

impl TypeRecord {
    /// Create an empty record for `T`.
    pub fn of<T: TypePath + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            bases: Vec::new(),
            facets: Vec::new(),
            excluded: false,
            properties: Vec::new(),
            construct: None,
        }
    }

    /// Declare a direct base type. Order is significant: the first
    /// declared base is the closest.
    pub fn with_base<B: 'static>(mut self) -> Self {
        self.bases.push(TypeId::of::<B>());
        self
    }

    /// Declare a facet (interface-like marker) the type satisfies.
    pub fn with_facet<F: 'static>(mut self) -> Self {
        self.facets.push(TypeId::of::<F>());
        self
    }

    /// Exclude the type from object-reference tracking. Excluded
    /// values are always written inline and never receive an id.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Register a property descriptor.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Register the default constructor used when a contract does not
    /// create its value externally.
    pub fn with_constructor(mut self, construct: fn() -> SharedValue) -> Self {
        self.construct = Some(construct);
        self
    }

    /// Returns the [`TypeId`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type path.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the short type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the declared direct bases, closest first.
    #[inline]
    pub fn bases(&self) -> &[TypeId] {
        &self.bases
    }

    /// Returns the declared facets.
    #[inline]
    pub fn facets(&self) -> &[TypeId] {
        &self.facets
    }

    /// Whether the type is excluded from reference tracking.
    #[inline]
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Returns the property table in registration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Returns the property with the given name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Build a default instance, if a constructor was registered.
    pub fn construct(&self) -> Option<SharedValue> {
        self.construct.map(|f| f())
    }

    /// Whether a default constructor was registered.
    #[inline]
    pub fn has_constructor(&self) -> bool {
        self.construct.is_some()
    }
}

impl core::fmt::Debug for TypeRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeRecord")
            .field("type_path", &self.type_path)
            .field("excluded", &self.excluded)
            .field("properties", &self.properties.len())
            .finish()
    }
}
