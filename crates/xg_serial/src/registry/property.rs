use core::any::TypeId;

use crate::value::{GraphValue, SharedValue, TypePath};

// -----------------------------------------------------------------------------
// ContractAnnotation

/// A declarative annotation attached to a property descriptor,
/// directing the engine to a specific contract.
///
/// The annotation carries a stable factory key into the contract
/// catalog's factory map, not a contract instance: the decorator
/// builds a fresh sub-contract from the key for every resolved
/// occurrence. `depth` is the distance of the concrete annotation
/// from its declared base and feeds the Attribute-level subpriority.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContractAnnotation {
    factory_key: &'static str,
    depth: u32,
}

impl ContractAnnotation {
    /// Create an annotation naming a contract factory.
    #[inline]
    pub const fn new(factory_key: &'static str) -> Self {
        Self {
            factory_key,
            depth: 0,
        }
    }

    /// Set the distance of the annotation from its declared base.
    #[inline]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Returns the factory key.
    #[inline]
    pub const fn factory_key(&self) -> &'static str {
        self.factory_key
    }

    /// Returns the annotation depth.
    #[inline]
    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// Typed accessor reading a property off a live owner instance.
///
/// Plain fields are wrapped into a fresh handle on every call; object
/// properties return a clone of the stored handle so identity
/// survives. `None` means the property is currently null.
pub type PropertyGetFn = fn(&dyn GraphValue) -> Option<SharedValue>;

/// Typed accessor writing a property on a live owner instance.
///
/// Takes the owner as a shared handle so the accessor sequences its
/// own borrows: inspect the value first, then borrow the owner
/// mutably. The value handle may alias the owner (a self-referential
/// graph replays the same instance), so the two must never be
/// borrowed at once.
///
/// An [`XNull`](crate::value::XNull) value clears the property.
/// Returns `false` when the value cannot be applied.
pub type PropertySetFn = fn(&SharedValue, &SharedValue) -> bool;

/// An explicitly registered property of a serializable type.
///
/// The `(declaring type, property name, property type)` triple is a
/// plain value matched by property contracts; the accessors replace
/// runtime reflection.
///
/// # Example
///
/// ```
/// use xg_serial::registry::PropertyDescriptor;
/// use xg_serial::{GraphValue, TypePath, shared};
///
/// # use core::any::Any;
/// struct Point { x: i32 }
/// # impl TypePath for Point {
/// #     fn type_path() -> &'static str { "demo::Point" }
/// #     fn type_name() -> &'static str { "Point" }
/// # }
/// # impl GraphValue for Point {
/// #     fn type_path(&self) -> &'static str { "demo::Point" }
/// #     fn as_any(&self) -> &dyn Any { self }
/// #     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// # }
///
/// let x = PropertyDescriptor::new::<Point, i32>(
///     "x",
///     |v| v.downcast_ref::<Point>().map(|p| shared(p.x)),
///     |owner, pv| {
///         let Some(x) = pv.borrow().downcast_ref::<i32>().copied() else {
///             return false;
///         };
///         let mut guard = owner.borrow_mut();
///         let Some(point) = guard.downcast_mut::<Point>() else {
///             return false;
///         };
///         point.x = x;
///         true
///     },
/// );
///
/// let point = Point { x: 7 };
/// let value = x.get(&point).unwrap();
/// assert_eq!(*value.borrow().downcast_ref::<i32>().unwrap(), 7);
/// ```
#[derive(Clone)]
pub struct PropertyDescriptor {
    owner: TypeId,
    owner_path: &'static str,
    name: &'static str,
    property_type: TypeId,
    property_path: &'static str,
    annotation: Option<ContractAnnotation>,
    get: PropertyGetFn,
    set: PropertySetFn,
}

impl PropertyDescriptor {
    /// Create a descriptor for property `name` of owner type `O` with
    /// property type `P`.
    pub fn new<O, P>(name: &'static str, get: PropertyGetFn, set: PropertySetFn) -> Self
    where
        O: TypePath + 'static,
        P: TypePath + 'static,
    {
        Self {
            owner: TypeId::of::<O>(),
            owner_path: O::type_path(),
            name,
            property_type: TypeId::of::<P>(),
            property_path: P::type_path(),
            annotation: None,
            get,
            set,
        }
    }

    /// Attach a contract annotation.
    pub fn with_annotation(mut self, annotation: ContractAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Returns the declaring type id.
    #[inline]
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    /// Returns the declaring type path.
    #[inline]
    pub fn owner_path(&self) -> &'static str {
        self.owner_path
    }

    /// Returns the property name, used as the child node tag.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the property type id.
    #[inline]
    pub fn property_type(&self) -> TypeId {
        self.property_type
    }

    /// Returns the property type path.
    #[inline]
    pub fn property_path(&self) -> &'static str {
        self.property_path
    }

    /// Returns the contract annotation, if any.
    #[inline]
    pub fn annotation(&self) -> Option<&ContractAnnotation> {
        self.annotation.as_ref()
    }

    /// Whether this descriptor is exactly the given triple.
    pub fn matches(&self, owner: TypeId, name: &str, property_type: TypeId) -> bool {
        self.owner == owner && self.name == name && self.property_type == property_type
    }

    /// Read the property off a live owner.
    #[inline]
    pub fn get(&self, owner: &dyn GraphValue) -> Option<SharedValue> {
        (self.get)(owner)
    }

    /// Write the property on a live owner.
    #[inline]
    pub fn set(&self, owner: &SharedValue, value: &SharedValue) -> bool {
        (self.set)(owner, value)
    }
}

impl core::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("owner", &self.owner_path)
            .field("name", &self.name)
            .field("property_type", &self.property_path)
            .field("annotation", &self.annotation)
            .finish()
    }
}
