//! The runtime value model.
//!
//! Every value the engine can walk implements [`GraphValue`] and is
//! handled through a [`SharedValue`] — a shared, interior-mutable
//! handle whose allocation address is the value's identity. Two
//! distinct but value-equal instances therefore have distinct
//! identities, while clones of one handle share a single identity,
//! which is exactly what the object-reference table keys on.

use core::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

mod impls;

pub use impls::{XList, XMap, XNull};

// -----------------------------------------------------------------------------
// TypePath

/// Static type naming.
///
/// `type_path` is the unambiguous full path used in documents and
/// registries; `type_name` is the short name used when unambiguous.
pub trait TypePath {
    /// Returns the full, unique path of the type.
    fn type_path() -> &'static str;

    /// Returns the short name of the type.
    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// GraphValue

/// Object-safe base trait for serializable runtime values.
///
/// Implementations are usually mechanical; for a concrete type the
/// dynamic [`type_path`](GraphValue::type_path) mirrors the static
/// [`TypePath`].
pub trait GraphValue: Any {
    /// Returns the full type path of the underlying concrete type.
    fn type_path(&self) -> &'static str;

    /// Upcast to [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast to [`Any`] for mutable downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn GraphValue {
    /// Whether the underlying value is a `T`.
    #[inline]
    pub fn is<T: GraphValue>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to a concrete `&T`, or `None` on type mismatch.
    #[inline]
    pub fn downcast_ref<T: GraphValue>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete `&mut T`, or `None` on type mismatch.
    #[inline]
    pub fn downcast_mut<T: GraphValue>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

// -----------------------------------------------------------------------------
// SharedValue

/// The universal shared handle to a runtime value.
pub type SharedValue = Rc<RefCell<dyn GraphValue>>;

/// Wrap a concrete value into a fresh [`SharedValue`] handle.
///
/// # Example
///
/// ```
/// use xg_serial::{GraphValue, shared};
///
/// let value = shared(42_i32);
/// assert_eq!(value.borrow().type_path(), "i32");
/// assert_eq!(*value.borrow().downcast_ref::<i32>().unwrap(), 42);
/// ```
pub fn shared<T: GraphValue>(value: T) -> SharedValue {
    Rc::new(RefCell::new(value))
}

/// The identity of a shared value: its allocation address.
///
/// Stable for the lifetime of the allocation, which the reference
/// table guarantees by holding a strong handle for the whole pass.
#[inline]
pub fn identity(value: &SharedValue) -> usize {
    Rc::as_ptr(value) as *const () as usize
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{GraphValue, identity, shared};

    #[test]
    fn downcast_round_trip() {
        let value = shared(String::from("abc"));
        let borrow = value.borrow();
        assert!(borrow.is::<String>());
        assert!(!borrow.is::<i32>());
        assert_eq!(borrow.downcast_ref::<String>().unwrap(), "abc");
    }

    #[test]
    fn downcast_mut_mutates_in_place() {
        let value = shared(1_u32);
        *value.borrow_mut().downcast_mut::<u32>().unwrap() = 9;
        assert_eq!(*value.borrow().downcast_ref::<u32>().unwrap(), 9);
    }

    #[test]
    fn identity_is_per_allocation() {
        let a = shared(5_i64);
        let b = shared(5_i64);
        let a2 = a.clone();

        assert_ne!(identity(&a), identity(&b));
        assert_eq!(identity(&a), identity(&a2));
    }
}
