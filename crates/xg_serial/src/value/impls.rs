//! Built-in [`GraphValue`] implementations: primitives, strings, the
//! null placeholder and the dynamic container values.

use core::any::Any;

use crate::value::{GraphValue, SharedValue, TypePath};

// -----------------------------------------------------------------------------
// Primitive impls

macro_rules! impl_graph_value {
    ($($ty:ty => $path:literal, $name:literal;)*) => {
        $(
            impl TypePath for $ty {
                #[inline(always)]
                fn type_path() -> &'static str {
                    $path
                }

                #[inline(always)]
                fn type_name() -> &'static str {
                    $name
                }
            }

            impl GraphValue for $ty {
                #[inline(always)]
                fn type_path(&self) -> &'static str {
                    $path
                }

                #[inline(always)]
                fn as_any(&self) -> &dyn Any {
                    self
                }

                #[inline(always)]
                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }
            }
        )*
    };
}

impl_graph_value! {
    bool => "bool", "bool";
    char => "char", "char";
    u8 => "u8", "u8";
    u16 => "u16", "u16";
    u32 => "u32", "u32";
    u64 => "u64", "u64";
    u128 => "u128", "u128";
    usize => "usize", "usize";
    i8 => "i8", "i8";
    i16 => "i16", "i16";
    i32 => "i32", "i32";
    i64 => "i64", "i64";
    i128 => "i128", "i128";
    isize => "isize", "isize";
    f32 => "f32", "f32";
    f64 => "f64", "f64";
    String => "alloc::string::String", "String";
}

// -----------------------------------------------------------------------------
// XNull

/// The null placeholder value, written as the dedicated `Null` tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct XNull;

impl_graph_value! {
    XNull => "xg_serial::value::XNull", "XNull";
}

// -----------------------------------------------------------------------------
// XList

/// A dynamic ordered collection of shared values.
///
/// The document form uses one `XItem` wrapper per element.
#[derive(Clone, Default)]
pub struct XList(pub Vec<SharedValue>);

impl XList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }
}

impl_graph_value! {
    XList => "xg_serial::value::XList", "XList";
}

// -----------------------------------------------------------------------------
// XMap

/// A dynamic ordered key/value collection of shared values.
///
/// The document form uses one `XItem` wrapper per entry, nesting an
/// `XKey` and an `XValue` child.
#[derive(Clone, Default)]
pub struct XMap(pub Vec<(SharedValue, SharedValue)>);

impl XMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self(Vec::new())
    }
}

impl_graph_value! {
    XMap => "xg_serial::value::XMap", "XMap";
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{XList, XNull};
    use crate::value::{TypePath, shared};

    #[test]
    fn type_path() {
        assert!(XNull::type_path() == "xg_serial::value::XNull");
        assert!(XNull::type_name() == "XNull");
        assert!(String::type_path() == "alloc::string::String");
        assert!(String::type_name() == "String");
    }

    #[test]
    fn list_holds_shared_handles() {
        let element = shared(1_i32);
        let list = XList(vec![element.clone(), element.clone()]);
        assert_eq!(
            crate::value::identity(&list.0[0]),
            crate::value::identity(&list.0[1]),
        );
    }
}
