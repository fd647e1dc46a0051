use core::any::TypeId;
use core::fmt::Display;
use core::num::IntErrorKind;

use xg_tree::{XNode, vocab};

use crate::context::SerializationContext;
use crate::contract::{Contract, TypeMatch};
use crate::error::{ErrorKind, SerializationError};
use crate::priority::SupportPriority;
use crate::registry::TypeRecord;
use crate::value::{GraphValue, SharedValue, TypePath, shared};

// -----------------------------------------------------------------------------
// Scalar

/// A leaf value with a canonical text form.
pub trait Scalar: Display + Sized {
    /// Parse the canonical text form.
    fn parse_scalar(text: &str) -> Result<Self, ScalarError>;
}

/// Why a scalar text failed to parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScalarError {
    /// The value is numeric but out of range for the target type.
    Overflow,
    /// The text is not a value of the target type.
    Malformed,
}

impl ScalarError {
    fn error_kind(self) -> ErrorKind {
        match self {
            Self::Overflow => ErrorKind::NumberOverflow,
            Self::Malformed => ErrorKind::Parsing,
        }
    }
}

macro_rules! impl_int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                fn parse_scalar(text: &str) -> Result<Self, ScalarError> {
                    text.parse::<$ty>().map_err(|err| match err.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            ScalarError::Overflow
                        }
                        _ => ScalarError::Malformed,
                    })
                }
            }
        )*
    };
}

macro_rules! impl_str_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                fn parse_scalar(text: &str) -> Result<Self, ScalarError> {
                    text.parse::<$ty>().map_err(|_| ScalarError::Malformed)
                }
            }
        )*
    };
}

impl_int_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_str_scalar!(bool, char, f32, f64);

impl Scalar for String {
    fn parse_scalar(text: &str) -> Result<Self, ScalarError> {
        Ok(text.to_owned())
    }
}

// -----------------------------------------------------------------------------
// ScalarContract

/// Type-matched contract for leaf values written as node text.
///
/// Scalars are excluded types: they are written inline at every
/// occurrence and never reference-tracked, but their type descriptor
/// is still deduplicated through the type container.
pub struct ScalarContract<T> {
    matcher: TypeMatch,
    marker: core::marker::PhantomData<fn() -> T>,
}

impl<T: Scalar + GraphValue + TypePath> Default for ScalarContract<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar + GraphValue + TypePath> ScalarContract<T> {
    /// Create the contract for `T`.
    pub fn new() -> Self {
        Self {
            matcher: TypeMatch::of::<T>(),
            marker: core::marker::PhantomData,
        }
    }
}

impl<T: Scalar + GraphValue + TypePath> Contract for ScalarContract<T> {
    fn kind(&self) -> &'static str {
        T::type_name()
    }

    fn needs_external_creation(&self) -> bool {
        true
    }

    fn support_for_type(&self, record: &TypeRecord, ctx: &SerializationContext) -> SupportPriority {
        self.matcher.support(record.type_id(), ctx.registry())
    }

    fn read(
        &self,
        node: &XNode,
        _instance: Option<&SharedValue>,
        ctx: &mut SerializationContext,
    ) -> Option<SharedValue> {
        let Some(text) = node.text() else {
            ctx.report(SerializationError::at_node(
                ErrorKind::InvalidXml,
                format!("`{}` node carries no text content", T::type_name()),
                node,
            ));
            return None;
        };

        match T::parse_scalar(text) {
            Ok(value) => Some(shared(value)),
            Err(err) => {
                ctx.report(SerializationError::at_node(
                    err.error_kind(),
                    format!("cannot read `{text}` as `{}`", <T as TypePath>::type_path()),
                    node,
                ));
                None
            }
        }
    }

    fn write(&self, value: &SharedValue, ctx: &mut SerializationContext) -> Option<XNode> {
        let borrow = value.borrow();
        // A mismatched downcast is a contract-author fault, not a
        // recoverable document problem.
        let Some(concrete) = borrow.downcast_ref::<T>() else {
            panic!(
                "scalar type mismatched, contract type `{}` with value type `{}`",
                <T as TypePath>::type_path(),
                borrow.type_path(),
            );
        };

        let mut node = XNode::with_text(T::type_name(), concrete.to_string());
        match ctx.reference_type(TypeId::of::<T>()) {
            Some(type_ref) => node.set_attribute(vocab::ATTR_TYPE, type_ref),
            None => node.set_attribute(vocab::ATTR_TYPE, <T as TypePath>::type_path()),
        }
        Some(node)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Scalar, ScalarError};

    #[test]
    fn int_overflow_is_classified() {
        assert_eq!(u8::parse_scalar("300"), Err(ScalarError::Overflow));
        assert_eq!(i8::parse_scalar("-200"), Err(ScalarError::Overflow));
        assert_eq!(u8::parse_scalar("abc"), Err(ScalarError::Malformed));
        assert_eq!(u8::parse_scalar("42"), Ok(42));
    }

    #[test]
    fn float_and_bool_forms() {
        assert_eq!(f64::parse_scalar("2.5"), Ok(2.5));
        assert_eq!(bool::parse_scalar("true"), Ok(true));
        assert_eq!(bool::parse_scalar("yes"), Err(ScalarError::Malformed));
        assert_eq!(String::parse_scalar("any text"), Ok("any text".to_owned()));
    }
}
