//! The fixed tag and attribute vocabulary of the document format.
//!
//! The engine relies on these constructs bit-exactly; a document
//! produced by any other writer must use the same names to be
//! readable.

// -----------------------------------------------------------------------------
// Tags

/// Root tag of a serialized document.
pub const X_ROOT: &str = "XRoot";

/// Child of the root holding one [`X_TYPE`] node per referenced type.
pub const X_TYPE_CONTAINER: &str = "XTypeContainer";

/// One entry of the type container.
pub const X_TYPE: &str = "XType";

/// Collection element wrapper.
pub const X_ITEM: &str = "XItem";

/// Dictionary key wrapper, nested inside an [`X_ITEM`].
pub const X_KEY: &str = "XKey";

/// Dictionary value wrapper, nested inside an [`X_ITEM`].
pub const X_VALUE: &str = "XValue";

/// Nested generic-argument list of a type descriptor.
pub const X_GENERIC_DEFINITION: &str = "XGenericDefinition";

/// Dedicated tag for null values.
pub const NULL_TAG: &str = "Null";

// -----------------------------------------------------------------------------
// Attributes

/// On a type-container entry: the `type_N` id. On a value node: a
/// back-reference to an already-read object id.
pub const ATTR_REF: &str = "ref";

/// On a value node: the object reference id assigned at first write.
pub const ATTR_REF_ID: &str = "refid";

/// On a value node: the runtime type, either a `type_N` table
/// reference or a bare type path.
pub const ATTR_TYPE: &str = "type";

/// On a type-container entry: the full type path.
pub const ATTR_NAME: &str = "name";

/// On a value node: the out-of-document location handled by the
/// external reference resolver.
pub const ATTR_URL: &str = "url";

/// Prefix of type reference ids (`type_0`, `type_1`, ...).
pub const TYPE_REF_PREFIX: &str = "type_";
