//! The engine's error channel.
//!
//! Structural problems never unwind through the engine: they are
//! appended to the per-pass error list and surfaced through an
//! optional notification hook, while the enclosing call returns
//! `None` or partial progress. Only contract-author programming
//! errors are allowed to panic.

use core::{error, fmt};

use xg_tree::XNode;

// -----------------------------------------------------------------------------
// ErrorKind

/// The taxonomy of serialization errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A textual value could not be parsed into its runtime type.
    Parsing,
    /// A numeric value was out of range for its runtime type.
    NumberOverflow,
    /// More than one contract claimed the winning priority.
    MultipleContract,
    /// The node structure does not match the document contract.
    InvalidXml,
    /// Reported by a user contract.
    User,
    /// A type name or reference could not be resolved.
    UnknownType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parsing => "Parsing",
            Self::NumberOverflow => "NumberOverflow",
            Self::MultipleContract => "MultipleContract",
            Self::InvalidXml => "InvalidXml",
            Self::User => "User",
            Self::UnknownType => "UnknownType",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// SerializationError

/// One recorded failure: kind, free-form detail and the source
/// location of the offending node when known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializationError {
    kind: ErrorKind,
    message: String,
    line: u32,
    column: u32,
    source_uri: Option<String>,
}

impl SerializationError {
    /// Create an error without source location.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: 0,
            column: 0,
            source_uri: None,
        }
    }

    /// Create an error located at the given node.
    pub fn at_node(kind: ErrorKind, message: impl Into<String>, node: &XNode) -> Self {
        let (line, column) = node.location();
        Self {
            kind,
            message: message.into(),
            line,
            column,
            source_uri: node.source_uri().map(str::to_owned),
        }
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    pub(crate) fn append_message(&mut self, suffix: &str) {
        self.message.push_str(suffix);
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the free-form detail.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `(line, column)` in the source document.
    #[inline]
    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Returns the uri of the source document, if known.
    #[inline]
    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if self.line != 0 || self.column != 0 {
            write!(f, " (at {}:{}", self.line, self.column)?;
            if let Some(uri) = &self.source_uri {
                write!(f, " in {uri}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl error::Error for SerializationError {}

// -----------------------------------------------------------------------------
// ErrorChannel

/// Append-only error list with a fan-out notification hook.
pub struct ErrorChannel {
    errors: Vec<SerializationError>,
    hook: Option<Box<dyn Fn(&SerializationError)>>,
}

impl Default for ErrorChannel {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            hook: None,
        }
    }

    /// Append an error and fire the hook.
    pub fn report(&mut self, error: SerializationError) {
        if let Some(hook) = &self.hook {
            hook(&error);
        }
        self.errors.push(error);
    }

    /// Install the notification hook, replacing any previous one.
    pub fn set_hook(&mut self, hook: impl Fn(&SerializationError) + 'static) {
        self.hook = Some(Box::new(hook));
    }

    /// Returns the recorded errors in report order.
    #[inline]
    pub fn errors(&self) -> &[SerializationError] {
        &self.errors
    }

    /// Returns the number of recorded errors.
    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Discard recorded errors. The hook stays installed.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("errors", &self.errors)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use xg_tree::XNode;

    use super::{ErrorChannel, ErrorKind, SerializationError};

    #[test]
    fn node_location_flows_into_error() {
        let mut node = XNode::new("A");
        node.set_location(4, 17);
        node.set_source_uri(Some("file:///doc.xml".into()));

        let error = SerializationError::at_node(ErrorKind::UnknownType, "no such type", &node);
        assert_eq!(error.location(), (4, 17));
        assert_eq!(error.source_uri(), Some("file:///doc.xml"));
        assert_eq!(
            error.to_string(),
            "UnknownType: no such type (at 4:17 in file:///doc.xml)"
        );
    }

    #[test]
    fn hook_fires_per_report() {
        let seen = Rc::new(Cell::new(0));
        let observed = seen.clone();

        let mut channel = ErrorChannel::new();
        channel.set_hook(move |_| observed.set(observed.get() + 1));

        channel.report(SerializationError::new(ErrorKind::User, "one"));
        channel.report(SerializationError::new(ErrorKind::Parsing, "two"));

        assert_eq!(seen.get(), 2);
        assert_eq!(channel.len(), 2);
        assert_eq!(channel.errors()[1].kind(), ErrorKind::Parsing);
    }

    #[test]
    fn clear_keeps_hook() {
        let seen = Rc::new(Cell::new(0));
        let observed = seen.clone();

        let mut channel = ErrorChannel::new();
        channel.set_hook(move |_| observed.set(observed.get() + 1));
        channel.report(SerializationError::new(ErrorKind::User, "one"));
        channel.clear();

        assert!(channel.is_empty());
        channel.report(SerializationError::new(ErrorKind::User, "two"));
        assert_eq!(seen.get(), 2);
    }
}
