//! External reference resolution.
//!
//! A resolver lets a host application keep selected instances out of
//! the document: on write a resolved instance collapses to a single
//! node carrying only a `url` attribute, and on read the same url is
//! handed back to the resolver to produce the live instance.

use crate::value::SharedValue;

/// Maps selected instances to stable external locations.
///
/// Registration is by instance identity, so two equal but distinct
/// values can map to different urls.
pub trait ExternalReferenceResolver {
    /// The external location of `value`, if it is registered.
    fn location(&self, value: &SharedValue) -> Option<String>;

    /// Produce the instance behind `url`, if known.
    fn resolve(&self, url: &str) -> Option<SharedValue>;

    /// Register `value` under `url`.
    fn register(&mut self, value: SharedValue, url: String);

    /// Remove `value` from the resolver.
    fn unregister(&mut self, value: &SharedValue);
}

// -----------------------------------------------------------------------------
// MapResolver

/// An in-memory resolver backed by two hash maps.
#[derive(Default)]
pub struct MapResolver {
    by_url: crate::hash::HashMap<String, SharedValue>,
    url_by_identity: crate::hash::HashMap<usize, String>,
}

impl MapResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExternalReferenceResolver for MapResolver {
    fn location(&self, value: &SharedValue) -> Option<String> {
        self.url_by_identity
            .get(&crate::value::identity(value))
            .cloned()
    }

    fn resolve(&self, url: &str) -> Option<SharedValue> {
        self.by_url.get(url).cloned()
    }

    fn register(&mut self, value: SharedValue, url: String) {
        self.url_by_identity
            .insert(crate::value::identity(&value), url.clone());
        self.by_url.insert(url, value);
    }

    fn unregister(&mut self, value: &SharedValue) {
        if let Some(url) = self.url_by_identity.remove(&crate::value::identity(value)) {
            self.by_url.remove(&url);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ExternalReferenceResolver, MapResolver};
    use crate::value::shared;

    #[test]
    fn registration_is_by_identity() {
        let mut resolver = MapResolver::new();
        let first = shared(7_i32);
        let twin = shared(7_i32);
        resolver.register(first.clone(), "asset://seven".to_owned());

        assert_eq!(resolver.location(&first).as_deref(), Some("asset://seven"));
        assert!(resolver.location(&twin).is_none());

        let resolved = resolver.resolve("asset://seven").unwrap();
        assert!(std::rc::Rc::ptr_eq(&resolved, &first));

        resolver.unregister(&first);
        assert!(resolver.location(&first).is_none());
        assert!(resolver.resolve("asset://seven").is_none());
    }
}
