use core::any::Any;

use crate::hash::HashMap;

/// Name of the document-version parameter consulted by version-gated
/// contracts.
pub const VERSION_PARAMETER: &str = "Version";

// -----------------------------------------------------------------------------
// ParameterBag

/// Typed, named run parameters.
///
/// Parameters survive [`clear`](crate::context::SerializationContext)
/// of the per-pass state: they configure the run, they are not
/// produced by it.
#[derive(Default)]
pub struct ParameterBag {
    entries: HashMap<String, Box<dyn Any>>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace a parameter.
    pub fn set<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Box::new(value));
    }

    /// Read a parameter. `None` when absent or of another type.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.entries.get(name)?.downcast_ref()
    }

    /// Remove a parameter, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ParameterBag, VERSION_PARAMETER};

    #[test]
    fn typed_round_trip() {
        let mut bag = ParameterBag::new();
        bag.set(VERSION_PARAMETER, 3_u32);
        bag.set("label", "release".to_owned());

        assert_eq!(bag.get::<u32>(VERSION_PARAMETER), Some(&3));
        assert_eq!(bag.get::<String>("label").map(String::as_str), Some("release"));
        // Wrong type reads as absent.
        assert!(bag.get::<i64>(VERSION_PARAMETER).is_none());

        assert!(bag.remove("label"));
        assert!(!bag.remove("label"));
    }
}
