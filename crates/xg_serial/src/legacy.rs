//! Legacy type-name remapping.
//!
//! Documents written by earlier releases may carry type names that
//! were since renamed, possibly with a trailing `@version` suffix.
//! The map rewrites such names before registry resolution and can
//! append each unresolved rename to a diagnostic side file for
//! migration tooling.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::descriptor::strip_version_suffix;
use crate::hash::HashMap;

// -----------------------------------------------------------------------------
// LegacyTypeMap

/// An overlay of old-name to current-name rewrites.
#[derive(Default)]
pub struct LegacyTypeMap {
    renames: HashMap<String, String>,
    diagnostic_log: Option<PathBuf>,
}

impl LegacyTypeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unresolved rewrites to `path`, one `old -> new` line
    /// per occurrence.
    pub fn with_diagnostic_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.diagnostic_log = Some(path.into());
        self
    }

    /// Record that `old` is now called `new`.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.renames.insert(old.into(), new.into());
    }

    /// Rewrite a document type name: strip any trailing version
    /// suffix, then apply the rename table. Names the map does not
    /// know pass through with only the suffix stripped.
    pub fn rewrite<'a>(&'a self, name: &'a str) -> &'a str {
        let stripped = strip_version_suffix(name);
        match self.renames.get(stripped) {
            Some(new) => new.as_str(),
            None => stripped,
        }
    }

    /// The diagnostic side file, if configured.
    #[inline]
    pub fn diagnostic_log(&self) -> Option<&Path> {
        self.diagnostic_log.as_deref()
    }

    /// Note a rewrite whose result still failed to resolve. Logging
    /// failures are swallowed; the caller already reports the
    /// resolution error.
    pub fn note_unresolved(&self, old: &str, new: &str) {
        let Some(path) = &self.diagnostic_log else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{old} -> {new}");
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::LegacyTypeMap;

    #[test]
    fn rewrites_follow_suffix_stripping() {
        let mut map = LegacyTypeMap::new();
        map.insert("old::Widget", "new::Widget");

        assert_eq!(map.rewrite("old::Widget"), "new::Widget");
        assert_eq!(map.rewrite("old::Widget@2"), "new::Widget");
        assert_eq!(map.rewrite("old::Widget@1.4.0"), "new::Widget");
        assert_eq!(map.rewrite("untouched::Type@3"), "untouched::Type");
        assert_eq!(map.rewrite("untouched::Type"), "untouched::Type");
    }

    #[test]
    fn diagnostic_log_appends_lines() {
        let path = std::env::temp_dir().join(format!(
            "xg-legacy-diag-{}.log",
            std::process::id(),
        ));
        let _ = std::fs::remove_file(&path);

        let map = LegacyTypeMap::new().with_diagnostic_log(&path);
        map.note_unresolved("old::Gone", "new::Gone");
        map.note_unresolved("old::Other@1", "new::Other");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "old::Gone -> new::Gone\nold::Other@1 -> new::Other\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn logging_without_a_log_is_a_no_op() {
        let map = LegacyTypeMap::new();
        map.note_unresolved("a", "b");
    }
}
