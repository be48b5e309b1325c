//! Decoded view of one configuration object.

use esedit_value::{Mapping, PropertyValue};
use serde::{Serialize, Serializer};

/// A snapshot of one object-literal element of the exported array.
///
/// Snapshots do not track later edits; query again after mutating.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    index: usize,
    fields: Mapping,
}

impl ConfigEntry {
    pub(crate) fn new(index: usize, fields: Mapping) -> Self {
        Self { index, fields }
    }

    /// Position within the exported array, counting non-object elements too.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn into_fields(self) -> Mapping {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.fields.get(key)
    }

    /// The `files` globs as authored. Missing `files` reads as an empty list;
    /// anything but a list of strings reads as `None`.
    pub fn files(&self) -> Option<Vec<String>> {
        match self.fields.get("files") {
            None => Some(Vec::new()),
            Some(value) => value.as_string_list(),
        }
    }

    pub fn ignores(&self) -> Option<Vec<String>> {
        self.fields.get("ignores")?.as_string_list()
    }

    pub fn rules(&self) -> Option<&Mapping> {
        self.fields.get("rules")?.as_mapping()
    }

    pub fn language_options(&self) -> Option<&Mapping> {
        self.fields.get("languageOptions")?.as_mapping()
    }

    /// True when `files` is set-equal to `patterns`.
    pub fn matches<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        self.files()
            .is_some_and(|files| pattern_set(&files) == pattern_set(patterns))
    }
}

impl Serialize for ConfigEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Owned copies of `patterns` in the given order.
pub(crate) fn pattern_list<S: AsRef<str>>(patterns: &[S]) -> Vec<String> {
    patterns.iter().map(|p| p.as_ref().to_string()).collect()
}

/// Sorted copy of `patterns`, the order-independent identity of an entry.
pub(crate) fn pattern_set<S: AsRef<str>>(patterns: &[S]) -> Vec<String> {
    let mut set = pattern_list(patterns);
    set.sort();
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(pairs: Vec<(&str, PropertyValue)>) -> ConfigEntry {
        ConfigEntry::new(0, pairs.into_iter().collect())
    }

    #[test]
    fn pattern_sets_ignore_order() {
        let e = entry(vec![("files", PropertyValue::strings(["b", "a"]))]);
        assert!(e.matches(&["a", "b"]));
        assert!(!e.matches(&["a"]));
        assert_eq!(e.files(), Some(vec!["b".to_string(), "a".to_string()]));
    }

    #[test]
    fn missing_files_is_the_empty_set() {
        let e = entry(vec![("ignores", PropertyValue::strings(["dist/**"]))]);
        assert!(e.matches::<&str>(&[]));
        assert_eq!(e.ignores(), Some(vec!["dist/**".to_string()]));
    }

    #[test]
    fn non_literal_files_never_match() {
        let e = entry(vec![("files", PropertyValue::Opaque("TS_GLOBS".into()))]);
        assert_eq!(e.files(), None);
        assert!(!e.matches::<&str>(&[]));
    }

    #[test]
    fn serializes_as_its_fields() {
        let e = entry(vec![
            ("files", PropertyValue::strings(["**/*.ts"])),
            ("rules", PropertyValue::Mapping([("eqeqeq", "error")].into_iter().collect())),
        ]);
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"files":["**/*.ts"],"rules":{"eqeqeq":"error"}}"#
        );
    }
}
