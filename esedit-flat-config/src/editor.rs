//! Editing session over an ESLint flat config module.

use camino::{Utf8Path, Utf8PathBuf};
use esedit_core::{Binding, EditError, EditResult, SourceFile, Tree};
use esedit_syntax::escape::single_quote;
use esedit_syntax::{DefaultExport, Document, NodeId};
use esedit_value::{
    Mapping, PropertyValue, SPREAD_MARKER, decode, decode_object, encode, is_spread_key,
};
use tracing::{debug, info, warn};

use crate::entry::{ConfigEntry, pattern_list, pattern_set};

/// Edits the array exported by `export default [...]`.
///
/// Entries are identified by their `files` pattern set, compared without
/// regard to order. Every operation mutates the live document; nothing is
/// written until [`save`](Self::save).
pub struct FlatConfigEditor<'a> {
    binding: Binding<'a>,
    root: NodeId,
}

impl<'a> FlatConfigEditor<'a> {
    /// Reads `path` through `tree`. A missing file reads as empty text and
    /// therefore fails the default-export check.
    pub fn open(tree: &'a dyn Tree, path: impl Into<Utf8PathBuf>) -> EditResult<Self> {
        Self::bind(Binding::open(tree, path)?)
    }

    /// Edits an already-parsed file in place. `path` overrides where `save` writes.
    pub fn attach(file: &'a mut SourceFile, path: Option<&Utf8Path>) -> EditResult<Self> {
        Self::bind(Binding::live(file, path))
    }

    fn bind(binding: Binding<'a>) -> EditResult<Self> {
        if let Some(error) = binding.document().syntax_error() {
            return Err(EditError::structural(
                binding.path(),
                format!("module does not parse: {error}"),
            ));
        }
        let export = binding.document().default_export();
        match export {
            DefaultExport::Array(root) => {
                debug!(path = %binding.path(), "bound flat config");
                Ok(Self { binding, root })
            }
            DefaultExport::Missing => Err(EditError::structural(
                binding.path(),
                "no `export default [...]` statement found",
            )),
            DefaultExport::Other => Err(EditError::structural(
                binding.path(),
                "the default export is not an array literal",
            )),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        self.binding.path()
    }

    /// Full current text of the module.
    pub fn content(&self) -> String {
        self.binding.content()
    }

    pub fn save(&self) -> EditResult<()> {
        Ok(self.binding.save()?)
    }

    fn doc(&self) -> &Document {
        self.binding.document()
    }

    // ---- entries -------------------------------------------------------

    /// Object-literal entries in list order. Other elements, such as spreads
    /// of shared configs, are skipped but stay in place.
    pub fn configs(&self) -> Vec<ConfigEntry> {
        let doc = self.doc();
        doc.items(self.root)
            .iter()
            .enumerate()
            .filter(|(_, item)| doc.node(item.node).is_object())
            .map(|(index, item)| ConfigEntry::new(index, decode_object(doc, item.node)))
            .collect()
    }

    /// First entry whose `files` is set-equal to `patterns`.
    pub fn find<S: AsRef<str>>(&self, patterns: &[S]) -> Option<ConfigEntry> {
        let index = self.locate(patterns)?;
        let doc = self.doc();
        let node = doc.items(self.root)[index].node;
        Some(ConfigEntry::new(index, decode_object(doc, node)))
    }

    pub fn has_config<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        self.locate(patterns).is_some()
    }

    fn locate<S: AsRef<str>>(&self, patterns: &[S]) -> Option<usize> {
        let wanted = pattern_set(patterns);
        let doc = self.doc();
        doc.items(self.root).iter().position(|item| {
            doc.node(item.node).is_object()
                && entry_patterns(doc, item.node).is_some_and(|set| set == wanted)
        })
    }

    fn entry_node<S: AsRef<str>>(&self, patterns: &[S]) -> Option<NodeId> {
        let index = self.locate(patterns)?;
        Some(self.doc().items(self.root)[index].node)
    }

    fn require_entry<S: AsRef<str>>(&self, patterns: &[S]) -> EditResult<NodeId> {
        self.entry_node(patterns).ok_or_else(|| {
            EditError::precondition(format!(
                "no config entry has files {:?}",
                pattern_list(patterns)
            ))
        })
    }

    /// Patches `config` field by field onto the entry with the same `files`
    /// set, or appends it as a new entry.
    ///
    /// `rules` merges rule by rule; every other field is replaced wholesale.
    /// The existing `files` array is never rewritten.
    pub fn upsert(&mut self, config: &Mapping) {
        let patterns = config
            .get("files")
            .and_then(PropertyValue::as_string_list)
            .unwrap_or_default();
        let root = self.root;

        let Some(entry) = self.entry_node(&patterns) else {
            info!(files = ?patterns, "appending config entry");
            let doc = self.binding.document_mut();
            let node = doc.parse_expression(&encode(&PropertyValue::Mapping(config.clone())));
            doc.push_item(root, node);
            return;
        };

        debug!(files = ?patterns, "merging into existing config entry");
        let doc = self.binding.document_mut();
        for (key, value) in config.iter() {
            if key == "files" {
                continue;
            }
            if is_spread_key(key) {
                ensure_spread(doc, entry, &key[SPREAD_MARKER.len()..]);
                continue;
            }
            match (key, value.as_mapping()) {
                ("rules", Some(rules)) => {
                    let object = member_object(doc, entry, "rules");
                    for (name, rule) in rules.iter() {
                        if is_spread_key(name) {
                            ensure_spread(doc, object, &name[SPREAD_MARKER.len()..]);
                        } else {
                            put_member(doc, object, name, rule, true);
                        }
                    }
                }
                _ => put_member(doc, entry, key, value, true),
            }
        }
    }

    /// Removes the first entry whose `files` matches. Returns false when none does.
    pub fn remove_config<S: AsRef<str>>(&mut self, patterns: &[S]) -> bool {
        let Some(index) = self.locate(patterns) else {
            debug!(files = ?pattern_list(patterns), "no config entry to remove");
            return false;
        };
        info!(files = ?pattern_list(patterns), "removing config entry");
        let root = self.root;
        self.binding.document_mut().remove_item(root, index);
        true
    }

    // ---- rules ---------------------------------------------------------

    /// Decoded `rules` of the matching entry, when it is an object literal.
    pub fn rules<S: AsRef<str>>(&self, patterns: &[S]) -> Option<Mapping> {
        let entry = self.entry_node(patterns)?;
        let doc = self.doc();
        existing_object(doc, entry, "rules").map(|rules| decode_object(doc, rules))
    }

    pub fn get_rule<S: AsRef<str>>(&self, patterns: &[S], name: &str) -> Option<PropertyValue> {
        self.rules(patterns)?.get(name).cloned()
    }

    pub fn has_rule<S: AsRef<str>>(&self, patterns: &[S], name: &str) -> bool {
        self.get_rule(patterns, name).is_some()
    }

    /// Appends `name: value` to the entry's rules without checking for an
    /// existing rule of the same name. Creates the entry or its `rules` as needed.
    pub fn add_rule<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        name: &str,
        value: impl Into<PropertyValue>,
    ) {
        let value = value.into();
        let Some(entry) = self.entry_node(patterns) else {
            let mut rules = Mapping::new();
            rules.insert(name, value);
            let mut config = Mapping::new();
            config.insert("files", PropertyValue::strings(pattern_list(patterns)));
            config.insert("rules", rules);
            self.upsert(&config);
            return;
        };
        debug!(rule = name, "appending rule");
        let doc = self.binding.document_mut();
        let rules = member_object(doc, entry, "rules");
        put_member(doc, rules, name, &value, false);
    }

    /// Replaces the value of `name` in place, appending it when absent.
    /// Falls back to [`add_rule`](Self::add_rule) when no entry matches.
    pub fn update_rule<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        name: &str,
        value: impl Into<PropertyValue>,
    ) {
        let value = value.into();
        let Some(entry) = self.entry_node(patterns) else {
            return self.add_rule(patterns, name, value);
        };
        debug!(rule = name, "updating rule");
        let doc = self.binding.document_mut();
        let rules = member_object(doc, entry, "rules");
        put_member(doc, rules, name, &value, true);
    }

    /// Sets `name` unless it already decodes to `value`. Returns whether anything changed.
    pub fn ensure_rule<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let value = value.into();
        if self.get_rule(patterns, name).as_ref() == Some(&value) {
            debug!(rule = name, "rule already set");
            return false;
        }
        self.update_rule(patterns, name, value);
        true
    }

    /// Removes the first rule named `name`. Returns false when there was nothing to remove.
    pub fn remove_rule<S: AsRef<str>>(&mut self, patterns: &[S], name: &str) -> bool {
        let Some(entry) = self.entry_node(patterns) else {
            debug!(rule = name, "no config entry; nothing to remove");
            return false;
        };
        let doc = self.binding.document_mut();
        let Some(rules) = existing_object(doc, entry, "rules") else {
            return false;
        };
        match doc.find_property(rules, name) {
            Some((index, _)) => {
                debug!(rule = name, "removing rule");
                doc.remove_item(rules, index);
                true
            }
            None => false,
        }
    }

    /// Updates every named rule in `rules`. Spread placeholders are skipped.
    pub fn add_multiple_rules<S: AsRef<str>>(&mut self, patterns: &[S], rules: &Mapping) {
        for (name, value) in rules.iter().filter(|(name, _)| !is_spread_key(name)) {
            self.update_rule(patterns, name, value.clone());
        }
    }

    /// Removes each of `names`, returning how many were present.
    pub fn remove_multiple_rules<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        names: &[&str],
    ) -> usize {
        names
            .iter()
            .filter(|name| self.remove_rule(patterns, name))
            .count()
    }

    /// Copies the named rules of the `from` entry onto the `to` entry.
    /// Returns false when `from` has no rules object.
    pub fn merge_rules_from_pattern<S: AsRef<str>, T: AsRef<str>>(
        &mut self,
        from: &[S],
        to: &[T],
    ) -> bool {
        let Some(rules) = self.rules(from) else {
            debug!(files = ?pattern_list(from), "no rules to merge");
            return false;
        };
        self.add_multiple_rules(to, &rules);
        true
    }

    /// Copies every field of the `from` entry into the entry for `to`.
    /// The copy is made from decoded values, so later edits to one entry
    /// never show up in the other.
    pub fn copy_config_to_pattern<S: AsRef<str>, T: AsRef<str>>(
        &mut self,
        from: &[S],
        to: &[T],
    ) -> bool {
        let Some(source) = self.find(from) else {
            debug!(files = ?pattern_list(from), "no config entry to copy");
            return false;
        };
        let mut config = Mapping::new();
        config.insert("files", PropertyValue::strings(pattern_list(to)));
        for (key, value) in source.into_fields() {
            if key != "files" {
                config.push(key, value);
            }
        }
        self.upsert(&config);
        true
    }

    /// Sets `languageOptions.parser` and `languageOptions.parserOptions`,
    /// keeping any other language options already present.
    pub fn set_language_options<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        parser: Option<PropertyValue>,
        parser_options: Option<Mapping>,
    ) {
        let mut options = Mapping::new();
        if let Some(parser) = parser {
            options.insert("parser", parser);
        }
        if let Some(parser_options) = parser_options {
            options.insert("parserOptions", parser_options);
        }

        let Some(entry) = self.entry_node(patterns) else {
            let mut config = Mapping::new();
            config.insert("files", PropertyValue::strings(pattern_list(patterns)));
            config.insert("languageOptions", options);
            self.upsert(&config);
            return;
        };
        let doc = self.binding.document_mut();
        let object = member_object(doc, entry, "languageOptions");
        for (key, value) in options.iter() {
            put_member(doc, object, key, value, true);
        }
    }

    // ---- spreads -------------------------------------------------------

    /// Appends `...expr` to the entry's rules object.
    pub fn add_spread_to_rules<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        expr: &str,
    ) -> EditResult<()> {
        let rules = self.require_rules(patterns)?;
        let doc = self.binding.document_mut();
        let spread = doc.new_spread(expr);
        doc.push_member(rules, spread);
        Ok(())
    }

    /// Removes the first `...expr` from the entry's rules object. Returns
    /// false when no spread with that exact text exists.
    pub fn remove_spread_from_rules<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        expr: &str,
    ) -> EditResult<bool> {
        let rules = self.require_rules(patterns)?;
        Ok(remove_spread(self.binding.document_mut(), rules, expr))
    }

    /// Appends `...expr` to the entry's own members.
    pub fn add_spread_to_config<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        expr: &str,
    ) -> EditResult<()> {
        let entry = self.require_entry(patterns)?;
        let doc = self.binding.document_mut();
        let spread = doc.new_spread(expr);
        doc.push_member(entry, spread);
        Ok(())
    }

    pub fn remove_spread_from_config<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        expr: &str,
    ) -> EditResult<bool> {
        let entry = self.require_entry(patterns)?;
        Ok(remove_spread(self.binding.document_mut(), entry, expr))
    }

    fn require_rules<S: AsRef<str>>(&self, patterns: &[S]) -> EditResult<NodeId> {
        let entry = self.require_entry(patterns)?;
        existing_object(self.doc(), entry, "rules").ok_or_else(|| {
            EditError::precondition(format!(
                "rules of the config entry for {:?} is not an object literal",
                pattern_list(patterns)
            ))
        })
    }
}

/// Sorted `files` of an entry; `[]` when absent, `None` when not a string list.
fn entry_patterns(doc: &Document, entry: NodeId) -> Option<Vec<String>> {
    match doc.find_property(entry, "files") {
        None => Some(Vec::new()),
        Some((_, prop)) => {
            let value = property_value(doc, prop)?;
            let files = decode(doc, value).as_string_list()?;
            Some(pattern_set(&files))
        }
    }
}

fn property_value(doc: &Document, prop: NodeId) -> Option<NodeId> {
    doc.node(prop).as_property().map(|p| p.value)
}

/// The object literal stored under `key`, if it is one.
fn existing_object(doc: &Document, object: NodeId, key: &str) -> Option<NodeId> {
    let (_, prop) = doc.find_property(object, key)?;
    property_value(doc, prop).filter(|value| doc.node(*value).is_object())
}

/// The object literal stored under `key`, creating `{}` when the key is
/// absent. A non-object value is rewritten as `{ ...value }`.
fn member_object(doc: &mut Document, object: NodeId, key: &str) -> NodeId {
    let found = doc
        .find_property(object, key)
        .and_then(|(_, prop)| Some((prop, property_value(doc, prop)?)));
    match found {
        Some((_, value)) if doc.node(value).is_object() => value,
        Some((prop, value)) => {
            let original = doc.render(value);
            let original = original.trim();
            warn!(key, value = original, "wrapping non-object value in a spread");
            let wrapped = doc.parse_expression(&format!("{{ ...{original} }}"));
            doc.set_property_value(prop, wrapped);
            wrapped
        }
        None => {
            let value = doc.parse_expression("{}");
            let prop = doc.new_property(single_quote(key), value);
            doc.push_member(object, prop);
            value
        }
    }
}

/// Writes `key: value` into `object`. With `replace`, the first member
/// matching `key` gets the new value in place; otherwise a member is appended.
fn put_member(
    doc: &mut Document,
    object: NodeId,
    key: &str,
    value: &PropertyValue,
    replace: bool,
) {
    let node = doc.parse_expression(&encode(value));
    let existing = if replace {
        doc.find_property(object, key)
    } else {
        None
    };
    match existing {
        Some((_, prop)) => doc.set_property_value(prop, node),
        None => {
            let prop = doc.new_property(single_quote(key), node);
            doc.push_member(object, prop);
        }
    }
}

fn ensure_spread(doc: &mut Document, object: NodeId, expr: &str) {
    if doc.find_spread(object, expr).is_none() {
        let spread = doc.new_spread(expr);
        doc.push_member(object, spread);
    }
}

fn remove_spread(doc: &mut Document, seq: NodeId, expr: &str) -> bool {
    match doc.find_spread(seq, expr) {
        Some(index) => {
            debug!(expr, "removing spread");
            doc.remove_item(seq, index);
            true
        }
        None => {
            debug!(expr, "spread not found");
            false
        }
    }
}
