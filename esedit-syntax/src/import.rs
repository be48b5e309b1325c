//! Import declaration syntax.

use crate::escape;
use crate::node::Seq;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImport {
    pub name: String,
    pub alias: Option<String>,
}

impl NamedImport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// True when `name` is either the imported name or its local alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.alias.as_deref() == Some(name)
    }

    fn write(&self, out: &mut String) {
        out.push_str(&self.name);
        if let Some(alias) = &self.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
    }
}

/// One `import ... from '...'` statement.
///
/// Names inside the braces keep their own trivia, so comments next to a
/// name survive edits to the others. The text around the braces is kept as
/// written until the default or namespace binding changes; after that the
/// clause is rebuilt from its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    module: String,
    default: Option<String>,
    namespace: Option<String>,
    named: Seq<NamedImport>,
    braces: bool,
    quote: char,
    attributes: Option<String>,
    semicolon: bool,
    /// Source text before the `{` and after the `}`. Without braces the
    /// whole statement is in the first half.
    original: Option<(String, String)>,
}

impl ImportDecl {
    /// A side-effect import of `module` with no specifiers.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            default: None,
            namespace: None,
            named: Seq::default(),
            braces: false,
            quote: '\'',
            attributes: None,
            semicolon: true,
            original: None,
        }
    }

    pub fn with_style(mut self, quote: char, semicolon: bool) -> Self {
        self.quote = quote;
        self.semicolon = semicolon;
        self
    }

    /// A declaration read from source. `named` is `None` when the statement
    /// has no braces; `lead` and `rest` surround the braces.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn parsed(
        module: String,
        default: Option<String>,
        namespace: Option<String>,
        named: Option<Seq<NamedImport>>,
        quote: char,
        attributes: Option<String>,
        semicolon: bool,
        lead: String,
        rest: String,
    ) -> Self {
        Self {
            module,
            default,
            namespace,
            braces: named.is_some(),
            named: named.unwrap_or_default(),
            quote,
            attributes,
            semicolon,
            original: Some((lead, rest)),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn default_import(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn namespace_import(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Names inside the braces, in source order.
    pub fn named_imports(&self) -> impl ExactSizeIterator<Item = &NamedImport> + '_ {
        self.named.items.iter().map(|item| &item.node)
    }

    pub fn quote_char(&self) -> char {
        self.quote
    }

    pub fn has_semicolon(&self) -> bool {
        self.semicolon
    }

    /// True when the declaration binds no local name at all.
    pub fn has_no_specifiers(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.items.is_empty()
    }

    pub fn set_default(&mut self, name: Option<String>) {
        self.default = name;
        self.original = None;
    }

    pub fn set_namespace(&mut self, name: Option<String>) {
        self.namespace = name;
        self.original = None;
    }

    pub fn push_named(&mut self, named: NamedImport) {
        if !self.braces {
            self.braces = true;
            self.original = None;
        }
        self.named.push_spaced(named);
    }

    pub fn remove_named(&mut self, index: usize) -> Option<NamedImport> {
        let removed = self.named.remove(index)?;
        if self.named.items.is_empty() && (self.default.is_some() || self.namespace.is_some()) {
            self.braces = false;
            self.original = None;
        }
        Some(removed)
    }

    /// Source text of the declaration.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some((lead, rest)) = &self.original {
            out.push_str(lead);
            if self.braces {
                self.write_named(&mut out);
                out.push_str(rest);
            }
            return out;
        }

        let mut clause = Vec::new();
        if let Some(default) = &self.default {
            clause.push(default.clone());
        }
        if let Some(namespace) = &self.namespace {
            clause.push(format!("* as {namespace}"));
        }
        if self.braces && (!self.named.items.is_empty() || clause.is_empty()) {
            let mut named = String::new();
            self.write_named(&mut named);
            clause.push(named);
        }

        out.push_str("import ");
        if !clause.is_empty() {
            out.push_str(&clause.join(", "));
            out.push_str(" from ");
        }
        out.push_str(&escape::quote(&self.module, self.quote));
        if let Some(attributes) = &self.attributes {
            out.push_str(attributes);
        }
        if self.semicolon {
            out.push(';');
        }
        out
    }

    fn write_named(&self, out: &mut String) {
        out.push('{');
        self.named.write(out, NamedImport::write);
        out.push('}');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_side_effect_import() {
        assert_eq!(ImportDecl::new("./polyfill").render(), "import './polyfill';");
    }

    #[test]
    fn renders_default_namespace_and_named_in_order() {
        let mut decl = ImportDecl::new("m").with_style('"', false);
        decl.set_default(Some("D".to_string()));
        decl.push_named(NamedImport::new("a"));
        decl.push_named(NamedImport::aliased("b", "c"));
        assert_eq!(decl.render(), r#"import D, { a, b as c } from "m""#);

        let mut ns = ImportDecl::new("m");
        ns.set_namespace(Some("M".to_string()));
        assert_eq!(ns.render(), "import * as M from 'm';");
    }

    #[test]
    fn removing_the_last_name_drops_the_braces() {
        let mut decl = ImportDecl::new("m");
        decl.set_default(Some("D".to_string()));
        decl.push_named(NamedImport::new("a"));
        decl.remove_named(0);
        assert_eq!(decl.render(), "import D from 'm';");
    }

    #[test]
    fn answers_to_matches_name_or_alias() {
        let named = NamedImport::aliased("logger", "log");
        assert!(named.answers_to("logger"));
        assert!(named.answers_to("log"));
        assert!(!named.answers_to("other"));
    }
}
