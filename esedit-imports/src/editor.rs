//! Editing session over the import declarations of a module.

use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use esedit_core::{Binding, EditError, EditResult, SourceFile, Tree};
use esedit_syntax::{Document, ImportDecl, ImportId, NamedImport};
use regex::Regex;
use tracing::{debug, info};

use crate::kind::{ImportKind, ImportSpecifier, ImportSummary};

static DEFAULT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s+([A-Za-z_$][\w$]*)\s+from\s*['"]([^'"]+)['"]\s*;?\s*$"#).unwrap()
});
static NAMESPACE_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s*\*\s*as\s+([A-Za-z_$][\w$]*)\s+from\s*['"]([^'"]+)['"]\s*;?\s*$"#)
        .unwrap()
});
static NAMED_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s*\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]\s*;?\s*$"#).unwrap()
});
static FULL_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*import\s*['"]([^'"]+)['"]\s*;?\s*$"#).unwrap());
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap());

/// Ensures and removes import specifiers, one declaration per module where possible.
///
/// Default and namespace slots hold at most one name per module. Every
/// operation is idempotent and reports whether it changed the document.
pub struct ImportsEditor<'a> {
    binding: Binding<'a>,
}

impl<'a> ImportsEditor<'a> {
    /// Reads `path` through `tree`; a missing file starts out empty.
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
        debug!(path = %binding.path(), "bound imports");
        Ok(Self { binding })
    }

    pub fn path(&self) -> &Utf8Path {
        self.binding.path()
    }

    pub fn content(&self) -> String {
        self.binding.content()
    }

    pub fn save(&self) -> EditResult<()> {
        Ok(self.binding.save()?)
    }

    fn doc(&self) -> &Document {
        self.binding.document()
    }

    fn declarations<'s>(
        &'s self,
        module: &'s str,
    ) -> impl Iterator<Item = (ImportId, &'s ImportDecl)> {
        self.doc()
            .imports()
            .filter(move |(_, d)| d.module() == module)
    }

    /// Every declaration in file order.
    pub fn list(&self) -> Vec<ImportSummary> {
        self.doc().imports().map(|(_, d)| summarize(d)).collect()
    }

    /// The first declaration importing exactly `module`.
    pub fn find(&self, module: &str) -> Option<ImportSummary> {
        self.declarations(module).next().map(|(_, d)| summarize(d))
    }

    /// True when `module` binds `name` in the given slot. Named lookups match
    /// either the imported name or its alias; `Full` asks only whether the
    /// module is imported at all.
    pub fn has(&self, name: &str, module: &str, kind: ImportKind) -> bool {
        let mut decls = self.declarations(module).map(|(_, d)| d);
        match kind {
            ImportKind::Full => decls.next().is_some(),
            ImportKind::Default => decls.any(|d| d.default_import() == Some(name)),
            ImportKind::Namespace => decls.any(|d| d.namespace_import() == Some(name)),
            ImportKind::Named => {
                decls.any(|d| d.named_imports().any(|n| n.answers_to(name)))
            }
        }
    }

    /// Makes `module` bind `name` in the given slot. Returns false when the
    /// binding already exists or the slot is taken by another name.
    pub fn ensure(&mut self, name: &str, module: &str, kind: ImportKind) -> bool {
        self.ensure_specifier(name, None, module, kind)
    }

    /// Makes `module` bind `name` under the local name `alias`.
    pub fn ensure_import_as(&mut self, name: &str, alias: &str, module: &str) -> bool {
        self.ensure_specifier(name, Some(alias), module, ImportKind::Named)
    }

    fn ensure_specifier(
        &mut self,
        name: &str,
        alias: Option<&str>,
        module: &str,
        kind: ImportKind,
    ) -> bool {
        let existing: Vec<ImportId> = self.declarations(module).map(|(id, _)| id).collect();
        if existing.is_empty() {
            info!(module, %kind, name, "adding import declaration");
            let decl = self.new_declaration(name, alias, module, kind);
            self.binding.document_mut().insert_import(decl);
            return true;
        }

        let decls: Vec<&ImportDecl> = self.declarations(module).map(|(_, d)| d).collect();
        let target = match kind {
            ImportKind::Full => {
                debug!(module, "module already imported");
                return false;
            }
            ImportKind::Default => {
                if decls.iter().any(|d| d.default_import().is_some()) {
                    debug!(module, name, "default slot already taken");
                    return false;
                }
                Some(existing[0])
            }
            ImportKind::Namespace => {
                if decls.iter().any(|d| d.namespace_import().is_some()) {
                    debug!(module, name, "namespace slot already taken");
                    return false;
                }
                // `* as ns` cannot share a declaration with `{ ... }`.
                existing
                    .iter()
                    .zip(&decls)
                    .find(|(_, d)| d.named_imports().next().is_none())
                    .map(|(id, _)| *id)
            }
            ImportKind::Named => {
                let local = alias.unwrap_or(name);
                let bound = decls.iter().any(|d| {
                    d.named_imports().any(|n| match alias {
                        None => n.answers_to(name),
                        Some(_) => n.alias.as_deref().unwrap_or(&n.name) == local,
                    })
                });
                if bound {
                    debug!(module, name, "named import already present");
                    return false;
                }
                existing
                    .iter()
                    .zip(&decls)
                    .find(|(_, d)| d.namespace_import().is_none())
                    .map(|(id, _)| *id)
            }
        };

        match target {
            Some(id) => {
                debug!(module, %kind, name, "adding specifier to existing declaration");
                if let Some(decl) = self.binding.document_mut().import_mut(id) {
                    add_specifier(decl, name, alias, kind);
                }
            }
            None => {
                info!(module, %kind, name, "adding second declaration for module");
                let decl = self.new_declaration(name, alias, module, kind);
                self.binding.document_mut().insert_import(decl);
            }
        }
        true
    }

    /// A declaration styled after the file's first import.
    fn new_declaration(
        &self,
        name: &str,
        alias: Option<&str>,
        module: &str,
        kind: ImportKind,
    ) -> ImportDecl {
        let mut decl = ImportDecl::new(module);
        if let Some((_, first)) = self.doc().imports().next() {
            decl = decl.with_style(first.quote_char(), first.has_semicolon());
        }
        add_specifier(&mut decl, name, alias, kind);
        decl
    }

    /// Removes `name` from the given slot of `module`, deleting the
    /// declaration once it binds nothing. `Full` deletes the first
    /// declaration outright. Returns false when nothing matched.
    pub fn remove(&mut self, name: &str, module: &str, kind: ImportKind) -> bool {
        let found = self.declarations(module).find_map(|(id, d)| {
            let hit = match kind {
                ImportKind::Full => true,
                ImportKind::Default => d.default_import() == Some(name),
                ImportKind::Namespace => d.namespace_import() == Some(name),
                ImportKind::Named => d.named_imports().any(|n| n.answers_to(name)),
            };
            hit.then_some(id)
        });
        let Some(id) = found else {
            debug!(module, %kind, name, "nothing to remove");
            return false;
        };

        let doc = self.binding.document_mut();
        if kind == ImportKind::Full {
            info!(module, "removing import declaration");
            doc.remove_import(id);
            return true;
        }
        let Some(decl) = doc.import_mut(id) else {
            return false;
        };
        match kind {
            ImportKind::Default => decl.set_default(None),
            ImportKind::Namespace => decl.set_namespace(None),
            _ => {
                let position = decl.named_imports().position(|n| n.answers_to(name));
                if let Some(index) = position {
                    decl.remove_named(index);
                }
            }
        }
        if decl.has_no_specifiers() {
            info!(module, "declaration emptied; removing it");
            doc.remove_import(id);
        }
        true
    }

    /// Ensures the bindings of one import statement written as text.
    ///
    /// Recognizes `import X from 'm'`, `import * as X from 'm'`,
    /// `import { a, b } from 'm'` and `import 'm'`, tried in that order.
    /// Brace entries that are not plain identifiers (such as `a as b`) are
    /// skipped. Unrecognized text is ignored. Returns whether anything changed.
    pub fn ensure_from_statement(&mut self, text: &str) -> bool {
        if let Some(caps) = DEFAULT_STATEMENT.captures(text) {
            return self.ensure(&caps[1], &caps[2], ImportKind::Default);
        }
        if let Some(caps) = NAMESPACE_STATEMENT.captures(text) {
            return self.ensure(&caps[1], &caps[2], ImportKind::Namespace);
        }
        if let Some(caps) = NAMED_STATEMENT.captures(text) {
            let module = &caps[2];
            let mut changed = false;
            for name in caps[1].split(',').map(str::trim) {
                if name.is_empty() {
                    continue;
                }
                if !IDENTIFIER.is_match(name) {
                    debug!(entry = name, "skipping unsupported brace entry");
                    continue;
                }
                changed |= self.ensure(name, module, ImportKind::Named);
            }
            return changed;
        }
        if let Some(caps) = FULL_STATEMENT.captures(text) {
            return self.ensure("", &caps[1], ImportKind::Full);
        }
        debug!(statement = text, "unrecognized import statement");
        false
    }
}

fn add_specifier(decl: &mut ImportDecl, name: &str, alias: Option<&str>, kind: ImportKind) {
    match kind {
        ImportKind::Full => {}
        ImportKind::Default => decl.set_default(Some(name.to_string())),
        ImportKind::Namespace => decl.set_namespace(Some(name.to_string())),
        ImportKind::Named => decl.push_named(match alias {
            Some(alias) => NamedImport::aliased(name, alias),
            None => NamedImport::new(name),
        }),
    }
}

fn summarize(decl: &ImportDecl) -> ImportSummary {
    let mut specifiers = Vec::new();
    if let Some(name) = decl.default_import() {
        specifiers.push(ImportSpecifier {
            name: name.to_string(),
            kind: ImportKind::Default,
            alias: None,
        });
    }
    if let Some(name) = decl.namespace_import() {
        specifiers.push(ImportSpecifier {
            name: name.to_string(),
            kind: ImportKind::Namespace,
            alias: None,
        });
    }
    specifiers.extend(decl.named_imports().map(|n| ImportSpecifier {
        name: n.name.clone(),
        kind: ImportKind::Named,
        alias: n.alias.clone(),
    }));
    ImportSummary {
        module: decl.module().to_string(),
        specifiers,
    }
}
