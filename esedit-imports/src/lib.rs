//! Idempotent editing of a module's import declarations.
//!
//! [`ImportsEditor`] answers and applies requests of the form "module `m`
//! should bind `name` as a default / namespace / named import", or "module
//! `m` should be loaded for its side effects". Declarations the editor does
//! not touch print exactly as written; touched ones keep their quote style,
//! semicolon and multi-line layout.

mod editor;
mod kind;

pub use editor::ImportsEditor;
pub use kind::{ImportKind, ImportSpecifier, ImportSummary};
