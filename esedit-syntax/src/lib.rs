//! Lossless syntax layer for esedit.
//!
//! Parses JavaScript module text with `oxc_parser` into a [`Document`]:
//! recognized regions (import declarations and the `export default [...]`
//! array) become editable structure, everything else stays verbatim text.
//! Expressions live in an arena indexed by [`NodeId`]; edits mutate the
//! arena in place and printing walks whatever is live.
//!
//! Guarantees:
//! - `Document::parse(src).to_string() == src` for every input.
//! - Untouched nodes print exactly as written, comments and spacing included.
//! - A comment on the same line after an item's comma travels with that item.

mod document;
pub mod escape;
mod import;
mod node;
mod parser;
mod trivia;

pub use document::{DefaultExport, Document, ImportId};
pub use import::{ImportDecl, NamedImport};
pub use node::{DynamicImport, Node, NodeId, Property, Seq, SeqItem, Spread, StrLit};
