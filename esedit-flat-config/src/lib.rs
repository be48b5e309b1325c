//! Structure-preserving edits to ESLint flat config modules.
//!
//! A flat config module exports one array of configuration objects:
//!
//! ```text
//! export default [
//!   js.configs.recommended,
//!   { files: ['**/*.ts'], rules: { 'no-console': 'error' } },
//! ];
//! ```
//!
//! [`FlatConfigEditor`] treats each object literal in that array as a
//! [`ConfigEntry`] keyed by its `files` pattern set. Other elements stay where
//! they are and are never exposed as entries. Edits touch only the nodes they
//! target; comments, spacing and values the codec cannot interpret print
//! exactly as written.

mod editor;
mod entry;

pub use editor::FlatConfigEditor;
pub use entry::ConfigEntry;
pub use esedit_value::{Mapping, PropertyValue};
