//! Error types for esedit editing sessions.
//!
//! Blocking errors (exit code 2) mean the request cannot apply to the file as
//! it stands:
//! - the flat config has no `export default [...]` array
//! - a spread operation names an entry that does not exist
//!
//! Runtime errors (exit code 1) come from collaborators: I/O, undecodable bytes.

use camino::Utf8PathBuf;
use thiserror::Error;

/// The top-level error type for esedit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// The file does not have the shape the editor requires. Raised at construction.
    #[error("structural error in {path}: {message}")]
    Structural { path: Utf8PathBuf, message: String },

    /// The operation's target is missing or has the wrong shape.
    #[error("precondition failed: {message}")]
    Precondition { message: String },

    /// A runtime/tool error occurred (exit code 1).
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

impl EditError {
    pub fn structural(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        EditError::Structural {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        EditError::Precondition {
            message: message.into(),
        }
    }

    /// Returns true if the request was blocked by the file's content (exit code 2).
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            EditError::Structural { .. } | EditError::Precondition { .. }
        )
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_block() { 2 } else { 1 }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
