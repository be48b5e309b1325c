//! Shared plumbing for the esedit editors.
//!
//! # Ports
//!
//! Storage is abstracted behind [`Tree`](ports::Tree); [`adapters`] provides
//! a filesystem tree and an in-memory one.
//!
//! # Sessions
//!
//! [`Binding`] is what an editor holds: either its own document read through
//! a `Tree`, or a borrowed, already-parsed [`SourceFile`].

pub mod adapters;
pub mod error;
pub mod ports;
pub mod source;

pub use adapters::{FsTree, InMemoryTree};
pub use error::{EditError, EditResult};
pub use ports::Tree;
pub use source::{Binding, SourceFile};
