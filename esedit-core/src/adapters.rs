//! Default [`Tree`] implementations.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::ports::Tree;

/// Filesystem tree rooted at a directory. Relative paths resolve against `root`.
#[derive(Debug, Clone)]
pub struct FsTree {
    pub root: Utf8PathBuf,
}

impl FsTree {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Tree for FsTree {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Option<Vec<u8>>> {
        let full = self.resolve(path);
        match fs_err::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %full, "file not found");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("read {}", full)),
        }
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", full))?;
        }
        debug!(path = %full, bytes = contents.len(), "writing file");
        fs_err::write(&full, contents).with_context(|| format!("write {}", full))
    }
}

/// In-memory tree for embedding and testing.
#[derive(Debug, Default)]
pub struct InMemoryTree {
    files: RefCell<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree pre-populated with text files.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<Utf8PathBuf>,
        C: Into<String>,
    {
        let tree = Self::new();
        for (path, contents) in files {
            tree.insert(path, contents.into());
        }
        tree
    }

    pub fn insert(&self, path: impl Into<Utf8PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), contents.into());
    }

    /// Current contents of `path` as text, if present and valid UTF-8.
    pub fn text(&self, path: impl AsRef<Utf8Path>) -> Option<String> {
        let files = self.files.borrow();
        let bytes = files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }
}

impl Tree for InMemoryTree {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        self.insert(path, contents.to_vec());
        Ok(())
    }
}
