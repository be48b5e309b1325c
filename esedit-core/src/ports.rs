//! Port traits abstracting storage away from the editors.

use camino::Utf8Path;

/// Workspace storage: the host project's file tree or an in-memory stand-in.
pub trait Tree {
    /// Contents of `path`, or `None` when it does not exist.
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Option<Vec<u8>>>;
    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}

impl<T: Tree + ?Sized> Tree for &T {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Option<Vec<u8>>> {
        (**self).read(path)
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        (**self).write(path, contents)
    }
}
