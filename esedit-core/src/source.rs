//! Live source handles and the binding an editing session works through.
//!
//! A session is bound either to a workspace [`Tree`] (it owns its document
//! and writes back through the tree) or to a caller's [`SourceFile`] (it
//! mutates the caller's document in place and saves through the file).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use esedit_syntax::Document;
use tracing::debug;

use crate::ports::Tree;

/// A parsed source file that knows where it persists.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: Utf8PathBuf,
    document: Document,
}

impl SourceFile {
    /// Reads and parses the file at `path`.
    pub fn open(path: impl Into<Utf8PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let text = fs_err::read_to_string(&path).with_context(|| format!("read {}", path))?;
        Ok(Self::from_text(path, &text))
    }

    pub fn from_text(path: impl Into<Utf8PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            document: Document::parse(text),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn text(&self) -> String {
        self.document.to_string()
    }

    /// Writes the current text back to the file's own path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&self.path)
    }

    pub fn save_to(&self, path: &Utf8Path) -> anyhow::Result<()> {
        debug!(path = %path, "saving source file");
        fs_err::write(path, self.text()).with_context(|| format!("write {}", path))
    }
}

/// Where an editing session reads from and saves to.
pub enum Binding<'a> {
    Workspace {
        tree: &'a dyn Tree,
        path: Utf8PathBuf,
        document: Document,
    },
    Live {
        file: &'a mut SourceFile,
        path: Utf8PathBuf,
    },
}

impl<'a> Binding<'a> {
    /// Reads `path` through `tree`. A missing file reads as empty text.
    pub fn open(tree: &'a dyn Tree, path: impl Into<Utf8PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let bytes = tree.read(&path)?.unwrap_or_default();
        let text = String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path))?;
        Ok(Binding::Workspace {
            tree,
            document: Document::parse(&text),
            path,
        })
    }

    /// Binds to an already-parsed file. `path` overrides the file's own path for saving.
    pub fn live(file: &'a mut SourceFile, path: Option<&Utf8Path>) -> Self {
        let path = path.map_or_else(|| file.path().to_path_buf(), Utf8Path::to_path_buf);
        Binding::Live { file, path }
    }

    pub fn path(&self) -> &Utf8Path {
        match self {
            Binding::Workspace { path, .. } | Binding::Live { path, .. } => path,
        }
    }

    pub fn document(&self) -> &Document {
        match self {
            Binding::Workspace { document, .. } => document,
            Binding::Live { file, .. } => file.document(),
        }
    }

    pub fn document_mut(&mut self) -> &mut Document {
        match self {
            Binding::Workspace { document, .. } => document,
            Binding::Live { file, .. } => file.document_mut(),
        }
    }

    /// Full current text.
    pub fn content(&self) -> String {
        self.document().to_string()
    }

    /// Performs exactly one write of the current text.
    pub fn save(&self) -> anyhow::Result<()> {
        match self {
            Binding::Workspace {
                tree,
                path,
                document,
            } => tree
                .write(path, document.to_string().as_bytes())
                .with_context(|| format!("save {}", path)),
            Binding::Live { file, path } => file.save_to(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTree;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn workspace_binding_reads_missing_file_as_empty() {
        let tree = InMemoryTree::new();
        let binding = Binding::open(&tree, "a.js").unwrap();
        assert_eq!(binding.content(), "");
        assert_eq!(binding.path().as_str(), "a.js");
    }

    #[test]
    fn workspace_binding_saves_through_the_tree() {
        let tree = InMemoryTree::with_files([("a.js", "run();\n")]);
        let mut binding = Binding::open(&tree, "a.js").unwrap();
        binding
            .document_mut()
            .insert_import(esedit_syntax::ImportDecl::new("x"));
        assert_eq!(tree.text("a.js").as_deref(), Some("run();\n"));
        binding.save().unwrap();
        assert_eq!(tree.text("a.js").as_deref(), Some("import 'x';\nrun();\n"));
    }

    #[test]
    fn invalid_utf8_is_a_runtime_error() {
        let tree = InMemoryTree::new();
        tree.insert("bad.js", vec![0xff, 0xfe]);
        assert!(Binding::open(&tree, "bad.js").is_err());
    }

    #[test]
    fn live_binding_edits_the_callers_document() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("a.js")).unwrap();
        fs_err::write(&path, "run();\n").unwrap();

        let mut file = SourceFile::open(&path).unwrap();
        {
            let mut binding = Binding::live(&mut file, None);
            binding
                .document_mut()
                .insert_import(esedit_syntax::ImportDecl::new("x"));
            binding.save().unwrap();
        }
        assert_eq!(file.text(), "import 'x';\nrun();\n");
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "import 'x';\nrun();\n");
    }

    #[test]
    fn live_binding_can_save_elsewhere() {
        let dir = TempDir::new().unwrap();
        let target = Utf8PathBuf::from_path_buf(dir.path().join("out.js")).unwrap();
        let mut file = SourceFile::from_text("memory.js", "export default [];\n");
        let binding = Binding::live(&mut file, Some(target.as_path()));
        assert_eq!(binding.path(), target.as_path());
        binding.save().unwrap();
        assert_eq!(fs_err::read_to_string(&target).unwrap(), "export default [];\n");
    }
}
