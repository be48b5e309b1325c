//! Specifier kinds and the read-only summaries handed to callers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which slot of an import declaration a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// `import { name } from 'm'`
    Named,
    /// `import name from 'm'`
    Default,
    /// `import * as name from 'm'`
    Namespace,
    /// `import 'm'`, loaded for its side effects.
    Full,
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportKind::Named => "named",
            ImportKind::Default => "default",
            ImportKind::Namespace => "namespace",
            ImportKind::Full => "full",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "named" => Ok(ImportKind::Named),
            "default" => Ok(ImportKind::Default),
            "namespace" => Ok(ImportKind::Namespace),
            "full" => Ok(ImportKind::Full),
            other => Err(format!(
                "unknown import kind `{other}` (expected named, default, namespace or full)"
            )),
        }
    }
}

/// One bound name of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpecifier {
    pub name: String,
    pub kind: ImportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A declaration as reported by `list` and `find`: default first, then
/// namespace, then named specifiers in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub module: String,
    pub specifiers: Vec<ImportSpecifier>,
}
