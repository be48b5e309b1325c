//! Configuration file loading for esedit.
//!
//! Discovers and loads `esedit.toml` from the repository root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "esedit.toml";

/// Flat config location used when neither the file nor the CLI names one.
pub const DEFAULT_ESLINT_CONFIG: &str = "eslint.config.mjs";

/// Top-level configuration from esedit.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EseditConfig {
    pub eslint: EslintConfig,

    /// Whether edits go to disk or only print a diff.
    pub apply: ApplyConfig,
}

/// Eslint section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EslintConfig {
    /// Flat config module, relative to the repository root.
    pub path: Utf8PathBuf,
}

impl Default for EslintConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from(DEFAULT_ESLINT_CONFIG),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    pub write: bool,
}

/// Discover the esedit.toml config file.
///
/// Returns `None` if the repository root has none.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an esedit.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<EseditConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<EseditConfig> {
    let config: EseditConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<EseditConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(EseditConfig::default()),
    }
}

/// Settings for one invocation after the CLI has had its say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub eslint_config: Utf8PathBuf,
    pub write: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: EseditConfig,
}

impl ConfigMerger {
    pub fn new(config: EseditConfig) -> Self {
        Self { config }
    }

    /// An explicit `--config` replaces the file's path; `--write` can only
    /// switch writing on.
    pub fn merge_args(&self, cli_config: Option<&Utf8Path>, cli_write: bool) -> MergedConfig {
        let eslint_config = cli_config
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| self.config.eslint.path.clone());
        MergedConfig {
            eslint_config,
            write: cli_write || self.config.apply.write,
        }
    }
}
