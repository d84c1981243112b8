//! Configuration for windowing, previews, loading and local sources.
//!
//! Settings live in a TOML file in the platform config directory and can be
//! overridden per process with `DOCTREE_*` environment variables.
//!
//! ## File Location
//!
//! - Linux: `~/.config/doctree/config.toml`
//! - macOS: `~/Library/Application Support/dev.doctree.doctree/config.toml`
//! - Windows: `%APPDATA%\doctree\doctree\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [window]
//! size = 50
//! tree_nodes = 20
//! node_context = 5
//! block_context = 0
//!
//! [preview]
//! blocks = 5
//! chars = 500
//! sentences = 3
//!
//! [loading]
//! depth_mode = "type"
//! error_policy = "retain"
//!
//! [local]
//! pattern = "**/*.md"
//! ```
//!
//! ```rust
//! use doctree_core::Config;
//!
//! let config: Config = toml::from_str("[window]\nsize = 10").unwrap();
//! assert_eq!(config.window.size, 10);
//! assert_eq!(config.window.tree_nodes, 20);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lazy::ErrorPolicy;
use crate::local::DEFAULT_PATTERN;
use crate::tree::DepthMode;
use crate::window::{DEFAULT_NODE_CONTEXT, DEFAULT_TREE_NODES, DEFAULT_WINDOW_SIZE, TreeWindower, Windower};

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "DOCTREE_";

/// Top-level settings. Every section falls back to its defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub preview: PreviewConfig,
    pub loading: LoadingConfig,
    pub local: LocalConfig,
}

/// Pagination defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Blocks per flat window.
    pub size: usize,
    /// Nodes per tree window.
    pub tree_nodes: usize,
    /// Leading nodes shown before a tree search hit.
    pub node_context: usize,
    /// Leading blocks shown before a flat search hit.
    pub block_context: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            tree_nodes: DEFAULT_TREE_NODES,
            node_context: DEFAULT_NODE_CONTEXT,
            block_context: 0,
        }
    }
}

impl WindowConfig {
    #[must_use]
    pub fn windower(&self) -> Windower {
        Windower::new(self.size)
    }

    #[must_use]
    pub fn tree_windower(&self) -> TreeWindower {
        TreeWindower::new(self.tree_nodes).with_context(self.node_context)
    }
}

/// Preview bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub blocks: usize,
    pub chars: usize,
    pub sentences: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            blocks: 5,
            chars: 500,
            sentences: 3,
        }
    }
}

/// How documents turn blocks into trees and treat provider failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub depth_mode: DepthMode,
    pub error_policy: ErrorPolicy,
}

/// Local directory sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Glob relative to the source directory.
    pub pattern: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, or defaults when no file exists, then
    /// apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, the file
    /// exists but cannot be read or parsed, an override is malformed, or the
    /// result fails [`Config::validate`].
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::read(&path)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails [`Config::validate`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Write to the default location, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Write to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    /// Platform location of `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "doctree", "doctree")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Apply `DOCTREE_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Recognized keys are
    /// `DOCTREE_WINDOW_SIZE`, `DOCTREE_TREE_NODES_PER_WINDOW`,
    /// `DOCTREE_DEPTH_MODE` and `DOCTREE_ERROR_POLICY`.
    ///
    /// # Errors
    ///
    /// Returns an error when a present value cannot be parsed.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("WINDOW_SIZE") {
            self.window.size = parse_count("WINDOW_SIZE", &value)?;
        }
        if let Some(value) = var("TREE_NODES_PER_WINDOW") {
            self.window.tree_nodes = parse_count("TREE_NODES_PER_WINDOW", &value)?;
        }
        if let Some(value) = var("DEPTH_MODE") {
            self.loading.depth_mode = parse_variant("DEPTH_MODE", &value)?;
        }
        if let Some(value) = var("ERROR_POLICY") {
            self.loading.error_policy = parse_variant("ERROR_POLICY", &value)?;
        }
        Ok(())
    }

    /// Reject settings that cannot produce a usable window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a window size is zero or the local
    /// pattern is empty.
    pub fn validate(&self) -> Result<()> {
        if self.window.size == 0 {
            return Err(Error::Config("window.size must be at least 1".into()));
        }
        if self.window.tree_nodes == 0 {
            return Err(Error::Config("window.tree_nodes must be at least 1".into()));
        }
        if self.local.pattern.trim().is_empty() {
            return Err(Error::Config("local.pattern must not be empty".into()));
        }
        Ok(())
    }
}

/// Parse `value` with the same spellings the config file accepts.
fn parse_variant<T: DeserializeOwned>(name: &str, value: &str) -> Result<T> {
    let spelled = Value::String(value.trim().to_ascii_lowercase());
    serde_json::from_value(spelled)
        .map_err(|e| Error::Config(format!("{ENV_PREFIX}{name} is invalid: {e}")))
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{ENV_PREFIX}{name} must be a number: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.window.size, 50);
        assert_eq!(config.window.tree_nodes, 20);
        assert_eq!(config.window.node_context, 5);
        assert_eq!(config.window.block_context, 0);
        assert_eq!(config.preview.chars, 500);
        assert_eq!(config.loading.depth_mode, DepthMode::Type);
        assert_eq!(config.loading.error_policy, ErrorPolicy::Retain);
        assert_eq!(config.local.pattern, "**/*.md");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [loading]
            depth_mode = "indent"
            error_policy = "silent"
            "#,
        )
        .unwrap();

        assert_eq!(config.loading.depth_mode, DepthMode::Indent);
        assert_eq!(config.loading.error_policy, ErrorPolicy::Silent);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() -> Result<()> {
        // Given: a customized config written to disk
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.window.size = 7;
        config.preview.sentences = 1;

        // When: saving and loading it back
        config.save_to(&path)?;
        let loaded = Config::read(&path)?;

        // Then: nothing is lost
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[window\nsize = ").unwrap();

        let result = Config::load_from(&path);

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let mut config = Config::default();

        config.apply_overrides(env(&[
            ("DOCTREE_WINDOW_SIZE", "12"),
            ("DOCTREE_TREE_NODES_PER_WINDOW", " 4 "),
            ("DOCTREE_DEPTH_MODE", "Indent"),
            ("DOCTREE_ERROR_POLICY", "silent"),
        ]))?;

        assert_eq!(config.window.size, 12);
        assert_eq!(config.window.tree_nodes, 4);
        assert_eq!(config.loading.depth_mode, DepthMode::Indent);
        assert_eq!(config.loading.error_policy, ErrorPolicy::Silent);
        Ok(())
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let mut config = Config::default();

        assert!(config.apply_overrides(env(&[("DOCTREE_WINDOW_SIZE", "lots")])).is_err());
        assert!(config.apply_overrides(env(&[("DOCTREE_DEPTH_MODE", "random")])).is_err());
    }

    #[test]
    fn test_env_spellings_match_config_file() -> Result<()> {
        // Given: every variant spelled as the TOML file spells it
        let file: Config = toml::from_str("[loading]\ndepth_mode = \"indent\"\nerror_policy = \"silent\"\n")?;
        let mut from_env = Config::default();

        // When: the same words arrive through the environment
        from_env.apply_overrides(env(&[
            ("DOCTREE_DEPTH_MODE", " INDENT "),
            ("DOCTREE_ERROR_POLICY", "Silent"),
        ]))?;

        // Then: both routes agree, and a bad word names the variable
        assert_eq!(from_env.loading, file.loading);
        let err = from_env
            .apply_overrides(env(&[("DOCTREE_ERROR_POLICY", "loud")]))
            .unwrap_err();
        assert!(err.to_string().contains("DOCTREE_ERROR_POLICY"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut config = Config::default();
        config.window.size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.tree_nodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_windowers_follow_config() {
        let mut config = Config::default();
        config.window.size = 9;
        config.window.tree_nodes = 3;

        assert_eq!(config.window.windower().default_size(), 9);
        assert_eq!(config.window.tree_windower().default_nodes(), 3);
    }
}
