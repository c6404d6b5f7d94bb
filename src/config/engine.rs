//! Engine configuration (`~/.ctmpl/config.toml`).
//!
//! ```toml
//! # HTML-escape the output of `{{ ... }}` expressions
//! autoescape = false
//!
//! # Tera built-in functions templates may call besides
//! # `service`, `key` and `keyPrefix`
//! builtin_functions = ["range", "throw"]
//!
//! # Filters templates may apply; defaults to every Tera built-in filter
//! builtin_filters = ["upper", "lower", "join"]
//! ```
//!
//! Every field is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BUILTIN_FILTERS, DEFAULT_BUILTIN_FUNCTIONS,
};

fn default_builtin_functions() -> Vec<String> {
    DEFAULT_BUILTIN_FUNCTIONS.iter().map(|name| (*name).to_string()).collect()
}

fn is_default_builtin_functions(functions: &[String]) -> bool {
    functions == default_builtin_functions().as_slice()
}

fn default_builtin_filters() -> Vec<String> {
    DEFAULT_BUILTIN_FILTERS.iter().map(|name| (*name).to_string()).collect()
}

fn is_default_builtin_filters(filters: &[String]) -> bool {
    filters == default_builtin_filters().as_slice()
}

/// Options applied when a template is parsed and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HTML-escape `{{ ... }}` output. Off by default: rendered files are
    /// configuration, not markup.
    #[serde(default)]
    pub autoescape: bool,

    /// Tera built-in functions templates are allowed to call.
    #[serde(
        default = "default_builtin_functions",
        skip_serializing_if = "is_default_builtin_functions"
    )]
    pub builtin_functions: Vec<String>,

    /// Tera filters templates are allowed to apply.
    #[serde(
        default = "default_builtin_filters",
        skip_serializing_if = "is_default_builtin_filters"
    )]
    pub builtin_filters: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            autoescape: false,
            builtin_functions: default_builtin_functions(),
            builtin_filters: default_builtin_filters(),
        }
    }
}

impl EngineConfig {
    /// Load from `path` if given, otherwise from [`default_path`](Self::default_path).
    ///
    /// A file that does not exist yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match Self::default_path() {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("No default config location: {e}");
                    return Ok(Self::default());
                }
            },
        };

        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `~/.ctmpl/config.toml`, or `%LOCALAPPDATA%\ctmpl\config.toml` on Windows.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join(CONFIG_DIR_NAME.trim_start_matches('.'))
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(CONFIG_DIR_NAME)
        };

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}
