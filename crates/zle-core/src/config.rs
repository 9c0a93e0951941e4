//! Configuration types.
//!
//! The shell reads `config.toml` from the zle config directory. Every
//! field has a default, so a missing file is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Runtime configuration for the interactive shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// Keymap selected when a session starts.
    pub default_keymap: String,

    /// Keymaps the session knows about, in addition to the default.
    pub keymaps: Vec<String>,

    /// Lua script loaded at startup to define widget functions.
    pub init_script: Option<PathBuf>,

    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_keymap: "main".to_string(),
            keymaps: vec![
                "emacs".to_string(),
                "viins".to_string(),
                "vicmd".to_string(),
                "isearch".to_string(),
                "command".to_string(),
            ],
            init_script: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl ShellConfig {
    /// Load the config from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load the config from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// All keymap names: the default one first.
    pub fn all_keymaps(&self) -> Vec<String> {
        let mut names = vec![self.default_keymap.clone()];
        for name in &self.keymaps {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("zle"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
