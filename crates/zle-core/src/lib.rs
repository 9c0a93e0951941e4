//! Core types for the zle widget registry.
//!
//! This crate contains shared data structures used across all zle crates:
//! - Error types and the command exit status
//! - Widget capability flags and the repeat-count modifier
//! - Configuration types

mod config;
mod error;
mod flags;

pub use config::{config_dir, config_path, ShellConfig};
pub use error::{ConfigError, Status, ZleError, ZleResult};
pub use flags::{Modifier, ModifierFlags, WidgetFlags};
