//! Configuration layer.
//!
//! This module provides:
//! - The runtime service configuration and its validation ([`ServiceConfig`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Merged, validated startup configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file** (`[alertmanager]` section)
//! 3. **Built-in defaults** (disabled, empty URL, empty retry folder)
//!
//! `--enable` uses OR semantics: once `enabled = true` is set in the file,
//! the CLI cannot turn the service off.
//!
//! # Validation
//!
//! The retry folder must exist even while the service is disabled, so an
//! unconfigured setup fails validation with [`ConfigError::RetryFolderMissing`].

mod cli;
pub mod defaults;
mod error;
mod service;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use service::ServiceConfig;
pub use toml::{AlertManagerSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
