//! Configuration loading and validation.
//!
//! This module provides the trait and implementation used to load the monitor
//! configuration file, resolve its secrets and validate it.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};

mod error;
mod monitor_config;

pub use error::ConfigError;

/// Location of the configuration file when neither the CLI nor the environment names one
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.json";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`]
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG_PATH";

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load configuration from a specific file path
	///
	/// Secrets are resolved and the result is validated before it is returned.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the configuration
	///
	/// Returns Ok(()) if valid, or a single error listing every problem found.
	fn validate(&self) -> Result<(), ConfigError>;

	/// Resolve all secrets in the configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError>;

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}

/// Picks the configuration path: explicit argument, then `MONITOR_CONFIG_PATH`, then the default.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
	if let Some(path) = explicit {
		return path.to_path_buf();
	}
	match std::env::var(CONFIG_PATH_ENV) {
		Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
		_ => PathBuf::from(DEFAULT_CONFIG_PATH),
	}
}
