//! Secrets referenced by the configuration.
//!
//! API keys and RPC URLs with embedded keys are either inline or read from the
//! environment (a `.env` file is loaded first). Resolved values are zeroized on drop.

mod error;
mod secret;

use std::env;

pub use error::{SecurityError, SecurityResult};
pub use secret::{SecretString, SecretValue};

/// Reads `key` from the environment.
pub fn get_env_var(key: &str) -> SecurityResult<String> {
	env::var(key).map_err(|e| {
		Box::new(SecurityError::missing_variable(
			format!("Missing {} environment variable", key),
			Some(e.into()),
			None,
		))
	})
}
