//! Secret values used in the monitor configuration.
//!
//! RPC endpoints frequently embed provider API keys and every explorer call carries an
//! API key, so both can be written inline or referenced through an environment
//! variable. Resolved values are held in a [`SecretString`] that is zeroized on drop.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
	impl_case_insensitive_enum,
	models::security::{error::SecurityResult, get_env_var},
};

/// A configuration value that is either given inline or read from the environment.
///
/// ```json
/// { "type": "plain", "value": "https://bsc-dataseed1.binance.org/" }
/// { "type": "environment", "value": "BSCSCAN_API_KEY" }
/// ```
#[derive(Debug, Clone, Serialize, ZeroizeOnDrop)]
#[serde(tag = "type", content = "value")]
#[serde(deny_unknown_fields)]
pub enum SecretValue {
	/// A plain text secret value
	Plain(SecretString),
	/// The name of an environment variable holding the secret
	Environment(String),
}

impl_case_insensitive_enum!(SecretValue, {
	"plain" => Plain,
	"environment" => Environment,
});

impl PartialEq for SecretValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Plain(l0), Self::Plain(r0)) => l0.as_str() == r0.as_str(),
			(Self::Environment(l0), Self::Environment(r0)) => l0 == r0,
			_ => false,
		}
	}
}

/// A string type that automatically zeroizes its contents when dropped.
#[derive(Debug, Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl SecretValue {
	/// Shorthand for an inline value.
	pub fn plain(value: impl Into<String>) -> Self {
		Self::Plain(SecretString::new(value.into()))
	}

	/// Resolves the secret value based on its type.
	///
	/// # Errors
	/// Returns a `SecurityError` if the referenced environment variable is not set.
	pub fn resolve(&self) -> SecurityResult<SecretString> {
		match self {
			SecretValue::Plain(secret) => Ok(secret.clone()),
			SecretValue::Environment(env_var) => get_env_var(env_var).map(SecretString::new),
		}
	}

	/// Checks if the secret value is empty
	pub fn is_empty(&self) -> bool {
		self.as_str().trim().is_empty()
	}

	/// Returns the secret value as a string
	///
	/// For `Environment` this is the variable name, not its content.
	pub fn as_str(&self) -> &str {
		match self {
			SecretValue::Plain(secret) => secret.as_str(),
			SecretValue::Environment(env_var) => env_var,
		}
	}
}

impl Zeroize for SecretValue {
	fn zeroize(&mut self) {
		match self {
			SecretValue::Plain(secret) => secret.zeroize(),
			SecretValue::Environment(env_var) => env_var.clear(),
		}
	}
}

impl SecretString {
	/// Creates a new `SecretString` with the given value.
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Gets a reference to the underlying string.
	///
	/// The reference should be used immediately and not stored.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}

impl fmt::Display for SecretValue {
	/// Never prints an inline secret.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SecretValue::Plain(_) => write!(f, "<redacted>"),
			SecretValue::Environment(env_var) => write!(f, "${}", env_var),
		}
	}
}
