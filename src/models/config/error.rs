//! Configuration error types.

use crate::utils::logging::error::{ErrorContext, ErrorKind, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to load the monitor configuration.
///
/// Never logged on construction; `main` reports it once before exiting.
#[derive(ThisError, Debug)]
pub enum ConfigError {
	/// The file is well-formed but values are missing or invalid
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// The file is not valid JSON for [`crate::models::MonitorConfig`]
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// The file cannot be read or has the wrong extension
	#[error("File error: {0}")]
	FileError(ErrorContext),

	/// Environment references that are not set
	#[error("Secret error: {0}")]
	SecretError(ErrorContext),
}

impl ConfigError {
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Source>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new(msg, source, metadata))
	}

	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<Source>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new(msg, source, metadata))
	}

	pub fn file_error(
		msg: impl Into<String>,
		source: Option<Source>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FileError(ErrorContext::new(msg, source, metadata))
	}

	pub fn secret_error(
		msg: impl Into<String>,
		source: Option<Source>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SecretError(ErrorContext::new(msg, source, metadata))
	}

	pub fn kind(&self) -> ErrorKind {
		ErrorKind::Config
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::ValidationError(ctx)
			| Self::ParseError(ctx)
			| Self::FileError(ctx)
			| Self::SecretError(ctx) => ctx,
		}
	}
}

impl TraceableError for ConfigError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
