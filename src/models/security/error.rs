//! Secret resolution errors.

use crate::utils::logging::error::{ErrorContext, ErrorKind, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

pub type SecurityResult<T> = Result<T, Box<SecurityError>>;

#[derive(ThisError, Debug)]
pub enum SecurityError {
	/// A secret refers to an environment variable that is not set or not unicode
	#[error("Missing variable: {0}")]
	MissingVariable(ErrorContext),
}

impl SecurityError {
	pub fn missing_variable(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::MissingVariable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn kind(&self) -> ErrorKind {
		ErrorKind::Config
	}
}

impl TraceableError for SecurityError {
	fn trace_id(&self) -> String {
		match self {
			Self::MissingVariable(ctx) => ctx.trace_id.clone(),
		}
	}
}
