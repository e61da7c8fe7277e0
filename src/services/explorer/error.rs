//! Block explorer error types.

use crate::utils::logging::error::{ErrorContext, ErrorKind, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur while querying a block explorer
#[derive(ThisError, Debug)]
pub enum ExplorerError {
	/// The request could not be sent or returned a non-success HTTP status
	#[error("Request error: {0}")]
	RequestError(Box<ErrorContext>),

	/// The explorer answered with `status != "1"`
	#[error("Explorer rejected request: {0}")]
	RejectedError(Box<ErrorContext>),

	/// The body does not have the expected shape
	#[error("Decode error: {0}")]
	DecodeError(Box<ErrorContext>),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ExplorerError {
	// Request error
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Rejected error
	pub fn rejected_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RejectedError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Decode error
	pub fn decode_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DecodeError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::DecodeError(_) => ErrorKind::Decode,
			_ => ErrorKind::Transport,
		}
	}
}

impl TraceableError for ExplorerError {
	fn trace_id(&self) -> String {
		match self {
			Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::RejectedError(ctx) => ctx.trace_id.clone(),
			Self::DecodeError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
