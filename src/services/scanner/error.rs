//! Log scanning error types.

use crate::{
	services::blockchain::error_kind_of,
	utils::logging::error::{ErrorContext, ErrorKind, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that abort a range resolution or a scan
#[derive(ThisError, Debug)]
pub enum ScanError {
	/// An RPC or explorer request failed
	#[error("Transport error: {0}")]
	TransportError(Box<ErrorContext>),

	/// A response could not be decoded
	#[error("Decode error: {0}")]
	DecodeError(Box<ErrorContext>),

	/// No usable blocks-per-day estimate for the chain
	#[error("Stale data: {0}")]
	StaleData(Box<ErrorContext>),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ScanError {
	// Transport error
	pub fn transport_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TransportError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Decode error
	pub fn decode_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DecodeError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Stale data
	pub fn stale_data(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::StaleData(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Wraps a chain client failure, keeping its decode/transport nature.
	pub fn from_client(
		msg: impl Into<String>,
		error: anyhow::Error,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		match error_kind_of(&error) {
			ErrorKind::Decode => Self::decode_error(msg, Some(error.into()), metadata),
			_ => Self::transport_error(msg, Some(error.into()), metadata),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::DecodeError(_) => ErrorKind::Decode,
			Self::StaleData(_) => ErrorKind::StaleData,
			Self::TransportError(_) | Self::Other(_) => ErrorKind::Transport,
		}
	}
}

impl TraceableError for ScanError {
	fn trace_id(&self) -> String {
		match self {
			Self::TransportError(ctx) => ctx.trace_id.clone(),
			Self::DecodeError(ctx) => ctx.trace_id.clone(),
			Self::StaleData(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
