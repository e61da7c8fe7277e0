//! Pub/sub error types.

use crate::utils::logging::error::{ErrorContext, ErrorKind, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur while subscribing or handling messages
#[derive(ThisError, Debug)]
pub enum PubSubError {
	/// A receive loop is already running for the topic
	#[error("Already subscribed: {0}")]
	AlreadySubscribed(Box<ErrorContext>),

	/// Negative subscription timeout
	#[error("Invalid timeout: {0}")]
	InvalidTimeout(Box<ErrorContext>),

	/// The subscription stream could not be opened or broke
	#[error("Transport error: {0}")]
	TransportError(Box<ErrorContext>),

	/// An envelope or payload could not be decoded
	#[error("Decode error: {0}")]
	DecodeError(Box<ErrorContext>),

	/// A message refers to a chain or actor outside the protocol tables
	#[error("Unknown identifier: {0}")]
	UnknownIdentifier(Box<ErrorContext>),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl PubSubError {
	// Already subscribed
	pub fn already_subscribed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::AlreadySubscribed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Invalid timeout
	pub fn invalid_timeout(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidTimeout(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

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

	// Unknown identifier
	pub fn unknown_identifier(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UnknownIdentifier(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::AlreadySubscribed(_) | Self::InvalidTimeout(_) => ErrorKind::Config,
			Self::DecodeError(_) => ErrorKind::Decode,
			Self::UnknownIdentifier(_) => ErrorKind::UnknownIdentifier,
			Self::TransportError(_) | Self::Other(_) => ErrorKind::Transport,
		}
	}
}

impl TraceableError for PubSubError {
	fn trace_id(&self) -> String {
		match self {
			Self::AlreadySubscribed(ctx) => ctx.trace_id.clone(),
			Self::InvalidTimeout(ctx) => ctx.trace_id.clone(),
			Self::TransportError(ctx) => ctx.trace_id.clone(),
			Self::DecodeError(ctx) => ctx.trace_id.clone(),
			Self::UnknownIdentifier(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
