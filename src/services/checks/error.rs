//! Check error types.

use crate::{
	services::blockchain::error_kind_of,
	utils::logging::error::{ErrorContext, ErrorKind, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that end one unit of a check (a chain, a log, an actor type)
#[derive(ThisError, Debug)]
pub enum CheckError {
	/// An RPC, explorer or pub/sub request failed
	#[error("Transport error: {0}")]
	TransportError(Box<ErrorContext>),

	/// A response, log or message could not be decoded
	#[error("Decode error: {0}")]
	DecodeError(Box<ErrorContext>),

	/// Derived data needed by the check is missing or expired
	#[error("Stale data: {0}")]
	StaleData(Box<ErrorContext>),

	/// The configuration lacks something the check needs
	#[error("Config error: {0}")]
	ConfigError(Box<ErrorContext>),

	/// A chain id or actor type outside the protocol tables
	#[error("Unknown identifier: {0}")]
	UnknownIdentifier(Box<ErrorContext>),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl CheckError {
	/// Builds the variant matching `kind`
	pub fn with_kind(
		kind: ErrorKind,
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Box::new(ErrorContext::new_with_log(msg, source, metadata));
		match kind {
			ErrorKind::Transport => Self::TransportError(context),
			ErrorKind::Decode => Self::DecodeError(context),
			ErrorKind::StaleData => Self::StaleData(context),
			ErrorKind::Config => Self::ConfigError(context),
			ErrorKind::UnknownIdentifier => Self::UnknownIdentifier(context),
		}
	}

	// Transport error
	pub fn transport_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::with_kind(ErrorKind::Transport, msg, source, metadata)
	}

	// Decode error
	pub fn decode_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::with_kind(ErrorKind::Decode, msg, source, metadata)
	}

	// Config error
	pub fn config_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::with_kind(ErrorKind::Config, msg, source, metadata)
	}

	// Unknown identifier
	pub fn unknown_identifier(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::with_kind(ErrorKind::UnknownIdentifier, msg, source, metadata)
	}

	/// Wraps a chain client failure, keeping its decode/transport nature
	pub fn from_client(
		msg: impl Into<String>,
		error: anyhow::Error,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::with_kind(error_kind_of(&error), msg, Some(error.into()), metadata)
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::TransportError(_) | Self::Other(_) => ErrorKind::Transport,
			Self::DecodeError(_) => ErrorKind::Decode,
			Self::StaleData(_) => ErrorKind::StaleData,
			Self::ConfigError(_) => ErrorKind::Config,
			Self::UnknownIdentifier(_) => ErrorKind::UnknownIdentifier,
		}
	}
}

impl TraceableError for CheckError {
	fn trace_id(&self) -> String {
		match self {
			Self::TransportError(ctx) => ctx.trace_id.clone(),
			Self::DecodeError(ctx) => ctx.trace_id.clone(),
			Self::StaleData(ctx) => ctx.trace_id.clone(),
			Self::ConfigError(ctx) => ctx.trace_id.clone(),
			Self::UnknownIdentifier(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
