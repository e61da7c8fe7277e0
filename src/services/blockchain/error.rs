//! Chain client error types.
//!
//! Clients return `anyhow::Error` at their trait boundary; the concrete causes are
//! these variants or a [`TransportError`], and [`error_kind_of`] recovers the
//! taxonomy from either.

use crate::{
	services::blockchain::TransportError,
	utils::logging::error::{ErrorContext, ErrorKind, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur while reading chain data
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// No endpoint of the chain could be reached
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// Malformed request or an RPC answer without the expected `result`
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// A `result` that does not decode into the expected type
	#[error("Decode error: {0}")]
	DecodeError(ErrorContext),

	/// When a requested block cannot be found on the chain
	#[error("Block not found: {0}")]
	BlockNotFound(ErrorContext),

	/// Errors related to client pool
	#[error("Client pool error: {0}")]
	ClientPoolError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	// Connection error
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Request error
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Decode error
	pub fn decode_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DecodeError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Block not found
	pub fn block_not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockNotFound(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Client pool error
	pub fn client_pool_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ClientPoolError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::DecodeError(_) => ErrorKind::Decode,
			Self::Other(err) => error_kind_of(err),
			_ => ErrorKind::Transport,
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) => ctx.trace_id.clone(),
			Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::DecodeError(ctx) => ctx.trace_id.clone(),
			Self::BlockNotFound(ctx) => ctx.trace_id.clone(),
			Self::ClientPoolError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

/// Classifies a client error by the first typed cause found in its chain.
///
/// Untyped failures count as transport errors.
pub fn error_kind_of(err: &anyhow::Error) -> ErrorKind {
	for cause in err.chain() {
		if let Some(transport_error) = cause.downcast_ref::<TransportError>() {
			return transport_error.kind();
		}
		if let Some(chain_error) = cause.downcast_ref::<BlockChainError>() {
			if !matches!(chain_error, BlockChainError::Other(_)) {
				return chain_error.kind();
			}
		}
	}
	ErrorKind::Transport
}
