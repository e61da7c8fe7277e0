//! Blocks-per-day estimation error types.

use crate::utils::logging::error::{ErrorContext, ErrorKind, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur while estimating or caching block rates
#[derive(ThisError, Debug)]
pub enum BlockRateError {
	/// Block timestamps could not be fetched or were unusable
	#[error("Sampling error: {0}")]
	SamplingError(Box<ErrorContext>),

	/// The cache file could not be read, parsed or written
	#[error("Cache error: {0}")]
	CacheError(Box<ErrorContext>),

	/// No valid estimate exists for the chain
	#[error("Stale data: {0}")]
	StaleData(Box<ErrorContext>),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockRateError {
	// Sampling error
	pub fn sampling_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SamplingError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Cache error
	pub fn cache_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::CacheError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Stale data
	pub fn stale_data(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::StaleData(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::StaleData(_) => ErrorKind::StaleData,
			Self::CacheError(_) => ErrorKind::Decode,
			Self::SamplingError(_) | Self::Other(_) => ErrorKind::Transport,
		}
	}
}

impl TraceableError for BlockRateError {
	fn trace_id(&self) -> String {
		match self {
			Self::SamplingError(ctx) => ctx.trace_id.clone(),
			Self::CacheError(ctx) => ctx.trace_id.clone(),
			Self::StaleData(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
