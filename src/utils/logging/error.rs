//! Error context shared by every service error.
//!
//! Service errors wrap an [`ErrorContext`] holding the message, the optional cause,
//! key-value metadata (chain, url, sender ...), a timestamp and a trace id that is
//! inherited from the cause when it has one. [`ErrorKind`] is the coarse class that
//! ends up in error-shaped records.

use chrono::Utc;
use serde::Serialize;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification written as `error_kind` in records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// RPC, explorer or pub/sub endpoint unreachable or answering with an error
	Transport,
	/// Response or message body without the expected shape
	Decode,
	/// No usable blocks-per-day estimate
	StaleData,
	/// Missing or invalid configuration
	Config,
	/// Chain id or actor type absent from the static tables
	UnknownIdentifier,
}

impl ErrorKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Transport => "transport",
			Self::Decode => "decode",
			Self::StaleData => "stale_data",
			Self::Config => "config",
			Self::UnknownIdentifier => "unknown_identifier",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug)]
pub struct ErrorContext {
	pub message: String,
	pub source: Option<Source>,
	pub metadata: Option<HashMap<String, String>>,
	/// RFC 3339
	pub timestamp: String,
	pub trace_id: String,
}

impl ErrorContext {
	/// Builds a context, reusing the trace id found in `source` if any.
	pub fn new(
		message: impl Into<String>,
		source: Option<Source>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = match &source {
			Some(source) => TraceableError::trace_id(source.as_ref()),
			None => Uuid::new_v4().to_string(),
		};
		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Like [`ErrorContext::new`], and logs the error at `error` level.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<Source>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		log_error(&context);
		context
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// `"message [k1=v1, k2=v2]"` with keys sorted.
	pub fn format_with_metadata(&self) -> String {
		let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) else {
			return self.message.clone();
		};
		let mut pairs: Vec<(&String, &String)> = metadata.iter().collect();
		pairs.sort();
		let pairs: Vec<String> = pairs
			.into_iter()
			.map(|(key, value)| format!("{}={}", key, value))
			.collect();
		format!("{} [{}]", self.message, pairs.join(", "))
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.format_with_metadata())
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// Errors that carry a trace id
pub trait TraceableError: std::error::Error + Send + Sync {
	fn trace_id(&self) -> String;
}

impl TraceableError for dyn std::error::Error + Send + Sync + 'static {
	/// First trace id found on the error or its first few causes, else a fresh one.
	fn trace_id(&self) -> String {
		const MAX_DEPTH: usize = 4;

		let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
		for _ in 0..MAX_DEPTH {
			let Some(error) = current else {
				break;
			};
			if let Some(id) = known_trace_id(error) {
				return id;
			}
			current = error.source();
		}
		Uuid::new_v4().to_string()
	}
}

fn known_trace_id(err: &(dyn std::error::Error + 'static)) -> Option<String> {
	if let Some(context) = err.downcast_ref::<ErrorContext>() {
		return Some(context.trace_id.clone());
	}

	macro_rules! try_downcast {
		($($ty:path),*) => {
			$(
				if let Some(e) = err.downcast_ref::<$ty>() {
					return Some(e.trace_id());
				}
			)*
		}
	}

	try_downcast!(
		crate::services::blockchain::BlockChainError,
		crate::services::blockchain::TransportError,
		crate::services::explorer::ExplorerError,
		crate::services::blockrate::BlockRateError,
		crate::services::scanner::ScanError,
		crate::services::pubsub::PubSubError,
		crate::services::checks::CheckError,
		crate::models::ConfigError,
		crate::models::SecurityError
	);
	None
}

/// Cuts gateway HTML pages (explorers and RPC proxies return them on 5xx) off a message.
fn strip_html(message: &str) -> &str {
	let is_html = ["<html", "<head", "<body", "<!DOCTYPE"]
		.iter()
		.any(|tag| message.contains(tag));
	match message.find('<') {
		Some(pos) if is_html => message[..pos].trim(),
		_ => message,
	}
}

fn format_error_chain(err: &dyn std::error::Error) -> String {
	let mut chain = strip_html(&err.to_string()).to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		chain.push_str("\n\tCaused by: ");
		chain.push_str(strip_html(&cause.to_string()));
		source = cause.source();
	}
	chain
}

fn log_error(error: &ErrorContext) {
	let message = error.format_with_metadata();
	match &error.source {
		Some(source) => tracing::error!(
			message = %message,
			trace_id = %error.trace_id,
			timestamp = %error.timestamp,
			error.chain = %format_error_chain(source.as_ref()),
			"Error occurred"
		),
		None => tracing::error!(
			message = %message,
			trace_id = %error.trace_id,
			timestamp = %error.timestamp,
			"Error occurred"
		),
	}
}
