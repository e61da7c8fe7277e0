use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::logging::error::ErrorKind;

/// One structured record emitted by a check.
///
/// Serialized flat: `{"title", "timestamp", "chain"?, <fields...>}` on success and
/// `{"title", "timestamp", "chain"?, "error", "error_kind"}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
	pub title: String,
	/// Unix seconds at which the record was produced
	pub timestamp: i64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub chain: Option<String>,
	#[serde(flatten)]
	pub body: ObservationBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObservationBody {
	Fields(Map<String, Value>),
	Error { error: String, error_kind: ErrorKind },
}

impl Observation {
	/// Success record. Non-object `fields` are stored under a `value` key.
	pub fn success(title: &str, chain: Option<&str>, fields: Value) -> Self {
		let fields = match fields {
			Value::Object(map) => map,
			other => Map::from_iter([("value".to_string(), other)]),
		};
		Self {
			title: title.to_string(),
			timestamp: Utc::now().timestamp(),
			chain: chain.map(str::to_string),
			body: ObservationBody::Fields(fields),
		}
	}

	/// Error-shaped record.
	pub fn failure(
		title: &str,
		chain: Option<&str>,
		error: &impl fmt::Display,
		error_kind: ErrorKind,
	) -> Self {
		Self {
			title: title.to_string(),
			timestamp: Utc::now().timestamp(),
			chain: chain.map(str::to_string),
			body: ObservationBody::Error {
				error: error.to_string(),
				error_kind,
			},
		}
	}

	pub fn is_error(&self) -> bool {
		matches!(self.body, ObservationBody::Error { .. })
	}

	/// Looks up a success field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		match &self.body {
			ObservationBody::Fields(fields) => fields.get(name),
			ObservationBody::Error { .. } => None,
		}
	}

	pub fn to_json(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}
