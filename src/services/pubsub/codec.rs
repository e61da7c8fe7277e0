//! Envelope and multibase decoding for the IPFS pub/sub stream.

use base64::{
	engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
	Engine,
};

use crate::{
	models::{PubSubEnvelope, PubSubMessage},
	services::pubsub::PubSubError,
};

/// Multibase form of a topic name as expected by the `pubsub/sub` endpoint.
pub fn encode_topic(topic: &str) -> String {
	format!("u{}", URL_SAFE_NO_PAD.encode(topic.as_bytes()))
}

/// Decodes a multibase string.
///
/// Supported prefixes: `u`/`U` (base64url without/with padding), `m`/`M` (base64
/// without/with padding) and `f`/`F` (hex).
pub fn decode_multibase(value: &str) -> Result<Vec<u8>, PubSubError> {
	let mut chars = value.chars();
	let prefix = chars.next().ok_or_else(|| {
		PubSubError::decode_error("empty multibase value", None, None)
	})?;
	let body = chars.as_str();

	let decoded = match prefix {
		'u' => URL_SAFE_NO_PAD.decode(body),
		'U' => URL_SAFE.decode(body),
		'm' => STANDARD_NO_PAD.decode(body),
		'M' => STANDARD.decode(body),
		'f' | 'F' => {
			return hex::decode(body).map_err(|e| {
				PubSubError::decode_error("invalid hex multibase value", Some(Box::new(e)), None)
			})
		}
		other => {
			return Err(PubSubError::decode_error(
				format!("unsupported multibase prefix '{}'", other),
				None,
				None,
			))
		}
	};
	decoded.map_err(|e| {
		PubSubError::decode_error("invalid base64 multibase value", Some(Box::new(e)), None)
	})
}

/// Parses one stream line into the message handed to callbacks.
pub fn decode_envelope(line: &[u8]) -> Result<PubSubMessage, PubSubError> {
	let envelope: PubSubEnvelope = serde_json::from_slice(line).map_err(|e| {
		PubSubError::decode_error("malformed pub/sub envelope", Some(Box::new(e)), None)
	})?;
	Ok(PubSubMessage {
		payload: decode_multibase(&envelope.data)?,
		sender: envelope.from,
	})
}
