//! Streaming transport for the IPFS HTTP pub/sub API.
//!
//! `POST /api/v0/pubsub/sub?arg=<multibase topic>` answers with a never-ending body
//! of newline-delimited JSON envelopes.

use async_trait::async_trait;
use futures::{stream::BoxStream, Stream, StreamExt};
use std::collections::HashMap;

use crate::{
	services::pubsub::{codec::encode_topic, PubSubError},
	utils::create_base_http_client,
};

/// Stream of raw envelope lines for one topic
pub type LineStream = BoxStream<'static, Result<Vec<u8>, PubSubError>>;

/// Opens subscription streams
#[async_trait]
pub trait PubSubTransport: Send + Sync {
	async fn subscribe(&self, topic: &str) -> Result<LineStream, PubSubError>;
}

/// Splits a byte stream into newline-terminated lines.
///
/// Blank lines are skipped and a trailing unterminated line is emitted when the
/// stream ends. A chunk error ends the stream after being reported.
pub fn split_lines<S, B, E>(stream: S) -> LineStream
where
	S: Stream<Item = Result<B, E>> + Send + 'static,
	B: AsRef<[u8]> + Send + 'static,
	E: std::error::Error + Send + Sync + 'static,
{
	let state = (Box::pin(stream), Vec::<u8>::new(), false);
	futures::stream::unfold(state, |(mut stream, mut buffer, mut done)| async move {
		loop {
			if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
				let line: Vec<u8> = buffer.drain(..=pos).collect();
				if line.iter().all(u8::is_ascii_whitespace) {
					continue;
				}
				return Some((Ok(trim_line(line)), (stream, buffer, done)));
			}
			if done {
				if buffer.iter().all(u8::is_ascii_whitespace) {
					return None;
				}
				let rest = std::mem::take(&mut buffer);
				return Some((Ok(trim_line(rest)), (stream, buffer, done)));
			}
			match stream.next().await {
				Some(Ok(chunk)) => buffer.extend_from_slice(chunk.as_ref()),
				Some(Err(e)) => {
					buffer.clear();
					let error = PubSubError::transport_error(
						"pub/sub stream interrupted",
						Some(Box::new(e)),
						None,
					);
					return Some((Err(error), (stream, buffer, true)));
				}
				None => done = true,
			}
		}
	})
	.boxed()
}

fn trim_line(mut line: Vec<u8>) -> Vec<u8> {
	while line.last().is_some_and(|b| b.is_ascii_whitespace()) {
		line.pop();
	}
	line
}

/// HTTP client for a local IPFS daemon
#[derive(Clone, Debug)]
pub struct IpfsPubSubTransport {
	client: reqwest::Client,
	base_url: String,
}

impl IpfsPubSubTransport {
	pub fn new(host: &str, port: u16) -> Result<Self, PubSubError> {
		// No request timeout: the subscription body never completes
		let client = create_base_http_client(None).map_err(|e| {
			PubSubError::transport_error("failed to create pub/sub HTTP client", Some(e.into()), None)
		})?;
		Ok(Self {
			client,
			base_url: format!("http://{}:{}", host, port),
		})
	}

	/// Uses `base_url` as is, e.g. a mock server address
	pub fn with_base_url(base_url: &str) -> Result<Self, PubSubError> {
		let client = create_base_http_client(None).map_err(|e| {
			PubSubError::transport_error("failed to create pub/sub HTTP client", Some(e.into()), None)
		})?;
		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	pub fn subscribe_url(&self, topic: &str) -> String {
		format!(
			"{}/api/v0/pubsub/sub?arg={}",
			self.base_url,
			urlencoding::encode(&encode_topic(topic))
		)
	}
}

#[async_trait]
impl PubSubTransport for IpfsPubSubTransport {
	async fn subscribe(&self, topic: &str) -> Result<LineStream, PubSubError> {
		let url = self.subscribe_url(topic);
		let metadata = || Some(HashMap::from([("topic".to_string(), topic.to_string())]));

		let response = self.client.post(&url).send().await.map_err(|e| {
			PubSubError::transport_error("failed to open pub/sub stream", Some(Box::new(e)), metadata())
		})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(PubSubError::transport_error(
				format!("pub/sub subscription rejected with status {}: {}", status, body),
				None,
				metadata(),
			));
		}

		tracing::debug!(%url, "pub/sub stream opened");
		Ok(split_lines(response.bytes_stream()))
	}
}
