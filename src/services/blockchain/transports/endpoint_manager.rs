//! Active/fallback RPC endpoint handling.
//!
//! Requests go to the active URL. A rate-limit status or a network failure promotes the
//! first reachable fallback and the request is replayed there.

use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::transports::{
	rotates_on, rpc_request, RotatingTransport, TransportError,
};

/// Active URL plus ordered fallbacks for one chain
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	/// Serializes rotations so concurrent failures rotate once
	rotation_lock: Arc<Mutex<()>>,
}

/// What happened to one attempt on one URL
#[derive(Debug)]
enum Attempt {
	Response(reqwest::Response),
	Network(reqwest_middleware::Error),
}

impl EndpointManager {
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			client,
			rotation_lock: Arc::new(Mutex::new(())),
		}
	}

	/// Promotes the first fallback that accepts a connection.
	///
	/// The previously active URL moves to the end of the fallback list.
	pub async fn try_rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<String, TransportError> {
		let _guard = self.rotation_lock.lock().await;
		let current = self.active_url.read().await.clone();
		let fallbacks = self.fallback_urls.read().await.clone();

		let Some(candidate) = fallbacks.iter().find(|url| **url != current).cloned() else {
			return Err(TransportError::url_rotation(
				format!("no fallback URL available for '{}'", current),
				None,
				Some(HashMap::from([(
					"fallbacks".to_string(),
					fallbacks.len().to_string(),
				)])),
			));
		};

		tracing::debug!(from = %current, to = %candidate, "rotating RPC endpoint");

		transport.try_connect(&candidate).await.map_err(|e| {
			TransportError::url_rotation(
				format!("failed to connect to '{}'", candidate),
				Some(e.into()),
				None,
			)
		})?;
		transport.update_client(&candidate).await.map_err(|e| {
			TransportError::url_rotation(
				format!("failed to switch transport to '{}'", candidate),
				Some(e.into()),
				None,
			)
		})?;

		let mut active = self.active_url.write().await;
		let mut fallback_urls = self.fallback_urls.write().await;
		fallback_urls.retain(|url| *url != candidate);
		fallback_urls.push(current);
		*active = candidate.clone();

		Ok(candidate)
	}

	async fn attempt<P>(
		&self,
		url: &str,
		method: &str,
		params: Option<P>,
	) -> Result<Attempt, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let body = rpc_request(method, params);
		let body = serde_json::to_string(&body).map_err(|e| {
			TransportError::request_serialization(
				format!("failed to serialize {} request", method),
				Some(Box::new(e)),
				None,
			)
		})?;

		match self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.body(body)
			.send()
			.await
		{
			Ok(response) => Ok(Attempt::Response(response)),
			Err(e) => Ok(Attempt::Network(e)),
		}
	}

	/// Moves on from a failed endpoint unless every endpoint already failed this request.
	async fn rotate_after_failure<T: RotatingTransport>(
		&self,
		transport: &T,
		failures: &mut usize,
		endpoints: usize,
	) -> Result<String, TransportError> {
		*failures += 1;
		if *failures >= endpoints {
			return Err(TransportError::url_rotation(
				format!("all {} RPC endpoints failed", endpoints),
				None,
				None,
			));
		}
		self.try_rotate_url(transport).await
	}

	/// Sends a JSON-RPC request, rotating endpoints on rate limits and network failures.
	///
	/// Each endpoint is tried at most once per request. A response carrying a JSON-RPC
	/// `error` object is returned as [`TransportError::Rpc`].
	pub async fn send_raw_request<T, P>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	{
		let endpoints = 1 + self.fallback_urls.read().await.len();
		let mut failures = 0;

		loop {
			let url = self.active_url.read().await.clone();

			match self.attempt(&url, method, params.clone()).await? {
				Attempt::Response(response) if response.status().is_success() => {
					let body: Value = response.json().await.map_err(|e| {
						TransportError::response_parse(
							format!("invalid {} response", method),
							Some(Box::new(e)),
							Some(HashMap::from([("url".to_string(), url.clone())])),
						)
					})?;
					return check_rpc_error(method, body);
				}
				Attempt::Response(response) => {
					let status = response.status();
					let body = response.text().await.unwrap_or_default();
					tracing::warn!(%url, %status, method, "RPC request failed");

					if !rotates_on(status) {
						return Err(TransportError::http(status, url, body, None, None));
					}
					if let Err(rotation_error) = self
						.rotate_after_failure(transport, &mut failures, endpoints)
						.await
					{
						return Err(TransportError::http(
							status,
							url,
							body,
							Some(Box::new(rotation_error)),
							None,
						));
					}
				}
				Attempt::Network(error) => {
					tracing::warn!(%url, method, error = %error, "RPC endpoint unreachable");
					if let Err(rotation_error) = self
						.rotate_after_failure(transport, &mut failures, endpoints)
						.await
					{
						return Err(TransportError::network(
							error.to_string(),
							Some(Box::new(rotation_error)),
							Some(HashMap::from([("url".to_string(), url)])),
						));
					}
				}
			}
		}
	}
}

fn check_rpc_error(method: &str, body: Value) -> Result<Value, TransportError> {
	let Some(error) = body.get("error").filter(|e| !e.is_null()) else {
		return Ok(body);
	};
	let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
	let message = error
		.get("message")
		.and_then(Value::as_str)
		.unwrap_or("unknown RPC error");
	Err(TransportError::rpc(
		code,
		message,
		Some(HashMap::from([(
			"method".to_string(),
			method.to_string(),
		)])),
	))
}
