//! JSON-RPC transport for chain clients.
//!
//! [`HttpTransportClient`] talks to one chain's endpoints and hands failover to an
//! [`EndpointManager`]. The clients only see [`BlockchainTransport`].

mod endpoint_manager;
mod error;
mod http;

pub use endpoint_manager::EndpointManager;
pub use error::TransportError;
pub use http::HttpTransportClient;

use reqwest::StatusCode;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Statuses after which the request moves to the next endpoint instead of failing.
///
/// Public RPC providers answer bursts of `eth_getLogs` pages with 429.
pub fn rotates_on(status: StatusCode) -> bool {
	status == StatusCode::TOO_MANY_REQUESTS
}

/// JSON-RPC 2.0 request body
pub fn rpc_request<P: Into<Value>>(method: &str, params: Option<P>) -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": 1,
		"method": method,
		"params": params.map(Into::into),
	})
}

#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// URL currently receiving requests
	async fn get_current_url(&self) -> String;

	/// Sends one call and returns the whole response object
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;
}

/// Transports able to move to another endpoint
#[async_trait::async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Probes `url` without switching to it
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error>;

	/// Makes `url` the active endpoint
	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error>;
}

/// Retries what `reqwest-retry` classifies as transient; 429 is left to rotation.
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(response) if rotates_on(response.status()) => None,
			Ok(response) => default_on_request_success(response),
			Err(error) => default_on_request_failure(error),
		}
	}
}
