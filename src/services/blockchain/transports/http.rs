//! JSON-RPC over HTTP transport.
//!
//! Picks the highest-weighted endpoint that answers a probe request and keeps the
//! remaining endpoints as fallbacks for the [`EndpointManager`].

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::{
	models::ChainConfig,
	services::blockchain::transports::{
		BlockchainTransport, EndpointManager, RotatingTransport, TransientErrorRetryStrategy,
		TransportError,
	},
	utils::http::{create_base_http_client, create_retryable_http_client, RetryConfig},
};

/// Per-request timeout for RPC calls
const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for one chain's JSON-RPC endpoints
///
/// Cloning is cheap and clones share the endpoint state.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	pub client: ClientWithMiddleware,
	endpoint_manager: EndpointManager,
	/// Probe request body sent when testing an endpoint
	probe: Value,
}

fn default_probe() -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": 1,
		"method": "eth_chainId",
		"params": []
	})
}

impl HttpTransportClient {
	/// Connects to the first reachable endpoint of `chain`, highest weight first.
	///
	/// # Arguments
	/// * `chain` - Chain whose `rpc` endpoints are probed
	/// * `retry_config` - Retry policy for every request sent through this transport
	/// * `probe_payload` - Optional JSON body used to probe endpoints (default `eth_chainId`)
	pub async fn new(
		chain: &ChainConfig,
		retry_config: &RetryConfig,
		probe_payload: Option<String>,
	) -> Result<Self, anyhow::Error> {
		let probe = match probe_payload {
			Some(payload) => {
				serde_json::from_str(&payload).context("Failed to parse probe payload as JSON")?
			}
			None => default_probe(),
		};

		let client = create_retryable_http_client(
			retry_config,
			create_base_http_client(Some(RPC_REQUEST_TIMEOUT))?,
			Some(TransientErrorRetryStrategy),
		);

		let rpc_urls: Vec<String> = chain
			.active_rpc_urls()
			.into_iter()
			.map(|rpc_url| rpc_url.url.as_str().to_string())
			.collect();

		for url in &rpc_urls {
			if Url::parse(url).is_err() {
				tracing::warn!(chain = %chain.name, "skipping malformed RPC URL");
				continue;
			}
			if probe_endpoint(&client, url, &probe).await.is_err() {
				continue;
			}

			let fallback_urls = rpc_urls.iter().filter(|u| *u != url).cloned().collect();
			return Ok(Self {
				endpoint_manager: EndpointManager::new(client.clone(), url, fallback_urls),
				client,
				probe,
			});
		}

		Err(anyhow::anyhow!(
			"All RPC URLs failed to connect for chain {}",
			chain.name
		))
	}
}

async fn probe_endpoint(
	client: &ClientWithMiddleware,
	url: &str,
	probe: &Value,
) -> Result<(), anyhow::Error> {
	let response = client
		.post(url)
		.json(probe)
		.send()
		.await
		.with_context(|| format!("Failed to connect to {}", url))?;

	if !response.status().is_success() {
		return Err(anyhow::anyhow!(
			"Failed to connect to {}: {}",
			url,
			response.status().as_u16()
		));
	}
	Ok(())
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		probe_endpoint(&self.client, url, &self.probe).await
	}

	/// Points the endpoint manager at `url`, without a trailing slash.
	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		let parsed_url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		let mut active_url = self.endpoint_manager.active_url.write().await;
		*active_url = parsed_url.as_str().trim_end_matches('/').to_string();
		Ok(())
	}
}
