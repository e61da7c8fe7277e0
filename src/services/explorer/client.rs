//! Etherscan-compatible explorer client.
//!
//! Two endpoints are used: `module=block&action=getblocknobytime` to turn a timestamp
//! into a block number, and `module=stats&action={symbol}price` for the native
//! currency's USD price.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::{collections::HashMap, str::FromStr, sync::Arc};
use tracing::instrument;
use url::Url;

use crate::{models::ChainConfig, services::explorer::ExplorerError};

/// Lookups served by a block explorer
#[async_trait]
pub trait ExplorerClientTrait: Send + Sync {
	/// Last block mined at or before `timestamp` (unix seconds)
	async fn block_by_timestamp(
		&self,
		chain: &ChainConfig,
		timestamp: i64,
	) -> Result<u64, ExplorerError>;

	/// USD price of the chain's native currency
	async fn native_price_usd(&self, chain: &ChainConfig) -> Result<Decimal, ExplorerError>;
}

/// Standard explorer envelope
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
	status: String,
	#[serde(default)]
	message: String,
	result: Value,
}

/// HTTP explorer client shared by every chain
#[derive(Clone, Debug)]
pub struct ExplorerClient {
	client: Arc<ClientWithMiddleware>,
}

fn chain_metadata(chain: &ChainConfig) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("chain".to_string(), chain.name.clone())]))
}

impl ExplorerClient {
	pub fn new(client: Arc<ClientWithMiddleware>) -> Self {
		Self { client }
	}

	fn api_url(chain: &ChainConfig, params: &[(&str, &str)]) -> Result<Url, ExplorerError> {
		let base = chain.explorer.url.trim_end_matches('/');
		let mut url = Url::parse(&format!("{}/api", base)).map_err(|e| {
			ExplorerError::request_error(
				format!("invalid explorer URL '{}'", chain.explorer.url),
				Some(Box::new(e)),
				chain_metadata(chain),
			)
		})?;
		url.query_pairs_mut()
			.extend_pairs(params)
			.append_pair("apikey", chain.explorer.api_key.as_str());
		Ok(url)
	}

	async fn get(&self, chain: &ChainConfig, url: Url) -> Result<Value, ExplorerError> {
		let response = self.client.get(url).send().await.map_err(|e| {
			ExplorerError::request_error(
				"explorer request failed",
				Some(Box::new(e)),
				chain_metadata(chain),
			)
		})?;

		let status = response.status();
		if !status.is_success() {
			return Err(ExplorerError::request_error(
				format!("explorer answered with status {}", status),
				None,
				chain_metadata(chain),
			));
		}

		let body: ExplorerResponse = response.json().await.map_err(|e| {
			ExplorerError::decode_error(
				"explorer response is not a JSON envelope",
				Some(Box::new(e)),
				chain_metadata(chain),
			)
		})?;

		if body.status != "1" {
			let detail = body.result.as_str().unwrap_or_default();
			return Err(ExplorerError::rejected_error(
				format!("{}: {}", body.message, detail),
				None,
				chain_metadata(chain),
			));
		}
		Ok(body.result)
	}
}

/// Picks the `<symbol>usd` entry of a price result such as `{"ethbtc": .., "ethusd": ..}`.
fn usd_price(result: &Value) -> Option<Decimal> {
	let (_, value) = result
		.as_object()?
		.iter()
		.find(|(key, _)| key.ends_with("usd"))?;
	match value {
		Value::String(text) => Decimal::from_str(text).ok(),
		Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
		_ => None,
	}
}

#[async_trait]
impl ExplorerClientTrait for ExplorerClient {
	#[instrument(skip(self, chain), fields(chain = %chain.name))]
	async fn block_by_timestamp(
		&self,
		chain: &ChainConfig,
		timestamp: i64,
	) -> Result<u64, ExplorerError> {
		let timestamp = timestamp.to_string();
		let url = Self::api_url(
			chain,
			&[
				("module", "block"),
				("action", "getblocknobytime"),
				("timestamp", &timestamp),
				("closest", "before"),
			],
		)?;

		let result = self.get(chain, url).await?;
		result
			.as_str()
			.and_then(|text| text.trim().parse::<u64>().ok())
			.ok_or_else(|| {
				ExplorerError::decode_error(
					format!("'{}' is not a block number", result),
					None,
					chain_metadata(chain),
				)
			})
	}

	#[instrument(skip(self, chain), fields(chain = %chain.name))]
	async fn native_price_usd(&self, chain: &ChainConfig) -> Result<Decimal, ExplorerError> {
		let symbol = chain.price_symbol.as_deref().ok_or_else(|| {
			ExplorerError::request_error(
				"no price_symbol configured",
				None,
				chain_metadata(chain),
			)
		})?;
		let action = format!("{}price", symbol.to_lowercase());
		let url = Self::api_url(chain, &[("module", "stats"), ("action", &action)])?;

		let result = self.get(chain, url).await?;
		usd_price(&result).ok_or_else(|| {
			ExplorerError::decode_error(
				format!("no USD price in {}", result),
				None,
				chain_metadata(chain),
			)
		})
	}
}
