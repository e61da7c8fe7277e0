use serde::{Deserialize, Serialize};

use crate::models::SecretValue;

fn default_decimals() -> u32 {
	18
}

/// Connection details and protocol addresses for one monitored chain.
///
/// Immutable for the lifetime of the process once the configuration is loaded.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
	/// Chain name used in records and as the cache key ("bsc", "polygon", ...)
	pub name: String,

	/// pNetwork v3 chain identifier, a 4-byte hex string such as `0x5aca268b`
	pub chain_id: String,

	/// RPC endpoints; the highest weight is tried first and the others are fallbacks
	pub rpc_urls: Vec<RpcUrl>,

	/// Decimals of the native currency
	#[serde(default = "default_decimals")]
	pub decimals: u32,

	/// Address of the pNetwork factory contract on this chain
	pub factory_address: String,

	/// Block explorer used for block-by-timestamp and price lookups
	pub explorer: ExplorerEndpoint,

	/// Symbol used for the explorer `{symbol}price` action (e.g. "bnb", "matic", "eth")
	#[serde(default)]
	pub price_symbol: Option<String>,
}

/// RPC endpoint configuration with load balancing weight
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RpcUrl {
	/// Type of RPC endpoint (e.g. "rpc")
	pub type_: String,

	/// URL of the RPC endpoint (can be a secret value)
	pub url: SecretValue,

	/// Weight for endpoint ordering (0-100); zero disables the endpoint
	pub weight: u32,
}

/// Etherscan-compatible explorer API
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExplorerEndpoint {
	/// Base URL, e.g. `http://api.bscscan.com`
	pub url: String,

	/// API key appended to every call
	pub api_key: SecretValue,
}

impl ChainConfig {
	/// RPC URLs usable for requests, ordered by descending weight.
	pub fn active_rpc_urls(&self) -> Vec<&RpcUrl> {
		let mut urls: Vec<&RpcUrl> = self
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.collect();
		urls.sort_by(|a, b| b.weight.cmp(&a.weight));
		urls
	}
}
