//! Test helper utilities for chain configuration
//!
//! - `ChainConfigBuilder`: Builder for creating test ChainConfig instances

use crate::models::{ChainConfig, ExplorerEndpoint, RpcUrl, SecretValue};

/// Builder for creating test ChainConfig instances
pub struct ChainConfigBuilder {
	name: String,
	chain_id: String,
	rpc_urls: Vec<RpcUrl>,
	decimals: u32,
	factory_address: String,
	explorer: ExplorerEndpoint,
	price_symbol: Option<String>,
}

impl Default for ChainConfigBuilder {
	fn default() -> Self {
		Self {
			name: "test_chain".to_string(),
			chain_id: "0xf9b459a1".to_string(),
			rpc_urls: vec![RpcUrl {
				type_: "rpc".to_string(),
				url: SecretValue::plain("https://test.rpc"),
				weight: 50,
			}],
			decimals: 18,
			factory_address: "0x4650787da4A497496e514EcCFd6F888B7804ebBe".to_string(),
			explorer: ExplorerEndpoint {
				url: "http://api.test-explorer.io".to_string(),
				api_key: SecretValue::plain("test-api-key"),
			},
			price_symbol: None,
		}
	}
}

impl ChainConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn chain_id(mut self, chain_id: &str) -> Self {
		self.chain_id = chain_id.to_string();
		self
	}

	/// Replaces every endpoint with a single `rpc` URL.
	pub fn rpc_url(mut self, url: &str) -> Self {
		self.rpc_urls = vec![RpcUrl {
			type_: "rpc".to_string(),
			url: SecretValue::plain(url),
			weight: 100,
		}];
		self
	}

	pub fn add_rpc_url(mut self, url: &str, type_: &str, weight: u32) -> Self {
		self.rpc_urls.push(RpcUrl {
			type_: type_.to_string(),
			url: SecretValue::plain(url),
			weight,
		});
		self
	}

	pub fn add_rpc_url_secret(mut self, url: SecretValue, type_: &str, weight: u32) -> Self {
		self.rpc_urls.push(RpcUrl {
			type_: type_.to_string(),
			url,
			weight,
		});
		self
	}

	pub fn clear_rpc_urls(mut self) -> Self {
		self.rpc_urls.clear();
		self
	}

	pub fn decimals(mut self, decimals: u32) -> Self {
		self.decimals = decimals;
		self
	}

	pub fn factory_address(mut self, address: &str) -> Self {
		self.factory_address = address.to_string();
		self
	}

	pub fn explorer(mut self, url: &str, api_key: SecretValue) -> Self {
		self.explorer = ExplorerEndpoint {
			url: url.to_string(),
			api_key,
		};
		self
	}

	pub fn price_symbol(mut self, symbol: &str) -> Self {
		self.price_symbol = Some(symbol.to_string());
		self
	}

	pub fn build(self) -> ChainConfig {
		ChainConfig {
			name: self.name,
			chain_id: self.chain_id,
			rpc_urls: self.rpc_urls,
			decimals: self.decimals,
			factory_address: self.factory_address,
			explorer: self.explorer,
			price_symbol: self.price_symbol,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_chain() {
		let chain = ChainConfigBuilder::new().build();

		assert_eq!(chain.name, "test_chain");
		assert_eq!(chain.chain_id, "0xf9b459a1");
		assert_eq!(chain.rpc_urls.len(), 1);
		assert_eq!(chain.rpc_urls[0].url.as_str(), "https://test.rpc");
		assert_eq!(chain.decimals, 18);
		assert_eq!(chain.explorer.api_key.as_str(), "test-api-key");
	}

	#[test]
	fn test_rpc_url_replaces_endpoints() {
		let chain = ChainConfigBuilder::new()
			.add_rpc_url("https://fallback.rpc", "rpc", 10)
			.rpc_url("https://only.rpc")
			.build();

		assert_eq!(chain.rpc_urls.len(), 1);
		assert_eq!(chain.rpc_urls[0].url.as_str(), "https://only.rpc");
		assert_eq!(chain.rpc_urls[0].weight, 100);
	}

	#[test]
	fn test_clear_rpc_urls() {
		let chain = ChainConfigBuilder::new().clear_rpc_urls().build();
		assert!(chain.active_rpc_urls().is_empty());
	}
}
