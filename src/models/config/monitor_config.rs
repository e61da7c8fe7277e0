//! Monitor configuration loading and validation.
//!
//! Implements the ConfigLoader trait for [`MonitorConfig`]. Validation walks the whole
//! document and reports every problem in one error instead of stopping at the first.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use std::{collections::HashMap, collections::HashSet, path::Path, str::FromStr};

use crate::models::{config::error::ConfigError, ConfigLoader, MonitorConfig, SecretValue};

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

fn is_chain_id(value: &str) -> bool {
	value.len() == 10
		&& value.starts_with("0x")
		&& value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

impl MonitorConfig {
	/// Lists every missing or malformed value.
	fn problems(&self) -> Vec<String> {
		let mut problems = Vec::new();

		if self.chains.is_empty() {
			problems.push("at least one chain is required".to_string());
		}

		let mut seen = HashSet::new();
		for (index, chain) in self.chains.iter().enumerate() {
			let label = if chain.name.trim().is_empty() {
				problems.push(format!("chains[{}].name is missing", index));
				format!("chains[{}]", index)
			} else {
				chain.name.clone()
			};

			if !chain.name.is_empty() && !seen.insert(chain.name.to_lowercase()) {
				problems.push(format!("duplicate chain name '{}'", chain.name));
			}
			if !is_chain_id(&chain.chain_id) {
				problems.push(format!(
					"{}.chain_id '{}' is not a 4-byte hex identifier",
					label, chain.chain_id
				));
			}
			if chain.active_rpc_urls().is_empty() {
				problems.push(format!("{}.rpc_urls has no active 'rpc' endpoint", label));
			}
			for rpc_url in &chain.rpc_urls {
				if rpc_url.url.is_empty() {
					problems.push(format!("{}.rpc_urls contains an empty url", label));
				}
			}
			if Address::from_str(&chain.factory_address).is_err() {
				problems.push(format!(
					"{}.factory_address '{}' is not an address",
					label, chain.factory_address
				));
			}
			if chain.explorer.url.trim().is_empty() {
				problems.push(format!("{}.explorer.url is missing", label));
			} else if url::Url::parse(&chain.explorer.url).is_err() {
				problems.push(format!("{}.explorer.url is not a valid URL", label));
			}
			if chain.explorer.api_key.is_empty() {
				problems.push(format!("{}.explorer.api_key is missing", label));
			}
		}

		if !self.chains.is_empty() && self.chain(&self.dao_chain).is_none() {
			problems.push(format!(
				"dao_chain '{}' is not one of the configured chains",
				self.dao_chain
			));
		}
		for relayer in &self.relayers {
			if Address::from_str(relayer).is_err() {
				problems.push(format!("relayer '{}' is not an address", relayer));
			}
		}

		if self.scanner.max_block_range == 0 {
			problems.push("scanner.max_block_range must be greater than zero".to_string());
		}
		if self.blocks_per_day.sample_count < 2 {
			problems.push("blocks_per_day.sample_count must be at least 2".to_string());
		}
		if self.blocks_per_day.sample_step == 0 {
			problems.push("blocks_per_day.sample_step must be greater than zero".to_string());
		}
		if self.blocks_per_day.path.as_os_str().is_empty() {
			problems.push("blocks_per_day.path is missing".to_string());
		}

		let topics = [
			("operation_queued", Some(&self.topics.operation_queued)),
			("operation_cancelled", Some(&self.topics.operation_cancelled)),
			("actors_propagated", Some(&self.topics.actors_propagated)),
			("actor_slashed", self.topics.actor_slashed.as_ref()),
		];
		for (name, topic) in topics {
			if let Some(topic) = topic {
				if B256::from_str(topic).is_err() {
					problems.push(format!("topics.{} is not a 32-byte hex value", name));
				}
			}
		}

		if self.pubsub.host.trim().is_empty() {
			problems.push("pubsub.host is missing".to_string());
		}
		if self.pubsub.topic.trim().is_empty() {
			problems.push("pubsub.topic is missing".to_string());
		}

		problems
	}
}

#[async_trait]
impl ConfigLoader for MonitorConfig {
	/// Load the monitor configuration from a JSON file
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"monitor config must be a .json file",
				None,
				path_metadata(path),
			));
		}

		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::file_error(
				format!("failed to read monitor config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let config: MonitorConfig = serde_json::from_str(&content).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse monitor config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		// Missing values are reported before secrets so a bare file lists everything at once
		config.validate()?;
		config.resolve_secrets().await
	}

	/// Validate the monitor configuration
	fn validate(&self) -> Result<(), ConfigError> {
		let problems = self.problems();
		if problems.is_empty() {
			return Ok(());
		}
		Err(ConfigError::validation_error(
			format!("invalid monitor config: {}", problems.join("; ")),
			None,
			Some(HashMap::from([(
				"problems".to_string(),
				problems.len().to_string(),
			)])),
		))
	}

	/// Replace every environment reference with its value
	///
	/// All unset variables are reported together.
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let mut config = self.clone();
		let mut missing = Vec::new();

		for chain in &mut config.chains {
			for rpc_url in &mut chain.rpc_urls {
				match rpc_url.url.resolve() {
					Ok(resolved) => rpc_url.url = SecretValue::Plain(resolved),
					Err(_) => missing.push(format!("{}: rpc url {}", chain.name, rpc_url.url)),
				}
			}
			match chain.explorer.api_key.resolve() {
				Ok(resolved) => chain.explorer.api_key = SecretValue::Plain(resolved),
				Err(_) => missing.push(format!(
					"{}: explorer api key {}",
					chain.name, chain.explorer.api_key
				)),
			}
		}

		if !missing.is_empty() {
			return Err(ConfigError::secret_error(
				format!("unresolved secrets: {}", missing.join("; ")),
				None,
				None,
			));
		}
		Ok(config)
	}
}
