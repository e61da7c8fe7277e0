//! Shared services handed to every check.

use alloy::primitives::Address;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{ChainConfig, MonitorConfig, Observation},
	services::{
		blockchain::{calls, ClientPoolTrait, ContractCall, ContractReader},
		checks::{CheckError, CheckId, ObservationSink},
		explorer::ExplorerClientTrait,
		scanner::LogScannerTrait,
	},
	utils::logging::error::ErrorKind,
};

pub fn chain_metadata(chain: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("chain".to_string(), chain.to_string())]))
}

pub struct MonitorContext<P: ClientPoolTrait> {
	pub config: Arc<MonitorConfig>,
	pub pool: Arc<P>,
	pub scanner: Arc<dyn LogScannerTrait>,
	pub explorer: Arc<dyn ExplorerClientTrait>,
	pub sink: Arc<dyn ObservationSink>,
}

impl<P: ClientPoolTrait> MonitorContext<P> {
	pub fn new(
		config: Arc<MonitorConfig>,
		pool: Arc<P>,
		scanner: Arc<dyn LogScannerTrait>,
		explorer: Arc<dyn ExplorerClientTrait>,
		sink: Arc<dyn ObservationSink>,
	) -> Self {
		Self {
			config,
			pool,
			scanner,
			explorer,
			sink,
		}
	}

	pub fn chains(&self) -> &[ChainConfig] {
		&self.config.chains
	}

	pub fn emit_success(&self, id: CheckId, chain: Option<&str>, fields: Value) {
		self.sink.emit(Observation::success(id.title(), chain, fields));
	}

	pub fn emit_failure(&self, id: CheckId, chain: Option<&str>, error: &CheckError) {
		self.sink
			.emit(Observation::failure(id.title(), chain, error, error.kind()));
	}

	pub async fn client(&self, chain: &ChainConfig) -> Result<Arc<P::Client>, CheckError> {
		self.pool.get_client(chain).await.map_err(|e| {
			CheckError::from_client("no client for chain", e, chain_metadata(&chain.name))
		})
	}

	/// The chain hosting the DAO contracts
	pub fn dao_chain(&self) -> Result<&ChainConfig, CheckError> {
		self.config.chain(&self.config.dao_chain).ok_or_else(|| {
			CheckError::config_error(
				format!("dao chain '{}' is not configured", self.config.dao_chain),
				None,
				None,
			)
		})
	}

	/// Resolves the hub through the chain's factory contract
	pub async fn hub_address(&self, chain: &ChainConfig) -> Result<Address, CheckError> {
		let client = self.client(chain).await?;
		ContractReader::new(client.as_ref())
			.read_address(&chain.factory_address, &calls::HUB)
			.await
			.map_err(|e| {
				CheckError::from_client(
					format!("failed to resolve hub from factory {}", chain.factory_address),
					e,
					chain_metadata(&chain.name),
				)
			})
	}

	/// Reads an address-returning view function of `contract`
	pub async fn read_address(
		&self,
		chain: &ChainConfig,
		contract: Address,
		call: &ContractCall,
	) -> Result<Address, CheckError> {
		let client = self.client(chain).await?;
		ContractReader::new(client.as_ref())
			.read_address(&contract.to_string(), call)
			.await
			.map_err(|e| {
				CheckError::from_client(
					format!("{} failed on {}", call.signature, contract),
					e,
					chain_metadata(&chain.name),
				)
			})
	}
}

/// Wraps an error from another service into a [`CheckError`] with the same kind.
pub fn wrap_error<E>(kind: ErrorKind, msg: impl Into<String>, error: E, chain: &str) -> CheckError
where
	E: std::error::Error + Send + Sync + 'static,
{
	CheckError::with_kind(kind, msg, Some(Box::new(error)), chain_metadata(chain))
}
