//! Client pool for chain clients.
//!
//! Clients are created on first use per chain name and cached for the rest of the
//! run. Lookups take a read lock; creation re-checks under the write lock so two
//! concurrent callers never connect twice.

use anyhow::Context;
use async_trait::async_trait;
use std::{future::Future, sync::Arc};

use crate::{
	models::ChainConfig,
	services::blockchain::{BlockChainClient, EvmClient, EvmClientTrait, HttpTransportClient},
	utils::{client_storage::ClientStorage, RetryConfig},
};

/// Trait for the client pool.
#[async_trait]
pub trait ClientPoolTrait: Send + Sync {
	type Client: EvmClientTrait + BlockChainClient + 'static;

	async fn get_client(&self, chain: &ChainConfig) -> Result<Arc<Self::Client>, anyhow::Error>;
}

/// Pool of EVM clients indexed by chain name
pub struct ClientPool {
	storage: ClientStorage<EvmClient<HttpTransportClient>>,
	retry_config: RetryConfig,
}

impl ClientPool {
	pub fn new(retry_config: RetryConfig) -> Self {
		Self {
			storage: ClientStorage::new(),
			retry_config,
		}
	}

	/// Double-checked get-or-create over the storage.
	async fn get_or_create_client<T, F, Fut>(
		storage: &ClientStorage<T>,
		chain: &ChainConfig,
		create_fn: F,
	) -> Result<Arc<T>, anyhow::Error>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, anyhow::Error>>,
	{
		if let Some(client) = storage.get(&chain.name).await {
			return Ok(client);
		}

		let mut clients = storage.clients.write().await;
		if let Some(client) = clients.get(&chain.name) {
			return Ok(client.clone());
		}
		let client = Arc::new(create_fn().await?);
		clients.insert(chain.name.clone(), client.clone());
		Ok(client)
	}

	/// Number of chains with a connected client
	pub async fn get_client_count(&self) -> usize {
		self.storage.len().await
	}
}

#[async_trait]
impl ClientPoolTrait for ClientPool {
	type Client = EvmClient<HttpTransportClient>;

	async fn get_client(&self, chain: &ChainConfig) -> Result<Arc<Self::Client>, anyhow::Error> {
		Self::get_or_create_client(&self.storage, chain, || {
			EvmClient::new(chain, &self.retry_config)
		})
		.await
		.with_context(|| format!("Failed to get or create client for {}", chain.name))
	}
}

impl Default for ClientPool {
	fn default() -> Self {
		Self::new(RetryConfig::default())
	}
}
