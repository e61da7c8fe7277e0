//! Mock implementations of chain clients.
//!
//! - [`MockEvmClientTrait`] - Mock implementation of the EVM chain client
//! - [`MockClientPool`] - Mock implementation of the client pool
//!
//! These mocks allow testing chain-related functionality without actual
//! network connections.

use std::sync::Arc;

use alloy::primitives::{Bytes, U256};
use async_trait::async_trait;
use mockall::mock;

use pnetwork_monitor::{
	models::{ChainConfig, LogEntry},
	services::blockchain::{BlockChainClient, ClientPoolTrait, EvmClientTrait},
};

mock! {
	/// Mock implementation of the EVM client traits.
	pub EvmClientTrait {}

	#[async_trait]
	impl BlockChainClient for EvmClientTrait {
		async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;
		async fn get_block_timestamp(&self, block_number: u64) -> Result<u64, anyhow::Error>;
	}

	#[async_trait]
	impl EvmClientTrait for EvmClientTrait {
		async fn get_logs(
			&self,
			address: &str,
			topics: Vec<String>,
			from_block: u64,
			to_block: u64,
		) -> Result<Vec<LogEntry>, anyhow::Error>;
		async fn get_balance(&self, address: &str) -> Result<U256, anyhow::Error>;
		async fn call(&self, to: &str, data: Bytes) -> Result<Bytes, anyhow::Error>;
	}

	impl Clone for EvmClientTrait {
		fn clone(&self) -> Self;
	}
}

mock! {
	#[derive(Debug)]
	pub ClientPool {}

	#[async_trait]
	impl ClientPoolTrait for ClientPool {
		type Client = MockEvmClientTrait;
		async fn get_client(&self, chain: &ChainConfig) -> Result<Arc<MockEvmClientTrait>, anyhow::Error>;
	}
}

/// Pool handing out `client` for every chain
pub fn pool_with(client: MockEvmClientTrait) -> MockClientPool {
	let client = Arc::new(client);
	let mut pool = MockClientPool::new();
	pool.expect_get_client()
		.returning(move |_| Ok(client.clone()));
	pool
}
