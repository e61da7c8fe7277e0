//! Core chain client interface.
//!
//! Block-level reads every monitored chain supports. Contract-level reads live on
//! [`EvmClientTrait`](crate::services::blockchain::EvmClientTrait).

use async_trait::async_trait;

/// Defines the core interface for chain clients
#[async_trait]
pub trait BlockChainClient: Send + Sync + Clone {
	/// Retrieves the latest block number from the chain
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;

	/// Retrieves the timestamp (unix seconds) of a block
	///
	/// # Arguments
	/// * `block_number` - The block to look up
	///
	/// # Errors
	/// Fails when the block is unknown to the node or the answer cannot be decoded.
	async fn get_block_timestamp(&self, block_number: u64) -> Result<u64, anyhow::Error>;
}
