//! EVM-compatible chain client implementation.
//!
//! Wraps a JSON-RPC transport and exposes the reads the monitor needs: head block,
//! block timestamps, event logs, native balances and read-only contract calls.

use std::{collections::HashMap, str::FromStr};

use alloy::primitives::{Bytes, U256};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
	models::{ChainConfig, LogEntry},
	services::blockchain::{
		client::BlockChainClient,
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
	utils::{parse_hex_u256, parse_hex_u64, to_hex_quantity, RetryConfig},
};

/// Client for Ethereum Virtual Machine (EVM) compatible chains
#[derive(Clone, Debug)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	http_client: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl EvmClient<HttpTransportClient> {
	/// Connects to the chain's first reachable RPC endpoint
	pub async fn new(chain: &ChainConfig, retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let transport = HttpTransportClient::new(chain, retry_config, None)
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					format!("no reachable RPC endpoint for {}", chain.name),
					Some(e.into()),
					Some(HashMap::from([("chain".to_string(), chain.name.clone())])),
				)
			})?;
		Ok(Self::new_with_transport(transport))
	}
}

/// Contract-level reads specific to EVM chains
#[async_trait]
pub trait EvmClientTrait {
	/// Retrieves logs emitted by `address` whose topics match `topics`, over an
	/// inclusive block range
	///
	/// # Arguments
	/// * `address` - Emitting contract
	/// * `topics` - Topic filter; position 0 is the event signature
	/// * `from_block` - First block, inclusive
	/// * `to_block` - Last block, inclusive
	async fn get_logs(
		&self,
		address: &str,
		topics: Vec<String>,
		from_block: u64,
		to_block: u64,
	) -> Result<Vec<LogEntry>, anyhow::Error>;

	/// Native balance of `address` at the latest block, in wei
	async fn get_balance(&self, address: &str) -> Result<U256, anyhow::Error>;

	/// Executes a read-only `eth_call` against `to` and returns the raw return data
	async fn call(&self, to: &str, data: Bytes) -> Result<Bytes, anyhow::Error>;
}

/// Extracts the `result` member of a JSON-RPC response
fn take_result(mut response: Value, method: &str) -> Result<Value, anyhow::Error> {
	response
		.get_mut("result")
		.map(Value::take)
		.ok_or_else(|| {
			BlockChainError::request_error(
				format!("missing 'result' field in {} response", method),
				None,
				None,
			)
			.into()
		})
}

fn decode_error(what: &str, detail: impl std::fmt::Display) -> anyhow::Error {
	BlockChainError::decode_error(format!("failed to decode {}: {}", what, detail), None, None)
		.into()
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> EvmClientTrait for EvmClient<T> {
	#[instrument(skip(self, topics), fields(from_block, to_block))]
	async fn get_logs(
		&self,
		address: &str,
		topics: Vec<String>,
		from_block: u64,
		to_block: u64,
	) -> Result<Vec<LogEntry>, anyhow::Error> {
		let params = json!([{
			"fromBlock": to_hex_quantity(from_block),
			"toBlock": to_hex_quantity(to_block),
			"address": address,
			"topics": topics,
		}])
		.as_array()
		.with_context(|| "Failed to create JSON-RPC params array")?
		.to_vec();

		let response = self
			.http_client
			.send_raw_request("eth_getLogs", Some(params))
			.await
			.with_context(|| format!("Failed to get logs for blocks: {} - {}", from_block, to_block))?;

		let logs = take_result(response, "eth_getLogs")?;
		serde_json::from_value(logs).map_err(|e| decode_error("logs", e))
	}

	#[instrument(skip(self))]
	async fn get_balance(&self, address: &str) -> Result<U256, anyhow::Error> {
		let response = self
			.http_client
			.send_raw_request("eth_getBalance", Some(json!([address, "latest"])))
			.await
			.with_context(|| format!("Failed to get balance of {}", address))?;

		let result = take_result(response, "eth_getBalance")?;
		let hex = result
			.as_str()
			.ok_or_else(|| decode_error("balance", "not a string"))?;
		parse_hex_u256(hex).map_err(|e| decode_error("balance", e))
	}

	#[instrument(skip(self, data))]
	async fn call(&self, to: &str, data: Bytes) -> Result<Bytes, anyhow::Error> {
		let params = json!([{ "to": to, "data": data.to_string() }, "latest"]);
		let response = self
			.http_client
			.send_raw_request("eth_call", Some(params))
			.await
			.with_context(|| format!("Failed to call {}", to))?;

		let result = take_result(response, "eth_call")?;
		let hex = result
			.as_str()
			.ok_or_else(|| decode_error("call result", "not a string"))?;
		Bytes::from_str(hex).map_err(|e| decode_error("call result", e))
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BlockChainClient for EvmClient<T> {
	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
		let response = self
			.http_client
			.send_raw_request::<Value>("eth_blockNumber", None)
			.await
			.with_context(|| "Failed to get latest block number")?;

		let result = take_result(response, "eth_blockNumber")?;
		let hex = result
			.as_str()
			.ok_or_else(|| decode_error("block number", "not a string"))?;
		parse_hex_u64(hex).map_err(|e| decode_error("block number", e))
	}

	#[instrument(skip(self))]
	async fn get_block_timestamp(&self, block_number: u64) -> Result<u64, anyhow::Error> {
		let params = json!([to_hex_quantity(block_number), false]);
		let response = self
			.http_client
			.send_raw_request("eth_getBlockByNumber", Some(params))
			.await
			.with_context(|| format!("Failed to get block: {}", block_number))?;

		let block = take_result(response, "eth_getBlockByNumber")?;
		if block.is_null() {
			return Err(
				BlockChainError::block_not_found(block_number.to_string(), None, None).into(),
			);
		}

		let hex = block
			.get("timestamp")
			.and_then(Value::as_str)
			.ok_or_else(|| decode_error("block timestamp", "missing 'timestamp'"))?;
		parse_hex_u64(hex).map_err(|e| decode_error("block timestamp", e))
	}
}
