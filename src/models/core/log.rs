use alloy::primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};

/// An event log as returned by `eth_getLogs`.
///
/// Read-only for the scanner: entries are appended in arrival order and never altered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Emitting contract
	pub address: Address,
	/// Indexed topics; the first one is the event signature
	pub topics: Vec<B256>,
	/// Non-indexed ABI-encoded data
	pub data: Bytes,
	#[serde(rename = "blockNumber", default)]
	pub block_number: Option<U64>,
	#[serde(rename = "transactionHash", default)]
	pub transaction_hash: Option<B256>,
	#[serde(rename = "blockHash", default)]
	pub block_hash: Option<B256>,
	#[serde(rename = "logIndex", default)]
	pub log_index: Option<U256>,
	#[serde(default)]
	pub removed: Option<bool>,
}

impl LogEntry {
	pub fn block_number(&self) -> Option<u64> {
		self.block_number.map(|n| n.to::<u64>())
	}

	pub fn transaction_hash_hex(&self) -> Option<String> {
		self.transaction_hash.map(|h| format!("{:#x}", h))
	}
}
