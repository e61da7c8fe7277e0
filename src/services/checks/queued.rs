//! Queued operations and whether their value crosses the configured USD threshold.

use alloy::{dyn_abi::DynSolValue, primitives::U256};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
	models::{chain_name_for_id, ChainConfig, LogEntry},
	services::{
		blockchain::{decode_params, ClientPoolTrait},
		checks::{
			context::{chain_metadata, wrap_error},
			for_each_chain, ChainCheck, Check, CheckError, CheckId, MonitorContext,
		},
	},
	utils::format_units,
};

/// ABI layout of the `Operation` struct carried by `OperationQueued`
pub const OPERATION_TUPLE: &str = "((bytes32,bytes32,bytes32,uint256,uint256,uint256,uint256,uint256,uint256,address,bytes4,bytes4,bytes4,bytes4,string,string,string,string,bytes,bool))";

/// The fields of a queued operation the check reports
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedOperation {
	pub origin_tx_hash: String,
	pub asset_decimals: u32,
	pub asset_amount: U256,
	pub destination_chain_id: String,
}

impl QueuedOperation {
	/// Decodes the data of an `OperationQueued` log.
	pub fn decode(data: &[u8]) -> Result<Self, String> {
		let values = decode_params(OPERATION_TUPLE, data)?;
		let Some(DynSolValue::Tuple(fields)) = values.into_iter().next() else {
			return Err("operation is not a tuple".to_string());
		};

		let origin_tx_hash = match fields.get(1) {
			Some(DynSolValue::FixedBytes(word, 32)) => format!("{:#x}", word),
			_ => return Err("originTransactionHash is not bytes32".to_string()),
		};
		let asset_decimals = match fields.get(4) {
			Some(DynSolValue::Uint(value, _)) => {
				u32::try_from(*value).map_err(|_| format!("asset decimals {} out of range", value))?
			}
			_ => return Err("underlyingAssetDecimals is not uint256".to_string()),
		};
		let asset_amount = match fields.get(5) {
			Some(DynSolValue::Uint(value, _)) => *value,
			_ => return Err("assetAmount is not uint256".to_string()),
		};
		let destination_chain_id = match fields.get(11) {
			Some(DynSolValue::FixedBytes(word, 4)) => format!("0x{}", hex::encode(&word[..4])),
			_ => return Err("destinationNetworkId is not bytes4".to_string()),
		};

		Ok(Self {
			origin_tx_hash,
			asset_decimals,
			asset_amount,
			destination_chain_id,
		})
	}
}

pub struct QueuedOperationsCheck;

impl QueuedOperationsCheck {
	fn evaluate(
		&self,
		log: &LogEntry,
		chain: &ChainConfig,
		price: Decimal,
		threshold: Decimal,
	) -> Result<serde_json::Value, CheckError> {
		let operation = QueuedOperation::decode(&log.data).map_err(|e| {
			CheckError::decode_error(
				format!("undecodable OperationQueued data: {}", e),
				None,
				chain_metadata(&chain.name),
			)
		})?;
		let Some(dest_chain) = chain_name_for_id(&operation.destination_chain_id) else {
			return Err(CheckError::unknown_identifier(
				format!("unknown destination chain id {}", operation.destination_chain_id),
				None,
				chain_metadata(&chain.name),
			));
		};
		let amount = format_units(operation.asset_amount, operation.asset_decimals).map_err(|e| {
			CheckError::decode_error(e, None, chain_metadata(&chain.name))
		})?;
		let usd = (amount * price).normalize();

		Ok(json!({
			"tx_hash": operation.origin_tx_hash,
			"asset_amount_token": amount.to_string(),
			"asset_amount_usd": usd.to_string(),
			"dest_chain_id_hex": operation.destination_chain_id,
			"dest_chain": dest_chain,
			"threshold": usd > threshold,
		}))
	}
}

#[async_trait]
impl<P: ClientPoolTrait> ChainCheck<P> for QueuedOperationsCheck {
	fn id(&self) -> CheckId {
		CheckId::QueueOperationsWithThreshold
	}

	async fn check_chain(&self, ctx: &MonitorContext<P>, chain: &ChainConfig) -> Result<(), CheckError> {
		let id = CheckId::QueueOperationsWithThreshold;
		let hub = ctx.hub_address(chain).await?;
		let logs = ctx
			.scanner
			.scan(
				&hub.to_string(),
				vec![ctx.config.topics.operation_queued.clone()],
				chain,
				ctx.config.lookback.default_days,
			)
			.await
			.map_err(|e| wrap_error(e.kind(), "OperationQueued scan failed", e, &chain.name))?;
		if logs.is_empty() {
			return Ok(());
		}

		// One price per chain and run
		let price = ctx
			.explorer
			.native_price_usd(chain)
			.await
			.map_err(|e| wrap_error(e.kind(), "native price unavailable", e, &chain.name))?;
		let threshold = ctx.config.queued_operation_amount_threshold;

		for log in &logs {
			match self.evaluate(log, chain, price, threshold) {
				Ok(fields) => ctx.emit_success(id, Some(&chain.name), fields),
				Err(error) => ctx.emit_failure(id, Some(&chain.name), &error),
			}
		}
		Ok(())
	}
}

#[async_trait]
impl<P: ClientPoolTrait> Check<P> for QueuedOperationsCheck {
	fn id(&self) -> CheckId {
		CheckId::QueueOperationsWithThreshold
	}

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		for_each_chain(self, ctx).await;
		Ok(())
	}
}
