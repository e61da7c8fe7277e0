use async_trait::async_trait;
use serde_json::json;

use crate::{
	models::ChainConfig,
	services::{
		blockchain::{BlockChainClient, ClientPoolTrait},
		checks::{
			context::{chain_metadata, wrap_error},
			for_each_chain, ChainCheck, Check, CheckError, CheckId, MonitorContext,
		},
	},
};

/// Lists `OperationCancelled` events of each hub with the time of their block
pub struct OperationCancelledCheck;

#[async_trait]
impl<P: ClientPoolTrait> ChainCheck<P> for OperationCancelledCheck {
	fn id(&self) -> CheckId {
		CheckId::OperationCancelled
	}

	async fn check_chain(&self, ctx: &MonitorContext<P>, chain: &ChainConfig) -> Result<(), CheckError> {
		let id = CheckId::OperationCancelled;
		let hub = ctx.hub_address(chain).await?;
		let logs = ctx
			.scanner
			.scan(
				&hub.to_string(),
				vec![ctx.config.topics.operation_cancelled.clone()],
				chain,
				ctx.config.lookback.operation_cancelled_days,
			)
			.await
			.map_err(|e| wrap_error(e.kind(), "OperationCancelled scan failed", e, &chain.name))?;
		if logs.is_empty() {
			return Ok(());
		}

		let client = ctx.client(chain).await?;
		for log in &logs {
			let Some(block) = log.block_number() else {
				let error = CheckError::decode_error("log without block number", None, chain_metadata(&chain.name));
				ctx.emit_failure(id, Some(&chain.name), &error);
				continue;
			};
			match client.get_block_timestamp(block).await {
				Ok(block_ts) => ctx.emit_success(
					id,
					Some(&chain.name),
					json!({
						"tx_hash": log.transaction_hash_hex(),
						"block": block,
						"block_ts": block_ts,
					}),
				),
				Err(e) => {
					let error = CheckError::from_client(
						format!("timestamp of block {} unavailable", block),
						e,
						chain_metadata(&chain.name),
					);
					ctx.emit_failure(id, Some(&chain.name), &error);
				}
			}
		}
		Ok(())
	}
}

#[async_trait]
impl<P: ClientPoolTrait> Check<P> for OperationCancelledCheck {
	fn id(&self) -> CheckId {
		CheckId::OperationCancelled
	}

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		for_each_chain(self, ctx).await;
		Ok(())
	}
}
