use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::json;

use crate::{
	models::{ChainConfig, LogEntry},
	services::{
		blockchain::ClientPoolTrait,
		checks::{
			context::{chain_metadata, wrap_error},
			for_each_chain, ChainCheck, Check, CheckError, CheckId, MonitorContext,
		},
	},
};

/// Lists `ActorSlashed` events: epoch in topic 1, actor in topic 2
pub struct SlashedActorsCheck;

/// Extracts `(actor, epoch)` from an `ActorSlashed` log
pub fn slashed_actor(log: &LogEntry) -> Result<(Address, u64), String> {
	let (Some(epoch), Some(actor)) = (log.topics.get(1), log.topics.get(2)) else {
		return Err(format!("ActorSlashed log has {} topics, expected 3", log.topics.len()));
	};
	let epoch = U256::from_be_bytes(epoch.0);
	let epoch = u64::try_from(epoch).map_err(|_| format!("epoch {} out of range", epoch))?;
	Ok((Address::from_word(*actor), epoch))
}

#[async_trait]
impl<P: ClientPoolTrait> ChainCheck<P> for SlashedActorsCheck {
	fn id(&self) -> CheckId {
		CheckId::SlashedActors
	}

	async fn check_chain(&self, ctx: &MonitorContext<P>, chain: &ChainConfig) -> Result<(), CheckError> {
		let id = CheckId::SlashedActors;
		let Some(topic) = ctx.config.topics.actor_slashed.clone() else {
			return Err(CheckError::config_error(
				"topics.actor_slashed is not configured",
				None,
				chain_metadata(&chain.name),
			));
		};
		let hub = ctx.hub_address(chain).await?;
		let logs = ctx
			.scanner
			.scan(&hub.to_string(), vec![topic], chain, ctx.config.lookback.default_days)
			.await
			.map_err(|e| wrap_error(e.kind(), "ActorSlashed scan failed", e, &chain.name))?;

		for log in &logs {
			match slashed_actor(log) {
				Ok((actor, epoch)) => ctx.emit_success(
					id,
					Some(&chain.name),
					json!({ "actor_address": actor.to_string(), "epoch": epoch }),
				),
				Err(e) => {
					let error = CheckError::decode_error(e, None, chain_metadata(&chain.name));
					ctx.emit_failure(id, Some(&chain.name), &error);
				}
			}
		}
		Ok(())
	}
}

#[async_trait]
impl<P: ClientPoolTrait> Check<P> for SlashedActorsCheck {
	fn id(&self) -> CheckId {
		CheckId::SlashedActors
	}

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		for_each_chain(self, ctx).await;
		Ok(())
	}
}
