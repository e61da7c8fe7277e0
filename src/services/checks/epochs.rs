//! Active and inactive actor totals for the current epoch on the DAO chain.

use alloy::{dyn_abi::DynSolValue, primitives::U256};
use async_trait::async_trait;
use serde_json::json;

use crate::{
	models::{ActorType, ChainConfig},
	services::{
		blockchain::{calls, ClientPoolTrait, ContractReader},
		checks::{context::chain_metadata, Check, CheckError, CheckId, MonitorContext},
	},
};

pub struct InactiveActorsCheck;

impl InactiveActorsCheck {
	async fn current_epoch<P: ClientPoolTrait>(
		&self,
		ctx: &MonitorContext<P>,
		chain: &ChainConfig,
	) -> Result<(String, u64), CheckError> {
		let hub = ctx.hub_address(chain).await?;
		let epochs_manager = ctx.read_address(chain, hub, &calls::EPOCHS_MANAGER).await?;
		let client = ctx.client(chain).await?;
		let epoch = ContractReader::new(client.as_ref())
			.read_uint(&epochs_manager.to_string(), &calls::CURRENT_EPOCH, Vec::new())
			.await
			.map_err(|e| {
				CheckError::from_client("currentEpoch() failed", e, chain_metadata(&chain.name))
			})?;
		Ok((hub.to_string(), to_u64(epoch, "currentEpoch()", &chain.name)?))
	}

	async fn totals<P: ClientPoolTrait>(
		&self,
		ctx: &MonitorContext<P>,
		chain: &ChainConfig,
		hub: &str,
		epoch: u64,
		actor_type: ActorType,
	) -> Result<(u64, u64), CheckError> {
		let client = ctx.client(chain).await?;
		let reader = ContractReader::new(client.as_ref());
		let mut totals = [0u64; 2];
		for (slot, call) in totals.iter_mut().zip([
			&calls::TOTAL_ACTORS_BY_EPOCH_AND_TYPE,
			&calls::TOTAL_INACTIVE_ACTORS_BY_EPOCH_AND_TYPE,
		]) {
			let args = vec![
				DynSolValue::Uint(U256::from(epoch), 16),
				DynSolValue::Uint(U256::from(actor_type.as_u8()), 8),
			];
			let value = reader.read_uint(hub, call, args).await.map_err(|e| {
				CheckError::from_client(
					format!("{} failed for {}", call.signature, actor_type),
					e,
					chain_metadata(&chain.name),
				)
			})?;
			*slot = to_u64(value, call.signature, &chain.name)?;
		}
		Ok((totals[0], totals[1]))
	}
}

fn to_u64(value: U256, what: &str, chain: &str) -> Result<u64, CheckError> {
	u64::try_from(value).map_err(|_| {
		CheckError::decode_error(
			format!("{} returned {} which does not fit 64 bits", what, value),
			None,
			chain_metadata(chain),
		)
	})
}

#[async_trait]
impl<P: ClientPoolTrait> Check<P> for InactiveActorsCheck {
	fn id(&self) -> CheckId {
		CheckId::InactiveActorsByEpoch
	}

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		let id = CheckId::InactiveActorsByEpoch;
		let chain = match ctx.dao_chain() {
			Ok(chain) => chain,
			Err(error) => {
				ctx.emit_failure(id, Some(&ctx.config.dao_chain), &error);
				return Ok(());
			}
		};
		let (hub, epoch) = match self.current_epoch(ctx, chain).await {
			Ok(found) => found,
			Err(error) => {
				ctx.emit_failure(id, Some(&chain.name), &error);
				return Ok(());
			}
		};

		for actor_type in ActorType::ALL {
			match self.totals(ctx, chain, &hub, epoch, actor_type).await {
				Ok((active, inactive)) => ctx.emit_success(
					id,
					Some(&chain.name),
					json!({
						"epoch": epoch,
						"actors": {
							"actor_type": actor_type.name(),
							"active_actors": active,
							"inactive_actors": inactive,
						},
					}),
				),
				Err(error) => ctx.emit_failure(id, Some(&chain.name), &error),
			}
		}
		Ok(())
	}
}
