//! Native balances of every protocol component and relayer on every chain.
//!
//! Components come from the last `ActorsPropagated` event of the DAO chain's
//! governance message emitter, found through hub → slasher → registration manager.

use alloy::{dyn_abi::DynSolValue, primitives::Address};
use async_trait::async_trait;
use serde_json::json;

use crate::{
	models::{ActorType, ChainConfig, LogEntry},
	services::{
		blockchain::{calls, decode_params, ClientPoolTrait, EvmClientTrait},
		checks::{
			context::{chain_metadata, wrap_error},
			Check, CheckError, CheckId, MonitorContext,
		},
	},
	utils::{format_units, logging::error::ErrorKind},
};

/// An address whose balance is reported, with its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
	pub address: Address,
	pub actor_type: String,
}

/// Decodes `ActorsPropagated` data: actor addresses and their types as words.
///
/// Types outside the actor table are an error for the whole event.
pub fn propagated_actors(log: &LogEntry) -> Result<Vec<Component>, CheckError> {
	let values = decode_params("(address[],uint256[])", &log.data).map_err(|e| {
		CheckError::decode_error(format!("undecodable ActorsPropagated data: {}", e), None, None)
	})?;
	let (Some(DynSolValue::Array(actors)), Some(DynSolValue::Array(types))) =
		(values.first(), values.get(1))
	else {
		return Err(CheckError::decode_error("ActorsPropagated data is not two arrays", None, None));
	};
	if actors.len() != types.len() {
		return Err(CheckError::decode_error(
			format!("{} actors but {} actor types", actors.len(), types.len()),
			None,
			None,
		));
	}

	actors
		.iter()
		.zip(types)
		.map(|(actor, actor_type)| {
			let (DynSolValue::Address(address), DynSolValue::Uint(raw_type, _)) = (actor, actor_type)
			else {
				return Err(CheckError::decode_error("unexpected actor entry", None, None));
			};
			let actor_type = u8::try_from(*raw_type)
				.ok()
				.and_then(ActorType::from_u8)
				.ok_or_else(|| {
					CheckError::unknown_identifier(format!("unknown actor type {}", raw_type), None, None)
				})?;
			Ok(Component {
				address: *address,
				actor_type: actor_type.name().to_string(),
			})
		})
		.collect()
}

pub struct ComponentsBalancesCheck;

impl ComponentsBalancesCheck {
	/// Walks hub → slasher → registrationManager → governanceMessageEmitter
	async fn components<P: ClientPoolTrait>(
		&self,
		ctx: &MonitorContext<P>,
		chain: &ChainConfig,
	) -> Result<Vec<Component>, CheckError> {
		let hub = ctx.hub_address(chain).await?;
		let slasher = ctx.read_address(chain, hub, &calls::SLASHER).await?;
		let registration_manager = ctx
			.read_address(chain, slasher, &calls::REGISTRATION_MANAGER)
			.await?;
		let emitter = ctx
			.read_address(chain, registration_manager, &calls::GOVERNANCE_MESSAGE_EMITTER)
			.await?;

		let logs = ctx
			.scanner
			.scan(
				&emitter.to_string(),
				vec![ctx.config.topics.actors_propagated.clone()],
				chain,
				ctx.config.lookback.default_days,
			)
			.await
			.map_err(|e| wrap_error(e.kind(), "ActorsPropagated scan failed", e, &chain.name))?;
		let Some(last) = logs.last() else {
			return Err(CheckError::with_kind(
				ErrorKind::StaleData,
				format!("no ActorsPropagated event from {} in the lookback window", emitter),
				None,
				chain_metadata(&chain.name),
			));
		};
		propagated_actors(last)
	}

	async fn balance<P: ClientPoolTrait>(
		&self,
		ctx: &MonitorContext<P>,
		chain: &ChainConfig,
		address: &Address,
	) -> Result<String, CheckError> {
		let client = ctx.client(chain).await?;
		let wei = client.get_balance(&address.to_string()).await.map_err(|e| {
			CheckError::from_client(
				format!("balance of {} unavailable", address),
				e,
				chain_metadata(&chain.name),
			)
		})?;
		format_units(wei, chain.decimals)
			.map(|balance| balance.to_string())
			.map_err(|e| CheckError::decode_error(e, None, chain_metadata(&chain.name)))
	}
}

#[async_trait]
impl<P: ClientPoolTrait> Check<P> for ComponentsBalancesCheck {
	fn id(&self) -> CheckId {
		CheckId::ComponentsBalances
	}

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		let id = CheckId::ComponentsBalances;
		let mut components = match ctx.dao_chain() {
			Ok(dao_chain) => match self.components(ctx, dao_chain).await {
				Ok(components) => components,
				Err(error) => {
					ctx.emit_failure(id, Some(&dao_chain.name), &error);
					Vec::new()
				}
			},
			Err(error) => {
				ctx.emit_failure(id, Some(&ctx.config.dao_chain), &error);
				Vec::new()
			}
		};

		for relayer in &ctx.config.relayers {
			match relayer.parse::<Address>() {
				Ok(address) => components.push(Component {
					address,
					actor_type: "relayer".to_string(),
				}),
				Err(e) => {
					let error = CheckError::config_error(
						format!("relayer '{}' is not an address", relayer),
						Some(Box::new(e)),
						None,
					);
					ctx.emit_failure(id, None, &error);
				}
			}
		}

		for chain in ctx.chains() {
			for component in &components {
				match self.balance(ctx, chain, &component.address).await {
					Ok(balance) => ctx.emit_success(
						id,
						Some(&chain.name),
						json!({
							"actor_addr": component.address.to_string(),
							"actor_type": component.actor_type,
							"balance": balance,
						}),
					),
					Err(error) => ctx.emit_failure(id, Some(&chain.name), &error),
				}
			}
		}
		Ok(())
	}
}
