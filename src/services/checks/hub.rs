//! Single-value hub reads: queue length, queue capacity and challenge period.

use async_trait::async_trait;
use serde_json::json;

use crate::{
	models::ChainConfig,
	services::{
		blockchain::{calls, ClientPoolTrait, ContractCall, ContractReader},
		checks::{
			context::chain_metadata, for_each_chain, ChainCheck, Check, CheckError, CheckId,
			MonitorContext,
		},
	},
};

/// Reads one unsigned view function of each chain's hub
pub struct HubQueryCheck {
	id: CheckId,
	call: ContractCall,
}

impl HubQueryCheck {
	pub fn nr_of_ops_in_queue() -> Self {
		Self {
			id: CheckId::NrOfOpsInQueue,
			call: calls::NUMBER_OF_OPERATIONS_IN_QUEUE,
		}
	}

	pub fn max_ops_in_queue() -> Self {
		Self {
			id: CheckId::MaxOpsInQueue,
			call: calls::MAX_OPERATIONS_IN_QUEUE,
		}
	}

	pub fn challenge_period_duration() -> Self {
		Self {
			id: CheckId::ChallengePeriodDuration,
			call: calls::CURRENT_CHALLENGE_PERIOD_DURATION,
		}
	}
}

#[async_trait]
impl<P: ClientPoolTrait> ChainCheck<P> for HubQueryCheck {
	fn id(&self) -> CheckId {
		self.id
	}

	async fn check_chain(&self, ctx: &MonitorContext<P>, chain: &ChainConfig) -> Result<(), CheckError> {
		let hub = ctx.hub_address(chain).await?;
		let client = ctx.client(chain).await?;
		let value = ContractReader::new(client.as_ref())
			.read_uint(&hub.to_string(), &self.call, Vec::new())
			.await
			.map_err(|e| {
				CheckError::from_client(
					format!("{} failed on hub {}", self.call.signature, hub),
					e,
					chain_metadata(&chain.name),
				)
			})?;
		let value = u64::try_from(value).map_err(|_| {
			CheckError::decode_error(
				format!("{} returned {} which does not fit 64 bits", self.call.signature, value),
				None,
				chain_metadata(&chain.name),
			)
		})?;

		tracing::debug!(check = %self.id, chain = %chain.name, value, "hub value read");
		ctx.emit_success(self.id, Some(&chain.name), json!({ self.id.name(): value }));
		Ok(())
	}
}

#[async_trait]
impl<P: ClientPoolTrait> Check<P> for HubQueryCheck {
	fn id(&self) -> CheckId {
		self.id
	}

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		for_each_chain(self, ctx).await;
		Ok(())
	}
}
