use std::{collections::BTreeMap, sync::Arc};

use crate::services::{
	blockchain::ClientPoolTrait,
	checks::{
		Check, CheckError, CheckId, ComponentsBalancesCheck, HubQueryCheck, InactiveActorsCheck,
		MonitorContext, OperationCancelledCheck, PubSubCheck, QueuedOperationsCheck,
		SlashedActorsCheck,
	},
	pubsub::{PubSubTransport, SubscriptionListener},
};

/// Maps every [`CheckId`] to its implementation
pub struct CheckRegistry<P: ClientPoolTrait> {
	checks: BTreeMap<CheckId, Box<dyn Check<P>>>,
}

impl<P: ClientPoolTrait + 'static> CheckRegistry<P> {
	pub fn new() -> Self {
		Self {
			checks: BTreeMap::new(),
		}
	}

	/// All nine checks, the last one listening through `listener`
	pub fn standard<T: PubSubTransport + 'static>(listener: Arc<SubscriptionListener<T>>) -> Self {
		Self::new()
			.with(HubQueryCheck::nr_of_ops_in_queue())
			.with(HubQueryCheck::max_ops_in_queue())
			.with(HubQueryCheck::challenge_period_duration())
			.with(OperationCancelledCheck)
			.with(QueuedOperationsCheck)
			.with(SlashedActorsCheck)
			.with(ComponentsBalancesCheck)
			.with(InactiveActorsCheck)
			.with(PubSubCheck::new(listener))
	}

	/// Registers `check` under its own id, replacing any previous one
	pub fn with<C: Check<P> + 'static>(mut self, check: C) -> Self {
		self.checks.insert(check.id(), Box::new(check));
		self
	}

	pub fn get(&self, id: CheckId) -> Option<&dyn Check<P>> {
		self.checks.get(&id).map(|check| check.as_ref())
	}

	pub fn ids(&self) -> Vec<CheckId> {
		self.checks.keys().copied().collect()
	}

	/// Runs the checks in the given order.
	///
	/// A failing check is reported and the next one still runs. Returns the ids
	/// that failed.
	pub async fn run(&self, ids: &[CheckId], ctx: &MonitorContext<P>) -> Vec<CheckId> {
		let mut failed = Vec::new();
		for id in ids {
			let Some(check) = self.get(*id) else {
				let error = CheckError::config_error(format!("check {} is not registered", id), None, None);
				ctx.emit_failure(*id, None, &error);
				failed.push(*id);
				continue;
			};
			tracing::info!(check = %id, "running check");
			if let Err(error) = check.run(ctx).await {
				tracing::error!(check = %id, error = %error, "check failed");
				ctx.emit_failure(*id, None, &error);
				failed.push(*id);
			}
		}
		failed
	}
}

impl<P: ClientPoolTrait + 'static> Default for CheckRegistry<P> {
	fn default() -> Self {
		Self::new()
	}
}
