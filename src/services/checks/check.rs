use async_trait::async_trait;

use crate::{
	models::ChainConfig,
	services::{
		blockchain::ClientPoolTrait,
		checks::{CheckError, CheckId, MonitorContext},
	},
};

/// One monitored condition.
///
/// Records are written to the context's sink as they are produced. An `Err` is
/// reserved for failures that stop the whole check; per-unit failures become
/// error-shaped records instead.
#[async_trait]
pub trait Check<P: ClientPoolTrait>: Send + Sync {
	fn id(&self) -> CheckId;

	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError>;
}

/// A check evaluated independently on every configured chain
#[async_trait]
pub trait ChainCheck<P: ClientPoolTrait>: Send + Sync {
	fn id(&self) -> CheckId;

	/// Emits the chain's records; an `Err` becomes one error record for the chain
	async fn check_chain(&self, ctx: &MonitorContext<P>, chain: &ChainConfig) -> Result<(), CheckError>;
}

/// Runs `check` on each chain in configuration order; a failing chain never stops the loop.
pub async fn for_each_chain<P, C>(check: &C, ctx: &MonitorContext<P>)
where
	P: ClientPoolTrait,
	C: ChainCheck<P> + ?Sized,
{
	for chain in ctx.chains() {
		if let Err(error) = check.check_chain(ctx, chain).await {
			tracing::warn!(check = %check.id(), chain = %chain.name, error = %error, "check failed on chain");
			ctx.emit_failure(check.id(), Some(&chain.name), &error);
		}
	}
}
