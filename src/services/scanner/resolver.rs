//! Turns "look back N days" into a block range.

use chrono::{DateTime, Days, Utc};
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

use crate::{
	models::{BlockRange, ChainConfig, RangeStrategy},
	services::{
		blockchain::{BlockChainClient, ClientPoolTrait},
		blockrate::{BlockRateError, BlockRateEstimatorTrait},
		explorer::{ExplorerClientTrait, ExplorerError},
		scanner::ScanError,
	},
	utils::logging::error::ErrorKind,
};

fn chain_metadata(chain: &ChainConfig) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("chain".to_string(), chain.name.clone())]))
}

/// UTC midnight `days_back` days before `now`, in unix seconds.
pub fn start_of_day_utc(now: DateTime<Utc>, days_back: u64) -> i64 {
	now.date_naive()
		.checked_sub_days(Days::new(days_back))
		.and_then(|day| day.and_hms_opt(0, 0, 0))
		.map(|midnight| midnight.and_utc().timestamp())
		.unwrap_or(0)
}

fn from_block_rate_error(error: BlockRateError, chain: &ChainConfig) -> ScanError {
	match error.kind() {
		ErrorKind::StaleData => ScanError::stale_data(
			"no blocks-per-day estimate",
			Some(Box::new(error)),
			chain_metadata(chain),
		),
		_ => ScanError::transport_error(
			"blocks-per-day estimation failed",
			Some(Box::new(error)),
			chain_metadata(chain),
		),
	}
}

fn from_explorer_error(msg: &str, error: ExplorerError, chain: &ChainConfig) -> ScanError {
	match error.kind() {
		ErrorKind::Decode => ScanError::decode_error(msg, Some(Box::new(error)), chain_metadata(chain)),
		_ => ScanError::transport_error(msg, Some(Box::new(error)), chain_metadata(chain)),
	}
}

/// Resolves day windows with either the block-rate estimate or explorer lookups
pub struct BlockRangeResolver<P: ClientPoolTrait> {
	pool: Arc<P>,
	estimator: Arc<dyn BlockRateEstimatorTrait>,
	explorer: Arc<dyn ExplorerClientTrait>,
	strategy: RangeStrategy,
}

impl<P: ClientPoolTrait> BlockRangeResolver<P> {
	pub fn new(
		pool: Arc<P>,
		estimator: Arc<dyn BlockRateEstimatorTrait>,
		explorer: Arc<dyn ExplorerClientTrait>,
		strategy: RangeStrategy,
	) -> Self {
		Self {
			pool,
			estimator,
			explorer,
			strategy,
		}
	}

	pub async fn resolve(&self, chain: &ChainConfig, days_back: u64) -> Result<BlockRange, ScanError> {
		self.resolve_at(chain, days_back, Utc::now()).await
	}

	/// Same as [`resolve`](Self::resolve) with an explicit current time.
	#[instrument(skip(self, chain, now), fields(chain = %chain.name, strategy = ?self.strategy))]
	pub async fn resolve_at(
		&self,
		chain: &ChainConfig,
		days_back: u64,
		now: DateTime<Utc>,
	) -> Result<BlockRange, ScanError> {
		let range = match self.strategy {
			RangeStrategy::Estimate => self.by_estimate(chain, days_back).await?,
			RangeStrategy::ExplorerLookup => self.by_lookup(chain, days_back, now).await?,
		};
		tracing::debug!(%range, "resolved block range");
		Ok(range)
	}

	async fn by_estimate(&self, chain: &ChainConfig, days_back: u64) -> Result<BlockRange, ScanError> {
		let blocks_per_day = self
			.estimator
			.estimate(chain)
			.await
			.map_err(|e| from_block_rate_error(e, chain))?;

		let client = self
			.pool
			.get_client(chain)
			.await
			.map_err(|e| ScanError::from_client("no client for chain", e, chain_metadata(chain)))?;
		let head = client.get_latest_block_number().await.map_err(|e| {
			ScanError::from_client("failed to read the latest block", e, chain_metadata(chain))
		})?;

		Ok(BlockRange::ending_at(
			head,
			blocks_per_day.saturating_mul(days_back),
		))
	}

	async fn by_lookup(
		&self,
		chain: &ChainConfig,
		days_back: u64,
		now: DateTime<Utc>,
	) -> Result<BlockRange, ScanError> {
		let from = self
			.explorer
			.block_by_timestamp(chain, start_of_day_utc(now, days_back))
			.await
			.map_err(|e| from_explorer_error("start block lookup failed", e, chain))?;
		let to = self
			.explorer
			.block_by_timestamp(chain, now.timestamp())
			.await
			.map_err(|e| from_explorer_error("end block lookup failed", e, chain))?;

		if from > to {
			tracing::warn!(from, to, "explorer returned an inverted range, clamping");
		}
		Ok(BlockRange::clamped(from, to))
	}
}
