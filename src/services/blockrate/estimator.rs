//! Blocks-per-day estimation.
//!
//! A chain's rate is derived from the timestamps of blocks sampled at a fixed stride
//! below the head: the median interval between consecutive samples, inverted over a
//! day. Estimates of every configured chain are computed together and cached on disk
//! until they expire.

use async_trait::async_trait;
use futures::future::join_all;
use std::{collections::BTreeMap, collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::{
	models::{BlockRateSettings, ChainConfig},
	services::{
		blockchain::{BlockChainClient, ClientPoolTrait},
		blockrate::{cache::BlockRateCache, BlockRateError},
	},
};

const SECONDS_PER_DAY: i128 = 86_400;

/// Source of per-chain blocks-per-day figures
#[async_trait]
pub trait BlockRateEstimatorTrait: Send + Sync {
	/// Blocks mined per day on `chain`, recomputed when the cached value is stale
	async fn estimate(&self, chain: &ChainConfig) -> Result<u64, BlockRateError>;
}

/// Blocks per day from sample timestamps ordered newest first, `step` blocks apart.
///
/// Uses the median of the consecutive differences with integer arithmetic only:
/// `86400 * step / d` for an odd number of differences and
/// `86400 * 2 * step / (d_lo + d_hi)` for an even one. Returns `None` when fewer
/// than two samples are given or the median interval is not positive.
pub fn blocks_per_day_from_samples(timestamps: &[u64], step: u64) -> Option<u64> {
	if timestamps.len() < 2 || step == 0 {
		return None;
	}
	let mut deltas: Vec<i128> = timestamps
		.windows(2)
		.map(|pair| pair[0] as i128 - pair[1] as i128)
		.collect();
	deltas.sort_unstable();

	let n = deltas.len();
	let step = step as i128;
	let (numerator, denominator) = if n % 2 == 1 {
		(SECONDS_PER_DAY * step, deltas[n / 2])
	} else {
		(SECONDS_PER_DAY * 2 * step, deltas[n / 2 - 1] + deltas[n / 2])
	};
	if denominator <= 0 {
		return None;
	}
	u64::try_from(numerator / denominator).ok()
}

fn chain_metadata(chain: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("chain".to_string(), chain.to_string())]))
}

/// Outcome of reading one chain from the cache file
enum CacheLookup {
	Hit(u64),
	/// The cache is valid but the chain failed its last sampling
	Missing,
	/// Missing, unreadable or expired file
	Expired,
}

fn missing_estimate(chain: &str) -> BlockRateError {
	BlockRateError::stale_data(
		"no valid blocks-per-day estimate",
		None,
		chain_metadata(chain),
	)
}

/// Estimator backed by the chain clients of a pool and an on-disk cache
pub struct BlockRateEstimator<P: ClientPoolTrait> {
	chains: Vec<ChainConfig>,
	settings: BlockRateSettings,
	pool: Arc<P>,
	cache: BlockRateCache,
	/// Held while estimates are recomputed
	refresh_lock: Mutex<()>,
}

impl<P: ClientPoolTrait> BlockRateEstimator<P> {
	pub fn new(chains: Vec<ChainConfig>, settings: BlockRateSettings, pool: Arc<P>) -> Self {
		let cache = BlockRateCache::new(settings.path.clone());
		Self {
			chains,
			settings,
			pool,
			cache,
			refresh_lock: Mutex::new(()),
		}
	}

	/// Looks `chain` up in the cache file.
	///
	/// An unreadable cache is treated like a missing one.
	async fn lookup(&self, chain: &str) -> CacheLookup {
		let cached = match self.cache.load().await {
			Ok(Some(cached)) => cached,
			Ok(None) => return CacheLookup::Expired,
			Err(e) => {
				tracing::warn!(error = %e, "ignoring unreadable blocks-per-day cache");
				return CacheLookup::Expired;
			}
		};
		if !cached.is_fresh(self.settings.validity()) {
			tracing::debug!(age_secs = cached.age().as_secs(), "blocks-per-day cache is stale");
			return CacheLookup::Expired;
		}
		match cached.estimates.get(chain) {
			Some(estimate) => CacheLookup::Hit(*estimate),
			None => CacheLookup::Missing,
		}
	}

	/// Samples one chain and returns its blocks-per-day figure
	#[instrument(skip(self, chain), fields(chain = %chain.name))]
	async fn sample_chain(&self, chain: &ChainConfig) -> Result<u64, BlockRateError> {
		let step = self.settings.sample_step;
		let count = self.settings.sample_count;

		let client = self.pool.get_client(chain).await.map_err(|e| {
			BlockRateError::sampling_error(
				"no client for chain",
				Some(e.into()),
				chain_metadata(&chain.name),
			)
		})?;
		let head = client.get_latest_block_number().await.map_err(|e| {
			BlockRateError::sampling_error(
				"failed to read the latest block",
				Some(e.into()),
				chain_metadata(&chain.name),
			)
		})?;

		let deepest = step.saturating_mul(count);
		if deepest > head {
			return Err(BlockRateError::sampling_error(
				format!("head block {} is below the deepest sample offset {}", head, deepest),
				None,
				chain_metadata(&chain.name),
			));
		}

		// Results come back in offset order regardless of completion order
		let requests = (1..=count).map(|n| client.get_block_timestamp(head - n * step));
		let timestamps = join_all(requests)
			.await
			.into_iter()
			.collect::<Result<Vec<u64>, anyhow::Error>>()
			.map_err(|e| {
				BlockRateError::sampling_error(
					"failed to read sample block timestamps",
					Some(e.into()),
					chain_metadata(&chain.name),
				)
			})?;

		blocks_per_day_from_samples(&timestamps, step).ok_or_else(|| {
			BlockRateError::sampling_error(
				"median block interval is not positive",
				None,
				chain_metadata(&chain.name),
			)
		})
	}

	/// Recomputes every configured chain and replaces the cache.
	///
	/// A chain whose sampling fails is left out of the new cache.
	pub async fn refresh(&self) -> Result<BTreeMap<String, u64>, BlockRateError> {
		let mut estimates = BTreeMap::new();
		for chain in &self.chains {
			match self.sample_chain(chain).await {
				Ok(blocks_per_day) => {
					tracing::info!(chain = %chain.name, blocks_per_day, "estimated block rate");
					estimates.insert(chain.name.clone(), blocks_per_day);
				}
				Err(e) => {
					tracing::warn!(chain = %chain.name, error = %e, "skipping chain in block rate refresh");
				}
			}
		}
		self.cache.store(&estimates).await?;
		Ok(estimates)
	}
}

#[async_trait]
impl<P: ClientPoolTrait> BlockRateEstimatorTrait for BlockRateEstimator<P> {
	async fn estimate(&self, chain: &ChainConfig) -> Result<u64, BlockRateError> {
		match self.lookup(&chain.name).await {
			CacheLookup::Hit(estimate) => return Ok(estimate),
			CacheLookup::Missing => return Err(missing_estimate(&chain.name)),
			CacheLookup::Expired => {}
		}

		let _guard = self.refresh_lock.lock().await;
		// Another caller may have refreshed while we waited
		match self.lookup(&chain.name).await {
			CacheLookup::Hit(estimate) => return Ok(estimate),
			CacheLookup::Missing => return Err(missing_estimate(&chain.name)),
			CacheLookup::Expired => {}
		}

		let estimates = self.refresh().await?;
		estimates
			.get(&chain.name)
			.copied()
			.ok_or_else(|| missing_estimate(&chain.name))
	}
}
