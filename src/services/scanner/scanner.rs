//! Paginated event log scanning.
//!
//! A day window is resolved to a block range, split into windows no wider than the
//! provider's limit and fetched one `eth_getLogs` call at a time with a fixed pause
//! after each call.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::instrument;

use crate::{
	models::{BlockRange, ChainConfig, LogEntry, ScannerSettings},
	services::{
		blockchain::{ClientPoolTrait, EvmClientTrait},
		scanner::{BlockRangeResolver, ScanError, WindowPlan},
	},
};

/// Log queries over day windows
#[async_trait]
pub trait LogScannerTrait: Send + Sync {
	/// Every log of `address` matching `topics` over the last `days_back` days.
	///
	/// An empty result is valid. Any failing sub-call aborts the scan and the logs
	/// collected so far are dropped.
	async fn scan(
		&self,
		address: &str,
		topics: Vec<String>,
		chain: &ChainConfig,
		days_back: u64,
	) -> Result<Vec<LogEntry>, ScanError>;
}

pub struct LogScanner<P: ClientPoolTrait> {
	pool: Arc<P>,
	resolver: BlockRangeResolver<P>,
	max_span: u64,
	delay: Duration,
}

impl<P: ClientPoolTrait> LogScanner<P> {
	pub fn new(pool: Arc<P>, resolver: BlockRangeResolver<P>, settings: &ScannerSettings) -> Self {
		Self {
			pool,
			resolver,
			max_span: settings.max_block_range,
			delay: settings.request_delay(),
		}
	}

	/// Fetches logs over an already resolved range.
	#[instrument(skip(self, topics, chain, range), fields(chain = %chain.name, %range))]
	pub async fn scan_range(
		&self,
		address: &str,
		topics: Vec<String>,
		chain: &ChainConfig,
		range: BlockRange,
	) -> Result<Vec<LogEntry>, ScanError> {
		let metadata = || {
			Some(HashMap::from([
				("chain".to_string(), chain.name.clone()),
				("address".to_string(), address.to_string()),
			]))
		};
		let client = self
			.pool
			.get_client(chain)
			.await
			.map_err(|e| ScanError::from_client("no client for chain", e, metadata()))?;

		let plan = WindowPlan::new(range, self.max_span);
		tracing::debug!(windows = plan.total_windows(), "scanning logs");

		let mut logs = Vec::new();
		for window in plan {
			if !window.is_inverted() {
				let batch = client
					.get_logs(address, topics.clone(), window.from, window.to)
					.await
					.map_err(|e| {
						ScanError::from_client(
							format!("eth_getLogs failed for window {}", window),
							e,
							metadata(),
						)
					})?;
				tracing::trace!(%window, found = batch.len(), "window scanned");
				logs.extend(batch);
			}
			tokio::time::sleep(self.delay).await;
		}

		Ok(logs)
	}
}

#[async_trait]
impl<P: ClientPoolTrait> LogScannerTrait for LogScanner<P> {
	async fn scan(
		&self,
		address: &str,
		topics: Vec<String>,
		chain: &ChainConfig,
		days_back: u64,
	) -> Result<Vec<LogEntry>, ScanError> {
		let range = self.resolver.resolve(chain, days_back).await?;
		self.scan_range(address, topics, chain, range).await
	}
}
