//! Bootstrap module for initializing services and selecting checks.
//!
//! This module wires the configuration into the services the checks share and
//! turns the command-line selection into check ids.
//!
//! # Services
//! - `ClientPool`: One RPC client per chain, created on first use
//! - `BlockRateEstimator`: Cached blocks-per-day figures
//! - `ExplorerClient`: Block-by-timestamp and price lookups
//! - `LogScanner`: Paginated log scans over a lookback window
//! - `SubscriptionListener`: The pub/sub receive loop used by the sync-state check

use reqwest_retry::DefaultRetryableStrategy;
use std::{error::Error, sync::Arc};

use crate::{
	models::MonitorConfig,
	services::{
		blockchain::ClientPool,
		blockrate::BlockRateEstimator,
		checks::{CheckId, CheckRegistry, MonitorContext, ObservationSink},
		explorer::ExplorerClient,
		pubsub::{IpfsPubSubTransport, SubscriptionListener},
		scanner::{BlockRangeResolver, LogScanner},
	},
	utils::{create_base_http_client, create_retryable_http_client},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Explorer requests give up after this long
const EXPLORER_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Builds the services shared by every check.
///
/// Nothing is contacted here; RPC clients connect on first use.
pub fn initialize_services(
	config: Arc<MonitorConfig>,
	sink: Arc<dyn ObservationSink>,
) -> Result<MonitorContext<ClientPool>> {
	let pool = Arc::new(ClientPool::new(config.retry.clone()));

	let explorer_http = create_retryable_http_client::<DefaultRetryableStrategy>(
		&config.retry,
		create_base_http_client(Some(EXPLORER_REQUEST_TIMEOUT))?,
		None,
	);
	let explorer = Arc::new(ExplorerClient::new(Arc::new(explorer_http)));

	let estimator = Arc::new(BlockRateEstimator::new(
		config.chains.clone(),
		config.blocks_per_day.clone(),
		pool.clone(),
	));
	let resolver = BlockRangeResolver::new(
		pool.clone(),
		estimator,
		explorer.clone(),
		config.scanner.range_strategy,
	);
	let scanner = Arc::new(LogScanner::new(pool.clone(), resolver, &config.scanner));

	Ok(MonitorContext::new(config, pool, scanner, explorer, sink))
}

/// The full check set, listening on the configured pub/sub node
pub fn create_check_registry(config: &MonitorConfig) -> Result<CheckRegistry<ClientPool>> {
	let transport = IpfsPubSubTransport::new(&config.pubsub.host, config.pubsub.port)?;
	let listener = Arc::new(SubscriptionListener::new(Arc::new(transport)));
	Ok(CheckRegistry::standard(listener))
}

/// Resolves `--checks` values (numbers or names) or `--all` into check ids.
///
/// Duplicates keep their first position.
pub fn select_checks(requested: &[String], all: bool) -> std::result::Result<Vec<CheckId>, String> {
	if all {
		return Ok(CheckId::ALL.to_vec());
	}
	let mut selected = Vec::new();
	for value in requested {
		let id = value.parse::<CheckId>()?;
		if !selected.contains(&id) {
			selected.push(id);
		}
	}
	Ok(selected)
}
