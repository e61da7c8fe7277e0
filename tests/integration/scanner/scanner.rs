use alloy::primitives::Address;
use mockall::{predicate, Sequence};
use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use pnetwork_monitor::{
	models::{BlockRange, RangeStrategy, ScannerSettings, OPERATION_QUEUED_TOPIC},
	services::scanner::{BlockRangeResolver, LogScanner, LogScannerTrait, ScanError},
};

use crate::integration::mocks::{
	create_log, create_test_chain, pool_with, MockBlockRateEstimator, MockClientPool,
	MockEvmClientTrait, MockExplorerClient,
};

const HUB: &str = "0xd2bac275fffdbdd23ecea72f4b161b3af90300a3";

fn settings(delay_ms: u64) -> ScannerSettings {
	ScannerSettings {
		max_block_range: 9_999,
		request_delay_ms: delay_ms,
		range_strategy: RangeStrategy::Estimate,
	}
}

fn scanner(pool: MockClientPool, estimator: MockBlockRateEstimator, delay_ms: u64) -> LogScanner<MockClientPool> {
	let pool = Arc::new(pool);
	let resolver = BlockRangeResolver::new(
		pool.clone(),
		Arc::new(estimator),
		Arc::new(MockExplorerClient::new()),
		RangeStrategy::Estimate,
	);
	LogScanner::new(pool, resolver, &settings(delay_ms))
}

fn expect_window(client: &mut MockEvmClientTrait, seq: &mut Sequence, from: u64, to: u64, found: usize) {
	client
		.expect_get_logs()
		.with(
			predicate::eq(HUB),
			predicate::always(),
			predicate::eq(from),
			predicate::eq(to),
		)
		.times(1)
		.in_sequence(seq)
		.returning(move |_, _, from, _| {
			Ok((0..found)
				.map(|i| create_log(Address::ZERO, from + i as u64, Vec::new(), Vec::new()))
				.collect())
		});
}

#[tokio::test]
async fn test_one_day_is_split_into_provider_sized_windows() {
	let mut seq = Sequence::new();
	let mut client = MockEvmClientTrait::new();
	client.expect_get_latest_block_number().returning(|| Ok(25_000));
	expect_window(&mut client, &mut seq, 0, 9_999, 2);
	expect_window(&mut client, &mut seq, 9_999, 19_998, 0);
	expect_window(&mut client, &mut seq, 19_998, 25_000, 1);

	let mut estimator = MockBlockRateEstimator::new();
	estimator.expect_estimate().returning(|_| Ok(25_000));

	let scanner = scanner(pool_with(client), estimator, 0);
	let logs = scanner
		.scan(HUB, vec![OPERATION_QUEUED_TOPIC.to_string()], &create_test_chain("bsc"), 1)
		.await
		.unwrap();

	let blocks: Vec<u64> = logs.iter().filter_map(|log| log.block_number()).collect();
	assert_eq!(blocks, vec![0, 1, 19_998]);
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
	let mut client = MockEvmClientTrait::new();
	client.expect_get_logs().returning(|_, _, _, _| Ok(Vec::new()));

	let scanner = scanner(pool_with(client), MockBlockRateEstimator::new(), 0);
	let logs = scanner
		.scan_range(HUB, Vec::new(), &create_test_chain("polygon"), BlockRange::clamped(100, 5_000))
		.await
		.unwrap();

	assert!(logs.is_empty());
}

#[tokio::test]
async fn test_failed_window_aborts_the_scan() {
	let mut seq = Sequence::new();
	let mut client = MockEvmClientTrait::new();
	expect_window(&mut client, &mut seq, 0, 9_999, 3);
	client
		.expect_get_logs()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_, _, _, _| Err(anyhow::anyhow!("connection reset")));

	let scanner = scanner(pool_with(client), MockBlockRateEstimator::new(), 0);
	let error = scanner
		.scan_range(HUB, Vec::new(), &create_test_chain("eth"), BlockRange::clamped(0, 25_000))
		.await
		.unwrap_err();

	assert!(matches!(error, ScanError::TransportError(_)));
}

#[tokio::test]
async fn test_every_window_is_followed_by_the_delay() {
	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_logs()
		.times(3)
		.returning(|_, _, _, _| Ok(Vec::new()));

	let scanner = scanner(pool_with(client), MockBlockRateEstimator::new(), 20);
	let started = Instant::now();
	scanner
		.scan_range(HUB, Vec::new(), &create_test_chain("bsc"), BlockRange::clamped(0, 25_000))
		.await
		.unwrap();

	// three requests plus the skipped overshoot window
	assert!(started.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_client_error_stops_before_any_request() {
	let mut pool = MockClientPool::new();
	pool.expect_get_client()
		.returning(|_| Err(anyhow::anyhow!("All RPC URLs failed to connect")));

	let scanner = scanner(pool, MockBlockRateEstimator::new(), 0);
	let error = scanner
		.scan_range(HUB, Vec::new(), &create_test_chain("bsc"), BlockRange::clamped(0, 10))
		.await
		.unwrap_err();

	assert!(matches!(error, ScanError::TransportError(_)));
}
