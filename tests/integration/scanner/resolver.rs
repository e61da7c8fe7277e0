use chrono::{TimeZone, Utc};
use mockall::predicate;
use std::sync::Arc;

use pnetwork_monitor::{
	models::{BlockRange, RangeStrategy},
	services::{
		blockrate::BlockRateError,
		explorer::ExplorerError,
		scanner::{BlockRangeResolver, ScanError},
	},
};

use crate::integration::mocks::{
	create_test_chain, pool_with, MockBlockRateEstimator, MockClientPool, MockEvmClientTrait,
	MockExplorerClient,
};

fn head_client(head: u64) -> MockEvmClientTrait {
	let mut client = MockEvmClientTrait::new();
	client.expect_get_latest_block_number().returning(move || Ok(head));
	client
}

fn resolver(
	pool: MockClientPool,
	estimator: MockBlockRateEstimator,
	explorer: MockExplorerClient,
	strategy: RangeStrategy,
) -> BlockRangeResolver<MockClientPool> {
	BlockRangeResolver::new(Arc::new(pool), Arc::new(estimator), Arc::new(explorer), strategy)
}

#[tokio::test]
async fn test_estimate_counts_back_from_head() {
	let mut estimator = MockBlockRateEstimator::new();
	estimator.expect_estimate().times(1).returning(|_| Ok(28_800));

	let resolver = resolver(
		pool_with(head_client(1_000_000)),
		estimator,
		MockExplorerClient::new(),
		RangeStrategy::Estimate,
	);
	let range = resolver.resolve(&create_test_chain("bsc"), 2).await.unwrap();

	assert_eq!(range, BlockRange::clamped(942_400, 1_000_000));
}

#[tokio::test]
async fn test_estimate_stops_at_genesis() {
	let mut estimator = MockBlockRateEstimator::new();
	estimator.expect_estimate().returning(|_| Ok(43_200));

	let resolver = resolver(
		pool_with(head_client(50_000)),
		estimator,
		MockExplorerClient::new(),
		RangeStrategy::Estimate,
	);
	let range = resolver.resolve(&create_test_chain("polygon"), 7).await.unwrap();

	assert_eq!((range.from(), range.to()), (0, 50_000));
}

#[tokio::test]
async fn test_missing_estimate_is_stale_data() {
	let mut estimator = MockBlockRateEstimator::new();
	estimator
		.expect_estimate()
		.returning(|_| Err(BlockRateError::stale_data("no valid blocks-per-day estimate", None, None)));

	let resolver = resolver(
		MockClientPool::new(),
		estimator,
		MockExplorerClient::new(),
		RangeStrategy::Estimate,
	);
	let error = resolver.resolve(&create_test_chain("goerli"), 1).await.unwrap_err();

	assert!(matches!(error, ScanError::StaleData(_)));
}

#[tokio::test]
async fn test_lookup_uses_midnight_and_now() {
	let now = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
	let midnight = Utc.with_ymd_and_hms(2023, 11, 13, 0, 0, 0).unwrap();

	let mut explorer = MockExplorerClient::new();
	explorer
		.expect_block_by_timestamp()
		.with(predicate::always(), predicate::eq(midnight.timestamp()))
		.times(1)
		.returning(|_, _| Ok(33_400_000));
	explorer
		.expect_block_by_timestamp()
		.with(predicate::always(), predicate::eq(now.timestamp()))
		.times(1)
		.returning(|_, _| Ok(33_450_000));

	let resolver = resolver(
		MockClientPool::new(),
		MockBlockRateEstimator::new(),
		explorer,
		RangeStrategy::ExplorerLookup,
	);
	let range = resolver
		.resolve_at(&create_test_chain("bsc"), 1, now)
		.await
		.unwrap();

	assert_eq!(range, BlockRange::clamped(33_400_000, 33_450_000));
}

#[tokio::test]
async fn test_lookup_clamps_inverted_answers() {
	let now = Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 5).unwrap();
	let mut explorer = MockExplorerClient::new();
	let mut answers = vec![120, 100].into_iter();
	explorer
		.expect_block_by_timestamp()
		.times(2)
		.returning(move |_, _| Ok(answers.next().unwrap_or_default()));

	let resolver = resolver(
		MockClientPool::new(),
		MockBlockRateEstimator::new(),
		explorer,
		RangeStrategy::ExplorerLookup,
	);
	let range = resolver
		.resolve_at(&create_test_chain("eth"), 0, now)
		.await
		.unwrap();

	assert_eq!((range.from(), range.to()), (100, 100));
}

#[tokio::test]
async fn test_lookup_decode_failure_is_a_decode_error() {
	let mut explorer = MockExplorerClient::new();
	explorer
		.expect_block_by_timestamp()
		.returning(|_, _| Err(ExplorerError::decode_error("result is not a block number", None, None)));

	let resolver = resolver(
		MockClientPool::new(),
		MockBlockRateEstimator::new(),
		explorer,
		RangeStrategy::ExplorerLookup,
	);
	let error = resolver.resolve(&create_test_chain("bsc"), 1).await.unwrap_err();

	assert!(matches!(error, ScanError::DecodeError(_)));
}
