use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use futures::{stream, StreamExt};
use serde_json::json;
use std::sync::Arc;

use pnetwork_monitor::{
	services::{
		blockchain::calls,
		checks::{CheckId, CheckRegistry, HubQueryCheck, PubSubCheck},
		pubsub::{PubSubError, SubscriptionListener},
	},
	utils::tests::builders::MonitorConfigBuilder,
};

use crate::integration::{
	checks::common::{answer_calls, factory, Harness},
	mocks::{
		address_word, create_test_chain, uint_word, MockClientPool, MockEvmClientTrait,
		MockPubSubTransport,
	},
};

fn sync_state_line(sender: &str, chain_id: &str) -> Vec<u8> {
	let payload = json!({
		"syncState": {chain_id: {"latestBlockNumber": 35_000_000, "latestBlockTimestamp": 1_700_000_000}},
		"timestamp": 1_700_000_010,
		"actorType": "guardian",
		"softwareVersions": {"listener": "1.2.0", "processor": "1.3.1"}
	});
	json!({
		"from": sender,
		"data": format!("u{}", URL_SAFE_NO_PAD.encode(payload.to_string())),
		"topicIDs": ["pnetwork-v3"],
	})
	.to_string()
	.into_bytes()
}

fn pubsub_registry(transport: MockPubSubTransport) -> CheckRegistry<MockClientPool> {
	let listener = Arc::new(SubscriptionListener::new(Arc::new(transport)));
	CheckRegistry::new().with(PubSubCheck::new(listener))
}

#[tokio::test]
async fn test_standard_registry_has_every_check() {
	let listener = Arc::new(SubscriptionListener::new(Arc::new(MockPubSubTransport::new())));
	let registry: CheckRegistry<MockClientPool> = CheckRegistry::standard(listener);

	assert_eq!(registry.ids(), CheckId::ALL.to_vec());
}

#[tokio::test]
async fn test_checks_run_in_requested_order() {
	let config = MonitorConfigBuilder::new()
		.add_chain(create_test_chain("bsc"))
		.build();
	let hub = alloy::primitives::Address::repeat_byte(0x33);
	let mut client = MockEvmClientTrait::new();
	answer_calls(
		&mut client,
		vec![
			(factory(), calls::HUB, address_word(hub)),
			(hub, calls::NUMBER_OF_OPERATIONS_IN_QUEUE, uint_word(4)),
			(hub, calls::MAX_OPERATIONS_IN_QUEUE, uint_word(50)),
		],
	);
	let harness = Harness::with_client(config, client);
	let registry = CheckRegistry::new()
		.with(HubQueryCheck::nr_of_ops_in_queue())
		.with(HubQueryCheck::max_ops_in_queue());

	let failed = registry
		.run(&[CheckId::MaxOpsInQueue, CheckId::NrOfOpsInQueue], &harness.ctx)
		.await;

	assert!(failed.is_empty());
	let titles: Vec<String> = harness.records().into_iter().map(|r| r.title).collect();
	assert_eq!(titles, vec!["max_ops_in_queue", "nr_of_ops_in_queue"]);
}

#[tokio::test]
async fn test_unregistered_check_is_reported_and_skipped() {
	let config = MonitorConfigBuilder::new().build();
	let harness = Harness::with_client(config, MockEvmClientTrait::new());
	let registry: CheckRegistry<MockClientPool> = CheckRegistry::new();

	let failed = registry.run(&[CheckId::SlashedActors], &harness.ctx).await;

	assert_eq!(failed, vec![CheckId::SlashedActors]);
	let records = harness.records();
	assert_eq!(records[0].title, "slashed_actors");
	assert_eq!(records[0].to_json()["error_kind"], "config");
}

#[tokio::test]
async fn test_pubsub_check_emits_one_record_per_message() {
	let config = MonitorConfigBuilder::new()
		.pubsub("127.0.0.1", 5001, "pnetwork-v3", 0)
		.build();
	let lines = vec![
		sync_state_line("12D3KooWGuardian", "0x5aca268b"),
		sync_state_line("12D3KooWStranger", "0x00000000"),
	];
	let mut transport = MockPubSubTransport::new();
	transport
		.expect_subscribe()
		.withf(|topic: &str| topic == "pnetwork-v3")
		.returning(move |_| Ok(stream::iter(lines.clone().into_iter().map(Ok)).boxed()));

	let harness = Harness::with_client(config, MockEvmClientTrait::new());
	let failed = pubsub_registry(transport)
		.run(&[CheckId::IpfsSubpubPnetworkTopics], &harness.ctx)
		.await;

	assert!(failed.is_empty());
	let records = harness.records();
	assert_eq!(records.len(), 2);
	assert_eq!(records[0].title, "ipfs_subpub_pnetwork_topics");
	assert_eq!(records[0].field("cid"), Some(&"12D3KooWGuardian".into()));
	assert_eq!(records[0].to_json()["sync_state"][0]["chain_id"], "bsc");
	assert_eq!(records[1].to_json()["error_kind"], "unknown_identifier");
}

#[tokio::test]
async fn test_pubsub_check_fails_when_daemon_is_down() {
	let config = MonitorConfigBuilder::new()
		.pubsub("127.0.0.1", 5001, "pnetwork-v3", 0)
		.build();
	let mut transport = MockPubSubTransport::new();
	transport
		.expect_subscribe()
		.returning(|_| Err(PubSubError::transport_error("connection refused", None, None)));

	let harness = Harness::with_client(config, MockEvmClientTrait::new());
	let failed = pubsub_registry(transport)
		.run(&[CheckId::IpfsSubpubPnetworkTopics], &harness.ctx)
		.await;

	assert_eq!(failed, vec![CheckId::IpfsSubpubPnetworkTopics]);
	assert_eq!(harness.records()[0].to_json()["error_kind"], "transport");
}

#[tokio::test]
async fn test_pubsub_check_rejects_negative_timeout() {
	let config = MonitorConfigBuilder::new()
		.pubsub("127.0.0.1", 5001, "pnetwork-v3", -1)
		.build();
	let mut transport = MockPubSubTransport::new();
	transport.expect_subscribe().never();

	let harness = Harness::with_client(config, MockEvmClientTrait::new());
	let failed = pubsub_registry(transport)
		.run(&[CheckId::IpfsSubpubPnetworkTopics], &harness.ctx)
		.await;

	assert_eq!(failed, vec![CheckId::IpfsSubpubPnetworkTopics]);
	assert_eq!(harness.records()[0].to_json()["error_kind"], "config");
}
