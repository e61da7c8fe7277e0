use mockito::{Matcher, Server};
use serde_json::json;

use pnetwork_monitor::{
	services::blockchain::{BlockchainTransport, HttpTransportClient},
	utils::{JitterSetting, RetryConfig},
};

use crate::integration::mocks::{create_chain_id_mock, create_test_chain_with_urls};

fn no_retries() -> RetryConfig {
	RetryConfig {
		max_retries: 0,
		jitter: JitterSetting::None,
		..RetryConfig::default()
	}
}

#[tokio::test]
async fn test_connects_to_highest_weight_endpoint() {
	let mut primary = Server::new_async().await;
	let mut secondary = Server::new_async().await;
	let primary_probe = create_chain_id_mock(&mut primary);
	let secondary_probe = secondary.mock("POST", "/").expect(0).create();

	let chain = create_test_chain_with_urls("bsc", vec![&primary.url(), &secondary.url()]);
	let transport = HttpTransportClient::new(&chain, &no_retries(), None)
		.await
		.unwrap();

	assert_eq!(transport.get_current_url().await, primary.url());
	primary_probe.assert();
	secondary_probe.assert();
}

#[tokio::test]
async fn test_falls_back_when_primary_is_down() {
	let mut primary = Server::new_async().await;
	let mut secondary = Server::new_async().await;
	primary.mock("POST", "/").with_status(503).create();
	create_chain_id_mock(&mut secondary);

	let chain = create_test_chain_with_urls("polygon", vec![&primary.url(), &secondary.url()]);
	let transport = HttpTransportClient::new(&chain, &no_retries(), None)
		.await
		.unwrap();

	assert_eq!(transport.get_current_url().await, secondary.url());
}

#[tokio::test]
async fn test_all_endpoints_down() {
	let mut primary = Server::new_async().await;
	let mut secondary = Server::new_async().await;
	primary.mock("POST", "/").with_status(500).create();
	secondary.mock("POST", "/").with_status(500).create();

	let chain = create_test_chain_with_urls("eth", vec![&primary.url(), &secondary.url()]);
	let error = HttpTransportClient::new(&chain, &no_retries(), None)
		.await
		.unwrap_err();

	assert!(error.to_string().contains("All RPC URLs failed to connect"));
}

#[tokio::test]
async fn test_malformed_url_is_skipped() {
	let mut server = Server::new_async().await;
	create_chain_id_mock(&mut server);

	let chain = create_test_chain_with_urls("arbitrum", vec!["not a url", &server.url()]);
	let transport = HttpTransportClient::new(&chain, &no_retries(), None)
		.await
		.unwrap();

	assert_eq!(transport.get_current_url().await, server.url());
}

#[tokio::test]
async fn test_custom_probe_payload() {
	let mut server = Server::new_async().await;
	let probe = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "net_version"})))
		.with_status(200)
		.with_body(r#"{"jsonrpc": "2.0", "id": 1, "result": "56"}"#)
		.create();

	let chain = create_test_chain_with_urls("bsc", vec![&server.url()]);
	let payload = r#"{"jsonrpc": "2.0", "id": 1, "method": "net_version", "params": []}"#;
	HttpTransportClient::new(&chain, &no_retries(), Some(payload.to_string()))
		.await
		.unwrap();

	probe.assert();
}

#[tokio::test]
async fn test_invalid_probe_payload() {
	let chain = create_test_chain_with_urls("bsc", vec!["http://localhost:1"]);
	let error = HttpTransportClient::new(&chain, &no_retries(), Some("{".to_string()))
		.await
		.unwrap_err();

	assert!(error.to_string().contains("probe payload"));
}

#[tokio::test]
async fn test_requests_use_connected_endpoint() {
	let mut server = Server::new_async().await;
	create_chain_id_mock(&mut server);
	let block = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc": "2.0", "id": 1, "result": "0x10"}"#)
		.create();

	let chain = create_test_chain_with_urls("bsc", vec![&server.url()]);
	let transport = HttpTransportClient::new(&chain, &no_retries(), None)
		.await
		.unwrap();
	let response = transport
		.send_raw_request("eth_blockNumber", Some(json!([])))
		.await
		.unwrap();

	assert_eq!(response["result"], "0x10");
	block.assert();
}
