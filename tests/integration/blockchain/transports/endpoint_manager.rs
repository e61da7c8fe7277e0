use mockito::Server;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::json;
use std::time::Duration;

use pnetwork_monitor::services::blockchain::{EndpointManager, TransportError};

use crate::integration::mocks::ProbingTransport;

fn plain_client() -> ClientWithMiddleware {
	ClientBuilder::new(reqwest::Client::new()).build()
}

const SUCCESS_BODY: &str = r#"{"jsonrpc": "2.0", "id": 1, "result": "0x38"}"#;

#[tokio::test]
async fn test_rotation_promotes_first_fallback() {
	let active = Server::new_async().await;
	let mut first = Server::new_async().await;
	let second = Server::new_async().await;
	let probe = first.mock("GET", "/").with_status(200).create_async().await;

	let manager = EndpointManager::new(
		plain_client(),
		&active.url(),
		vec![first.url(), second.url()],
	);

	let promoted = manager.try_rotate_url(&ProbingTransport::new()).await.unwrap();

	assert_eq!(promoted, first.url());
	assert_eq!(*manager.active_url.read().await, first.url());
	// the demoted endpoint goes to the back of the queue
	assert_eq!(
		*manager.fallback_urls.read().await,
		vec![second.url(), active.url()]
	);
	probe.assert_async().await;
}

#[tokio::test]
async fn test_request_goes_to_active_url() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(mockito::Matcher::PartialJson(json!({"method": "eth_chainId"})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(SUCCESS_BODY)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
	let response = manager
		.send_raw_request(&ProbingTransport::new(), "eth_chainId", None::<serde_json::Value>)
		.await
		.unwrap();

	assert_eq!(response["result"], "0x38");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_rotates_and_replays() {
	let mut limited = Server::new_async().await;
	let mut fallback = Server::new_async().await;
	let limited_mock = limited
		.mock("POST", "/")
		.with_status(429)
		.with_body("slow down")
		.expect(1)
		.create_async()
		.await;
	let fallback_mock = fallback
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(SUCCESS_BODY)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &limited.url(), vec![fallback.url()]);
	let response = manager
		.send_raw_request(&ProbingTransport::new(), "eth_blockNumber", Some(json!([])))
		.await
		.unwrap();

	assert_eq!(response["result"], "0x38");
	assert_eq!(*manager.active_url.read().await, fallback.url());
	limited_mock.assert_async().await;
	fallback_mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_without_fallback_is_an_http_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(429)
		.with_body("slow down")
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
	let result = manager
		.send_raw_request(&ProbingTransport::new(), "eth_blockNumber", Some(json!([])))
		.await;

	match result {
		Err(TransportError::Http { status_code, .. }) => assert_eq!(status_code.as_u16(), 429),
		other => panic!("expected HTTP error, got {:?}", other),
	}
	mock.assert_async().await;
}

#[tokio::test]
async fn test_every_endpoint_rate_limited_fails_after_one_pass() {
	let mut first = Server::new_async().await;
	let mut second = Server::new_async().await;
	let first_mock = first
		.mock("POST", "/")
		.with_status(429)
		.expect(1)
		.create_async()
		.await;
	let second_mock = second
		.mock("POST", "/")
		.with_status(429)
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &first.url(), vec![second.url()]);
	let result = tokio::time::timeout(
		Duration::from_secs(10),
		manager.send_raw_request(&ProbingTransport::new(), "eth_getLogs", Some(json!([]))),
	)
	.await
	.expect("request settles once both endpoints refused it");

	match result {
		Err(TransportError::Http { status_code, .. }) => assert_eq!(status_code.as_u16(), 429),
		other => panic!("expected HTTP error, got {:?}", other),
	}
	first_mock.assert_async().await;
	second_mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_does_not_rotate() {
	let mut server = Server::new_async().await;
	let fallback = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(400)
		.with_body("bad request")
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![fallback.url()]);
	let result = manager
		.send_raw_request(&ProbingTransport::new(), "eth_getLogs", Some(json!([])))
		.await;

	assert!(matches!(result, Err(TransportError::Http { .. })));
	assert_eq!(*manager.active_url.read().await, server.url());
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rpc_error_object_is_surfaced() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			r#"{"jsonrpc": "2.0", "id": 1, "error": {"code": -32005, "message": "query returned more than 10000 results"}}"#,
		)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
	let result = manager
		.send_raw_request(&ProbingTransport::new(), "eth_getLogs", Some(json!([])))
		.await;

	match result {
		Err(TransportError::Rpc { code, context }) => {
			assert_eq!(code, -32005);
			assert!(context.message.contains("10000 results"));
		}
		other => panic!("expected RPC error, got {:?}", other),
	}
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(200)
		.with_body("not json")
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
	let result = manager
		.send_raw_request(&ProbingTransport::new(), "eth_chainId", None::<serde_json::Value>)
		.await;

	assert!(matches!(result, Err(TransportError::ResponseParse(_))));
}

#[tokio::test]
async fn test_failed_switch_keeps_active_url() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(429)
		.create_async()
		.await;

	let fallback = "http://fallback.invalid".to_string();
	let manager = EndpointManager::new(plain_client(), &server.url(), vec![fallback.clone()]);
	let transport = ProbingTransport::refusing_switch(&server.url());

	let rotation = manager.try_rotate_url(&transport).await;
	assert!(matches!(rotation, Err(TransportError::UrlRotation(_))));
	assert_eq!(*manager.active_url.read().await, server.url());
	assert_eq!(*manager.fallback_urls.read().await, vec![fallback]);

	let result = manager
		.send_raw_request(&transport, "eth_blockNumber", Some(json!([])))
		.await;
	assert!(matches!(result, Err(TransportError::Http { .. })));
}
