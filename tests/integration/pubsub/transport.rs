use futures::StreamExt;
use mockito::{Matcher, Server};

use pnetwork_monitor::services::pubsub::{
	decode_envelope, IpfsPubSubTransport, PubSubError, PubSubTransport,
};

#[tokio::test]
async fn test_subscribe_streams_envelope_lines() {
	let mut server = Server::new_async().await;
	let body = concat!(
		r#"{"from":"12D3KooWA","data":"uaGVsbG8","seqno":"uAAE","topicIDs":["ucG5ldHdvcmstdjM"]}"#,
		"\n",
		r#"{"from":"12D3KooWB","data":"md29ybGQ","topicIDs":["ucG5ldHdvcmstdjM"]}"#,
		"\n"
	);
	let mock = server
		.mock("POST", "/api/v0/pubsub/sub")
		.match_query(Matcher::UrlEncoded("arg".into(), "ucG5ldHdvcmstdjM".into()))
		.with_status(200)
		.with_body(body)
		.create_async()
		.await;

	let transport = IpfsPubSubTransport::with_base_url(&server.url()).unwrap();
	let lines: Vec<Vec<u8>> = transport
		.subscribe("pnetwork-v3")
		.await
		.unwrap()
		.map(|line| line.unwrap())
		.collect()
		.await;

	assert_eq!(lines.len(), 2);
	let first = decode_envelope(&lines[0]).unwrap();
	assert_eq!((first.sender.as_str(), first.payload.as_slice()), ("12D3KooWA", b"hello".as_slice()));
	let second = decode_envelope(&lines[1]).unwrap();
	assert_eq!(second.payload, b"world");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_subscription_is_a_transport_error() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/api/v0/pubsub/sub")
		.match_query(Matcher::Any)
		.with_status(500)
		.with_body("pubsub not enabled")
		.create_async()
		.await;

	let transport = IpfsPubSubTransport::with_base_url(&server.url()).unwrap();
	let error = transport.subscribe("pnetwork-v3").await.err().unwrap();

	assert!(matches!(error, PubSubError::TransportError(_)));
	assert!(error.to_string().contains("pubsub not enabled"));
}

#[tokio::test]
async fn test_unreachable_daemon_is_a_transport_error() {
	// nothing listens on the discard port
	let transport = IpfsPubSubTransport::new("127.0.0.1", 9).unwrap();
	let error = transport.subscribe("pnetwork-v3").await.err().unwrap();

	assert!(matches!(error, PubSubError::TransportError(_)));
}
