use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use futures::{stream, StreamExt};
use std::{
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use pnetwork_monitor::{
	models::PubSubMessage,
	services::pubsub::{
		ExitHook, MessageHandler, PubSubError, SubscriptionListener, SubscriptionState,
	},
};

use crate::integration::mocks::MockPubSubTransport;

const TOPIC: &str = "pnetwork-v3";

#[derive(Default)]
struct RecordingHandler {
	messages: Mutex<Vec<PubSubMessage>>,
	fail: bool,
}

#[async_trait]
impl MessageHandler for RecordingHandler {
	async fn handle(&self, message: PubSubMessage) -> Result<(), PubSubError> {
		self.messages.lock().unwrap().push(message);
		if self.fail {
			return Err(PubSubError::decode_error("handler rejected message", None, None));
		}
		Ok(())
	}
}

fn envelope(sender: &str, payload: &str) -> Vec<u8> {
	format!(
		r#"{{"from":"{}","data":"u{}","topicIDs":["{}"]}}"#,
		sender,
		URL_SAFE_NO_PAD.encode(payload),
		TOPIC
	)
	.into_bytes()
}

fn finite_transport(lines: Vec<Vec<u8>>) -> MockPubSubTransport {
	let mut transport = MockPubSubTransport::new();
	transport
		.expect_subscribe()
		.times(1)
		.returning(move |_| Ok(stream::iter(lines.clone().into_iter().map(Ok)).boxed()));
	transport
}

fn endless_transport() -> MockPubSubTransport {
	let mut transport = MockPubSubTransport::new();
	transport
		.expect_subscribe()
		.times(1)
		.returning(|_| Ok(stream::pending().boxed()));
	transport
}

fn recording_exit_hook() -> (ExitHook, Arc<Mutex<Vec<i32>>>) {
	let codes = Arc::new(Mutex::new(Vec::new()));
	let recorded = codes.clone();
	let hook: ExitHook = Arc::new(move |code| recorded.lock().unwrap().push(code));
	(hook, codes)
}

#[tokio::test]
async fn test_messages_reach_the_handler_in_order() {
	let transport = finite_transport(vec![
		envelope("12D3KooWA", "first"),
		b"{not an envelope".to_vec(),
		envelope("12D3KooWB", "second"),
	]);
	let listener = SubscriptionListener::new(Arc::new(transport));
	let handler = Arc::new(RecordingHandler::default());

	let handle = listener.subscribe(TOPIC, handler.clone(), 0).await.unwrap();
	assert_eq!(handle.await.unwrap(), SubscriptionState::Stopped);

	let messages = handler.messages.lock().unwrap();
	assert_eq!(messages.len(), 2);
	assert_eq!(messages[0].sender, "12D3KooWA");
	assert_eq!(messages[0].payload, b"first");
	assert_eq!(messages[1].payload, b"second");
	drop(messages);
	assert_eq!(listener.state(TOPIC).await, Some(SubscriptionState::Stopped));
}

#[tokio::test]
async fn test_handler_errors_do_not_end_the_loop() {
	let transport = finite_transport(vec![envelope("a", "1"), envelope("b", "2")]);
	let listener = SubscriptionListener::new(Arc::new(transport));
	let handler = Arc::new(RecordingHandler {
		fail: true,
		..RecordingHandler::default()
	});

	let handle = listener.subscribe(TOPIC, handler.clone(), 0).await.unwrap();
	assert_eq!(handle.await.unwrap(), SubscriptionState::Stopped);
	assert_eq!(handler.messages.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_subscribe_on_active_topic_is_rejected() {
	let listener = SubscriptionListener::new(Arc::new(endless_transport()));
	let handler = Arc::new(RecordingHandler::default());

	let handle = listener.subscribe(TOPIC, handler.clone(), 0).await.unwrap();
	let error = listener.subscribe(TOPIC, handler, 0).await.unwrap_err();
	assert!(matches!(error, PubSubError::AlreadySubscribed(_)));

	assert!(listener.unsubscribe(TOPIC).await);
	assert_eq!(handle.await.unwrap(), SubscriptionState::Stopped);
}

#[tokio::test]
async fn test_timed_subscription_calls_exit_hook() {
	let started = Instant::now();
	let exits = Arc::new(Mutex::new(Vec::new()));
	let recorded = exits.clone();
	let hook: ExitHook =
		Arc::new(move |code| recorded.lock().unwrap().push((code, started.elapsed())));
	let listener = SubscriptionListener::with_exit_hook(Arc::new(endless_transport()), hook);

	let _handle = listener
		.subscribe(TOPIC, Arc::new(RecordingHandler::default()), 1)
		.await
		.unwrap();

	let exits = exits.lock().unwrap().clone();
	assert_eq!(exits.len(), 1);
	let (code, elapsed) = exits[0];
	assert_eq!(code, 0);
	assert!(elapsed >= Duration::from_secs(1), "exited after {:?}", elapsed);
	assert_eq!(listener.state(TOPIC).await, Some(SubscriptionState::TimedOut));
}

#[tokio::test]
async fn test_negative_timeout_fails_without_subscribing() {
	let mut transport = MockPubSubTransport::new();
	transport.expect_subscribe().never();
	let (hook, codes) = recording_exit_hook();
	let listener = SubscriptionListener::with_exit_hook(Arc::new(transport), hook);

	let error = listener
		.subscribe(TOPIC, Arc::new(RecordingHandler::default()), -5)
		.await
		.unwrap_err();

	assert!(matches!(error, PubSubError::InvalidTimeout(_)));
	assert_eq!(listener.state(TOPIC).await, Some(SubscriptionState::Failed));
	assert!(codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failure_ends_in_failed_state() {
	let mut transport = MockPubSubTransport::new();
	transport
		.expect_subscribe()
		.returning(|_| Err(PubSubError::transport_error("connection refused", None, None)));
	let listener = SubscriptionListener::new(Arc::new(transport));

	let handle = listener
		.subscribe(TOPIC, Arc::new(RecordingHandler::default()), 0)
		.await
		.unwrap();

	assert_eq!(handle.await.unwrap(), SubscriptionState::Failed);
	assert_eq!(listener.state(TOPIC).await, Some(SubscriptionState::Failed));
}

#[tokio::test]
async fn test_stopped_topic_can_be_subscribed_again() {
	let mut transport = MockPubSubTransport::new();
	transport
		.expect_subscribe()
		.times(2)
		.returning(|_| Ok(stream::empty().boxed()));
	let listener = SubscriptionListener::new(Arc::new(transport));
	let handler = Arc::new(RecordingHandler::default());

	let first = listener.subscribe(TOPIC, handler.clone(), 0).await.unwrap();
	assert_eq!(first.await.unwrap(), SubscriptionState::Stopped);

	let second = listener.subscribe(TOPIC, handler, 0).await.unwrap();
	assert_eq!(second.await.unwrap(), SubscriptionState::Stopped);
}
