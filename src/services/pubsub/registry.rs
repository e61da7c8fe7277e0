//! Per-topic subscription bookkeeping.

use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{watch, RwLock};

use crate::services::pubsub::PubSubError;

/// Lifecycle of one topic subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
	Idle,
	Subscribing,
	Listening,
	Stopped,
	TimedOut,
	Failed,
}

impl SubscriptionState {
	/// A receive loop owns the topic in this state
	pub fn is_active(self) -> bool {
		matches!(self, Self::Subscribing | Self::Listening)
	}
}

#[derive(Debug)]
struct Subscription {
	state: SubscriptionState,
	stop: watch::Sender<bool>,
}

/// Topic to subscription map shared by the listener and its receive loops
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
	subscriptions: Arc<RwLock<HashMap<String, Subscription>>>,
}

impl SubscriptionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Claims `topic` for a new receive loop and returns its stop signal.
	///
	/// Fails while another loop is active on the topic. A stopped or failed topic
	/// can be claimed again.
	pub async fn register(&self, topic: &str) -> Result<watch::Receiver<bool>, PubSubError> {
		let mut subscriptions = self.subscriptions.write().await;
		if let Some(existing) = subscriptions.get(topic) {
			if existing.state.is_active() {
				return Err(PubSubError::already_subscribed(
					format!("topic '{}' already has a receive loop", topic),
					None,
					Some(HashMap::from([(
						"state".to_string(),
						format!("{:?}", existing.state),
					)])),
				));
			}
		}

		let (stop, stop_rx) = watch::channel(false);
		subscriptions.insert(
			topic.to_string(),
			Subscription {
				state: SubscriptionState::Subscribing,
				stop,
			},
		);
		Ok(stop_rx)
	}

	/// Records a terminal state for a topic that never got a loop
	pub async fn record(&self, topic: &str, state: SubscriptionState) {
		let mut subscriptions = self.subscriptions.write().await;
		match subscriptions.get_mut(topic) {
			Some(subscription) => subscription.state = state,
			None => {
				let (stop, _) = watch::channel(false);
				subscriptions.insert(topic.to_string(), Subscription { state, stop });
			}
		}
	}

	pub async fn set_state(&self, topic: &str, state: SubscriptionState) {
		if let Some(subscription) = self.subscriptions.write().await.get_mut(topic) {
			tracing::debug!(topic, from = ?subscription.state, to = ?state, "subscription state change");
			subscription.state = state;
		}
	}

	pub async fn state(&self, topic: &str) -> Option<SubscriptionState> {
		self.subscriptions
			.read()
			.await
			.get(topic)
			.map(|subscription| subscription.state)
	}

	/// Signals the topic's loop to stop. Returns `false` if no loop is active.
	pub async fn stop(&self, topic: &str) -> bool {
		let subscriptions = self.subscriptions.read().await;
		match subscriptions.get(topic) {
			Some(subscription) if subscription.state.is_active() => {
				subscription.stop.send_replace(true);
				true
			}
			_ => false,
		}
	}
}
