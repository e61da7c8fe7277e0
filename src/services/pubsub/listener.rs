//! Topic subscription listener.
//!
//! Each subscribed topic gets one background receive loop. The caller picks the run
//! policy through [`ListenTimeout`]: return immediately and let the loop run, or
//! block for a fixed time and then terminate the process through the exit hook.

use async_trait::async_trait;
use futures::StreamExt;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
	models::PubSubMessage,
	services::pubsub::{
		codec::decode_envelope, PubSubError, PubSubTransport, SubscriptionRegistry,
		SubscriptionState,
	},
};

/// Called for every decoded message of a topic
#[async_trait]
pub trait MessageHandler: Send + Sync {
	async fn handle(&self, message: PubSubMessage) -> Result<(), PubSubError>;
}

/// Invoked with the exit code once a timed subscription expires
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// How long `subscribe` keeps the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTimeout {
	/// Return right away; the loop runs until unsubscribed or the stream ends
	Unbounded,
	/// Block for the duration, then exit the process
	Timed(Duration),
}

impl ListenTimeout {
	/// `0` is unbounded, a positive value is a timeout in seconds and a negative
	/// value is rejected.
	pub fn from_secs(secs: i64) -> Result<Self, PubSubError> {
		match secs {
			0 => Ok(Self::Unbounded),
			secs if secs > 0 => Ok(Self::Timed(Duration::from_secs(secs.unsigned_abs()))),
			secs => Err(PubSubError::invalid_timeout(
				format!("subscription timeout must not be negative, got {}", secs),
				None,
				None,
			)),
		}
	}
}

pub struct SubscriptionListener<T: PubSubTransport + 'static> {
	transport: Arc<T>,
	registry: SubscriptionRegistry,
	exit_hook: ExitHook,
}

impl<T: PubSubTransport + 'static> SubscriptionListener<T> {
	/// Listener whose timed subscriptions end the process with `std::process::exit(0)`
	pub fn new(transport: Arc<T>) -> Self {
		Self::with_exit_hook(transport, Arc::new(|code| std::process::exit(code)))
	}

	pub fn with_exit_hook(transport: Arc<T>, exit_hook: ExitHook) -> Self {
		Self {
			transport,
			registry: SubscriptionRegistry::new(),
			exit_hook,
		}
	}

	pub async fn state(&self, topic: &str) -> Option<SubscriptionState> {
		self.registry.state(topic).await
	}

	/// Stops the topic's receive loop without waiting for another message
	pub async fn unsubscribe(&self, topic: &str) -> bool {
		self.registry.stop(topic).await
	}

	/// Starts the receive loop for `topic`.
	///
	/// With a zero timeout this returns as soon as the loop is spawned. With a
	/// positive timeout it waits that long, marks the topic timed out and calls the
	/// exit hook with code 0. A negative timeout fails before anything is spawned.
	pub async fn subscribe(
		&self,
		topic: &str,
		handler: Arc<dyn MessageHandler>,
		timeout_secs: i64,
	) -> Result<JoinHandle<SubscriptionState>, PubSubError> {
		let timeout = match ListenTimeout::from_secs(timeout_secs) {
			Ok(timeout) => timeout,
			Err(e) => {
				if !self.registry.state(topic).await.is_some_and(SubscriptionState::is_active) {
					self.registry.record(topic, SubscriptionState::Failed).await;
				}
				return Err(e);
			}
		};

		let stop = self.registry.register(topic).await?;
		let handle = tokio::spawn(receive_loop(
			self.transport.clone(),
			self.registry.clone(),
			topic.to_string(),
			handler,
			stop,
		));
		tracing::info!(topic, ?timeout, "subscribed");

		if let ListenTimeout::Timed(duration) = timeout {
			tokio::time::sleep(duration).await;
			tracing::info!(topic, secs = duration.as_secs(), "subscription timed out, exiting");
			self.registry.set_state(topic, SubscriptionState::TimedOut).await;
			(self.exit_hook)(0);
		}
		Ok(handle)
	}
}

async fn receive_loop<T: PubSubTransport>(
	transport: Arc<T>,
	registry: SubscriptionRegistry,
	topic: String,
	handler: Arc<dyn MessageHandler>,
	mut stop: watch::Receiver<bool>,
) -> SubscriptionState {
	let final_state = run(transport, &registry, &topic, handler, &mut stop).await;
	// A timed-out topic keeps its state
	if registry.state(&topic).await != Some(SubscriptionState::TimedOut) {
		registry.set_state(&topic, final_state).await;
	}
	tracing::info!(topic = %topic, state = ?final_state, "receive loop ended");
	final_state
}

async fn run<T: PubSubTransport>(
	transport: Arc<T>,
	registry: &SubscriptionRegistry,
	topic: &str,
	handler: Arc<dyn MessageHandler>,
	stop: &mut watch::Receiver<bool>,
) -> SubscriptionState {
	let mut lines = match transport.subscribe(topic).await {
		Ok(lines) => lines,
		Err(e) => {
			tracing::error!(topic, error = %e, "subscription failed");
			return SubscriptionState::Failed;
		}
	};
	registry.set_state(topic, SubscriptionState::Listening).await;

	loop {
		tokio::select! {
			changed = stop.changed() => {
				if changed.is_err() || *stop.borrow() {
					return SubscriptionState::Stopped;
				}
			}
			line = lines.next() => match line {
				None => return SubscriptionState::Stopped,
				Some(Err(e)) => {
					tracing::error!(topic, error = %e, "pub/sub stream failed");
					return SubscriptionState::Failed;
				}
				Some(Ok(line)) => {
					let message = match decode_envelope(&line) {
						Ok(message) => message,
						Err(e) => {
							tracing::warn!(topic, error = %e, "skipping malformed envelope");
							continue;
						}
					};
					let sender = message.sender.clone();
					if let Err(e) = handler.handle(message).await {
						tracing::warn!(topic, %sender, error = %e, "message handler failed");
					}
				}
			}
		}
	}
}
