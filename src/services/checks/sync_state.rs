//! Sync-state gossip from the protocol's pub/sub topic.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{chain_name_for_id, Observation, PubSubMessage, SyncStateMessage},
	services::{
		blockchain::ClientPoolTrait,
		checks::{Check, CheckError, CheckId, MonitorContext, ObservationSink},
		pubsub::{MessageHandler, PubSubError, PubSubTransport, SubscriptionListener, SubscriptionState},
	},
};

/// Renders one sync-state message as record fields.
///
/// Every chain identifier must be in the chain table; the first unknown one fails
/// the whole message.
pub fn sync_state_fields(message: &PubSubMessage) -> Result<Value, PubSubError> {
	let state: SyncStateMessage = serde_json::from_slice(&message.payload).map_err(|e| {
		PubSubError::decode_error(
			format!("invalid sync-state message: {}", e),
			Some(Box::new(e)),
			Some(HashMap::from([("sender".to_string(), message.sender.clone())])),
		)
	})?;

	let sync_state = state
		.sync_state
		.iter()
		.map(|(chain_id, chain_state)| {
			let chain = chain_name_for_id(chain_id).ok_or_else(|| {
				PubSubError::unknown_identifier(
					format!("unknown chain id {}", chain_id),
					None,
					Some(HashMap::from([("sender".to_string(), message.sender.clone())])),
				)
			})?;
			Ok(json!({
				"chain_id": chain,
				"latest_block": chain_state.latest_block_number,
				"latest_block_ts": chain_state.latest_block_timestamp,
			}))
		})
		.collect::<Result<Vec<_>, PubSubError>>()?;

	Ok(json!({
		"message_timestamp": state.timestamp,
		"cid": message.sender,
		"actor": state.actor_type,
		"versions": {
			"listener": state.software_versions.listener,
			"processor": state.software_versions.processor,
		},
		"sync_state": sync_state,
	}))
}

/// Emits one record per received message, or an error record when it is unusable
pub struct SyncStateHandler {
	sink: Arc<dyn ObservationSink>,
}

impl SyncStateHandler {
	pub fn new(sink: Arc<dyn ObservationSink>) -> Self {
		Self { sink }
	}
}

#[async_trait]
impl MessageHandler for SyncStateHandler {
	async fn handle(&self, message: PubSubMessage) -> Result<(), PubSubError> {
		let title = CheckId::IpfsSubpubPnetworkTopics.title();
		match sync_state_fields(&message) {
			Ok(fields) => {
				self.sink.emit(Observation::success(title, None, fields));
				Ok(())
			}
			Err(error) => {
				self.sink
					.emit(Observation::failure(title, None, &error, error.kind()));
				Err(error)
			}
		}
	}
}

/// Listens on the configured topic with [`SyncStateHandler`]
pub struct PubSubCheck<T: PubSubTransport + 'static> {
	listener: Arc<SubscriptionListener<T>>,
}

impl<T: PubSubTransport + 'static> PubSubCheck<T> {
	pub fn new(listener: Arc<SubscriptionListener<T>>) -> Self {
		Self { listener }
	}
}

#[async_trait]
impl<P: ClientPoolTrait, T: PubSubTransport + 'static> Check<P> for PubSubCheck<T> {
	fn id(&self) -> CheckId {
		CheckId::IpfsSubpubPnetworkTopics
	}

	/// Timed mode returns once the exit hook has run; unbounded mode waits for the loop to end.
	async fn run(&self, ctx: &MonitorContext<P>) -> Result<(), CheckError> {
		let settings = &ctx.config.pubsub;
		let handler = Arc::new(SyncStateHandler::new(ctx.sink.clone()));
		let handle = self
			.listener
			.subscribe(&settings.topic, handler, settings.timeout_secs)
			.await
			.map_err(|e| CheckError::with_kind(e.kind(), "subscription failed", Some(Box::new(e)), None))?;

		if settings.timeout_secs > 0 {
			return Ok(());
		}
		match handle.await {
			Ok(SubscriptionState::Failed) => Err(CheckError::transport_error(
				format!("subscription to '{}' failed", settings.topic),
				None,
				None,
			)),
			Ok(state) => {
				tracing::info!(topic = %settings.topic, ?state, "subscription ended");
				Ok(())
			}
			Err(e) => Err(CheckError::transport_error(
				"receive loop aborted",
				Some(Box::new(e)),
				None,
			)),
		}
	}
}
