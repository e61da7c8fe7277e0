use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A decoded pub/sub message handed to subscription callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubMessage {
	pub payload: Vec<u8>,
	/// Peer identifier of the publisher
	pub sender: String,
}

/// One line of the IPFS `pubsub/sub` stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PubSubEnvelope {
	/// Multibase-encoded payload
	pub data: String,
	pub from: String,
	#[serde(default)]
	pub seqno: Option<String>,
	#[serde(rename = "topicIDs", default)]
	pub topic_ids: Vec<String>,
}

/// Status gossip published by pNetwork nodes on the protocol topic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStateMessage {
	/// Keyed by pNetwork chain identifier
	pub sync_state: BTreeMap<String, ChainSyncState>,
	pub timestamp: i64,
	pub actor_type: String,
	pub software_versions: SoftwareVersions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSyncState {
	pub latest_block_number: u64,
	pub latest_block_timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SoftwareVersions {
	pub listener: String,
	pub processor: String,
}
