//! Core domain models for the bridge monitor.
//!
//! - Chains: connection details and protocol addresses
//! - Monitor configuration: scanner, estimator, pub/sub and check settings
//! - Scan data: block ranges and event logs
//! - Pub/sub messages and the emitted observation records
//! - Static protocol tables (chain identifiers, actor types, event topics)

mod chain;
mod log;
mod monitor;
mod observation;
mod protocol;
mod pubsub;
mod range;

pub use chain::{ChainConfig, ExplorerEndpoint, RpcUrl};
pub use log::LogEntry;
pub use monitor::{
	BlockRateSettings, LookbackSettings, MonitorConfig, PubSubSettings, RangeStrategy,
	ScannerSettings, TopicSettings,
};
pub use observation::{Observation, ObservationBody};
pub use protocol::{
	chain_name_for_id, ActorType, ACTORS_PROPAGATED_TOPIC, CHAIN_IDS, OPERATION_CANCELLED_TOPIC,
	OPERATION_QUEUED_TOPIC,
};
pub use pubsub::{
	ChainSyncState, PubSubEnvelope, PubSubMessage, SoftwareVersions, SyncStateMessage,
};
pub use range::BlockRange;
