//! Domain models and data structures for the bridge monitor.
//!
//! - `config`: Configuration loading and validation
//! - `core`: Chains, monitor settings, scan data, pub/sub messages and observations
//! - `security`: Secret values resolved from the configuration

mod config;
mod core;
mod security;

pub use core::{
	chain_name_for_id, ActorType, BlockRange, BlockRateSettings, ChainConfig, ChainSyncState,
	ExplorerEndpoint, LogEntry, LookbackSettings, MonitorConfig, Observation, ObservationBody,
	PubSubEnvelope, PubSubMessage, PubSubSettings, RangeStrategy, RpcUrl, ScannerSettings,
	SoftwareVersions, SyncStateMessage, TopicSettings, ACTORS_PROPAGATED_TOPIC, CHAIN_IDS,
	OPERATION_CANCELLED_TOPIC, OPERATION_QUEUED_TOPIC,
};

pub use config::{
	resolve_config_path, ConfigError, ConfigLoader, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH,
};

pub use security::{get_env_var, SecretString, SecretValue, SecurityError, SecurityResult};
