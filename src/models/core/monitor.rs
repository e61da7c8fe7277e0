use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::{
	models::{
		core::protocol::{ACTORS_PROPAGATED_TOPIC, OPERATION_CANCELLED_TOPIC, OPERATION_QUEUED_TOPIC},
		ChainConfig,
	},
	utils::RetryConfig,
};

/// Top-level monitor configuration, loaded from a single JSON file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
	/// Monitored chains, in the order checks visit them
	pub chains: Vec<ChainConfig>,

	/// Chain hosting the DAO contracts (epochs, registration, governance)
	#[serde(default = "default_dao_chain")]
	pub dao_chain: String,

	/// Extra addresses whose native balance is reported next to the protocol components
	#[serde(default)]
	pub relayers: Vec<String>,

	#[serde(default)]
	pub scanner: ScannerSettings,

	#[serde(default)]
	pub blocks_per_day: BlockRateSettings,

	#[serde(default)]
	pub lookback: LookbackSettings,

	#[serde(default)]
	pub topics: TopicSettings,

	/// USD value above which a queued operation is flagged
	#[serde(default = "default_amount_threshold")]
	pub queued_operation_amount_threshold: Decimal,

	#[serde(default)]
	pub pubsub: PubSubSettings,

	/// Retry policy for RPC and explorer requests
	#[serde(default)]
	pub retry: RetryConfig,
}

fn default_dao_chain() -> String {
	"polygon".to_string()
}

fn default_amount_threshold() -> Decimal {
	Decimal::ONE
}

impl MonitorConfig {
	pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
		self.chains.iter().find(|chain| chain.name == name)
	}

	pub fn chain_names(&self) -> Vec<String> {
		self.chains.iter().map(|chain| chain.name.clone()).collect()
	}
}

/// How a "look back N days" window is turned into block numbers.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RangeStrategy {
	/// Latest block minus blocks-per-day times days
	#[default]
	Estimate,
	/// Explorer `getblocknobytime` lookups for both bounds
	ExplorerLookup,
}

/// Paginated `eth_getLogs` settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScannerSettings {
	/// Largest block span a single `eth_getLogs` call may cover
	#[serde(default = "default_max_block_range")]
	pub max_block_range: u64,

	/// Pause after every sub-call, in milliseconds
	#[serde(default = "default_request_delay_ms")]
	pub request_delay_ms: u64,

	#[serde(default)]
	pub range_strategy: RangeStrategy,
}

fn default_max_block_range() -> u64 {
	9999
}

fn default_request_delay_ms() -> u64 {
	1000
}

impl Default for ScannerSettings {
	fn default() -> Self {
		Self {
			max_block_range: default_max_block_range(),
			request_delay_ms: default_request_delay_ms(),
			range_strategy: RangeStrategy::default(),
		}
	}
}

impl ScannerSettings {
	pub fn request_delay(&self) -> Duration {
		Duration::from_millis(self.request_delay_ms)
	}
}

/// Blocks-per-day estimation and cache settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BlockRateSettings {
	/// Cache file holding the last estimate of every chain
	#[serde(default = "default_cache_path")]
	pub path: PathBuf,

	/// Age after which the cached estimate is recomputed
	#[serde(default = "default_validity_secs")]
	pub validity_secs: u64,

	/// Number of sampled blocks, head included
	#[serde(default = "default_sample_count")]
	pub sample_count: u64,

	/// Distance in blocks between two consecutive samples
	#[serde(default = "default_sample_step")]
	pub sample_step: u64,
}

fn default_cache_path() -> PathBuf {
	PathBuf::from("blocks_per_day.json")
}

fn default_validity_secs() -> u64 {
	86_400
}

fn default_sample_count() -> u64 {
	19
}

fn default_sample_step() -> u64 {
	100
}

impl Default for BlockRateSettings {
	fn default() -> Self {
		Self {
			path: default_cache_path(),
			validity_secs: default_validity_secs(),
			sample_count: default_sample_count(),
			sample_step: default_sample_step(),
		}
	}
}

impl BlockRateSettings {
	pub fn validity(&self) -> Duration {
		Duration::from_secs(self.validity_secs)
	}
}

/// Days of history each scanning check looks at.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LookbackSettings {
	#[serde(default = "default_lookback_days")]
	pub default_days: u64,

	#[serde(default = "default_cancelled_lookback_days")]
	pub operation_cancelled_days: u64,
}

fn default_lookback_days() -> u64 {
	1
}

fn default_cancelled_lookback_days() -> u64 {
	2
}

impl Default for LookbackSettings {
	fn default() -> Self {
		Self {
			default_days: default_lookback_days(),
			operation_cancelled_days: default_cancelled_lookback_days(),
		}
	}
}

/// Event signatures (first topic) of the scanned hub events.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TopicSettings {
	#[serde(default = "default_operation_queued_topic")]
	pub operation_queued: String,

	#[serde(default = "default_operation_cancelled_topic")]
	pub operation_cancelled: String,

	#[serde(default = "default_actors_propagated_topic")]
	pub actors_propagated: String,

	/// No default is published for this event; the slashing check needs it configured.
	#[serde(default)]
	pub actor_slashed: Option<String>,
}

fn default_operation_queued_topic() -> String {
	OPERATION_QUEUED_TOPIC.to_string()
}

fn default_operation_cancelled_topic() -> String {
	OPERATION_CANCELLED_TOPIC.to_string()
}

fn default_actors_propagated_topic() -> String {
	ACTORS_PROPAGATED_TOPIC.to_string()
}

impl Default for TopicSettings {
	fn default() -> Self {
		Self {
			operation_queued: default_operation_queued_topic(),
			operation_cancelled: default_operation_cancelled_topic(),
			actors_propagated: default_actors_propagated_topic(),
			actor_slashed: None,
		}
	}
}

/// IPFS pub/sub subscription settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PubSubSettings {
	#[serde(default = "default_pubsub_host")]
	pub host: String,

	#[serde(default = "default_pubsub_port")]
	pub port: u16,

	#[serde(default = "default_pubsub_topic")]
	pub topic: String,

	/// 0 listens forever, a positive value exits the process after that many
	/// seconds, a negative value is rejected when subscribing
	#[serde(default = "default_pubsub_timeout")]
	pub timeout_secs: i64,
}

fn default_pubsub_host() -> String {
	"127.0.0.1".to_string()
}

fn default_pubsub_port() -> u16 {
	5001
}

fn default_pubsub_topic() -> String {
	"pnetwork-v3".to_string()
}

fn default_pubsub_timeout() -> i64 {
	60
}

impl Default for PubSubSettings {
	fn default() -> Self {
		Self {
			host: default_pubsub_host(),
			port: default_pubsub_port(),
			topic: default_pubsub_topic(),
			timeout_secs: default_pubsub_timeout(),
		}
	}
}
