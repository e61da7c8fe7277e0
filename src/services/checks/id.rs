use serde::Serialize;
use std::{fmt, str::FromStr};

/// Closed set of monitoring checks, numbered in CLI order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
	NrOfOpsInQueue = 0,
	MaxOpsInQueue = 1,
	ChallengePeriodDuration = 2,
	OperationCancelled = 3,
	QueueOperationsWithThreshold = 4,
	SlashedActors = 5,
	ComponentsBalances = 6,
	InactiveActorsByEpoch = 7,
	IpfsSubpubPnetworkTopics = 8,
}

impl CheckId {
	pub const ALL: [CheckId; 9] = [
		Self::NrOfOpsInQueue,
		Self::MaxOpsInQueue,
		Self::ChallengePeriodDuration,
		Self::OperationCancelled,
		Self::QueueOperationsWithThreshold,
		Self::SlashedActors,
		Self::ComponentsBalances,
		Self::InactiveActorsByEpoch,
		Self::IpfsSubpubPnetworkTopics,
	];

	pub fn index(self) -> usize {
		self as usize
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::NrOfOpsInQueue => "nr_of_ops_in_queue",
			Self::MaxOpsInQueue => "max_ops_in_queue",
			Self::ChallengePeriodDuration => "challenge_period_duration",
			Self::OperationCancelled => "operation_cancelled",
			Self::QueueOperationsWithThreshold => "queue_operations_with_threshold",
			Self::SlashedActors => "slashed_actors",
			Self::ComponentsBalances => "components_balances",
			Self::InactiveActorsByEpoch => "inactive_actors_by_epoch",
			Self::IpfsSubpubPnetworkTopics => "ipfs_subpub_pnetwork_topics",
		}
	}

	/// `title` of the records the check emits.
	///
	/// Two checks keep the singular record titles existing dashboards filter on.
	pub fn title(self) -> &'static str {
		match self {
			Self::QueueOperationsWithThreshold => "queue_operation_with_threshold",
			Self::ComponentsBalances => "components_balance",
			other => other.name(),
		}
	}

	/// `"<index>: <name>"` lines for the CLI help
	pub fn listing() -> String {
		Self::ALL
			.iter()
			.map(|id| format!("  {}: {}", id.index(), id.name()))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

impl fmt::Display for CheckId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for CheckId {
	type Err = String;

	/// Accepts the check number or its name
	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let value = value.trim();
		let found = match value.parse::<usize>() {
			Ok(index) => Self::ALL.get(index).copied(),
			Err(_) => Self::ALL
				.iter()
				.copied()
				.find(|id| id.name().eq_ignore_ascii_case(value)),
		};
		found.ok_or_else(|| format!("check {} does not exist", value))
	}
}
