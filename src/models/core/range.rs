use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive block interval with `from <= to`.
///
/// Built fresh for every scan and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRange {
	from: u64,
	to: u64,
}

impl BlockRange {
	/// Builds a range, clamping `from` down to `to` when the inputs are inverted.
	pub fn clamped(from: u64, to: u64) -> Self {
		Self {
			from: from.min(to),
			to,
		}
	}

	/// Range covering the `span` blocks that end at `to`, stopping at genesis.
	pub fn ending_at(to: u64, span: u64) -> Self {
		Self {
			from: to.saturating_sub(span),
			to,
		}
	}

	pub fn from(&self) -> u64 {
		self.from
	}

	pub fn to(&self) -> u64 {
		self.to
	}

	/// Number of blocks between the bounds (`to - from`).
	pub fn span(&self) -> u64 {
		self.to - self.from
	}
}

impl fmt::Display for BlockRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {}]", self.from, self.to)
	}
}
