//! Sub-call windows for paginated log queries.

use std::fmt;

use crate::models::BlockRange;

/// One planned `eth_getLogs` call.
///
/// The last window of a plan may be inverted (`from > to`); it is paced like the
/// others but never requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
	pub from: u64,
	pub to: u64,
}

impl ScanWindow {
	pub fn is_inverted(&self) -> bool {
		self.from > self.to
	}
}

impl fmt::Display for ScanWindow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {}]", self.from, self.to)
	}
}

/// Fixed-stride windows over a [`BlockRange`].
///
/// Plans `ceil(span / max_span) + 1` windows, or a single one for an empty span.
/// Window `k` is `[cursor, min(cursor + max_span, to)]` and the cursor advances by
/// exactly `max_span`, so consecutive windows share their boundary block.
#[derive(Debug, Clone)]
pub struct WindowPlan {
	cursor: u64,
	end: u64,
	max_span: u64,
	yielded: u64,
	total_windows: u64,
}

impl WindowPlan {
	/// A `max_span` of zero is treated as one.
	pub fn new(range: BlockRange, max_span: u64) -> Self {
		let max_span = max_span.max(1);
		let total_windows = match range.span() {
			0 => 1,
			span => span.div_ceil(max_span) + 1,
		};
		Self {
			cursor: range.from(),
			end: range.to(),
			max_span,
			yielded: 0,
			total_windows,
		}
	}

	pub fn total_windows(&self) -> u64 {
		self.total_windows
	}
}

impl Iterator for WindowPlan {
	type Item = ScanWindow;

	fn next(&mut self) -> Option<Self::Item> {
		if self.yielded >= self.total_windows {
			return None;
		}
		self.yielded += 1;

		let window = ScanWindow {
			from: self.cursor,
			to: self.cursor.saturating_add(self.max_span).min(self.end),
		};
		self.cursor = self.cursor.saturating_add(self.max_span);
		Some(window)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match usize::try_from(self.total_windows - self.yielded) {
			Ok(remaining) => (remaining, Some(remaining)),
			Err(_) => (usize::MAX, None),
		}
	}
}

impl ExactSizeIterator for WindowPlan {}
