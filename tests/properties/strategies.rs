use proptest::prelude::*;

const MAX_SPAN: u64 = 1_000_000;
const MAX_SAMPLES: usize = 20;

/// `(from, to, max_span)` with at most a few thousand windows
pub fn range_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
	(0u64..100_000_000, 0u64..MAX_SPAN, 100u64..100_000)
		.prop_map(|(from, span, max_span)| (from, from + span, max_span))
}

/// Sample timestamps ordered newest first, every interval positive
pub fn timestamps_strategy() -> impl Strategy<Value = Vec<u64>> {
	(
		1_600_000_000u64..1_800_000_000,
		prop::collection::vec(1u64..600, 1..MAX_SAMPLES),
	)
		.prop_map(|(head, intervals)| {
			let mut timestamps = vec![head];
			for interval in intervals {
				let last = timestamps[timestamps.len() - 1];
				timestamps.push(last - interval);
			}
			timestamps
		})
}

/// Non-blank ASCII lines as a daemon would stream them
pub fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec("[a-zA-Z0-9{}\":,]{1,40}", 0..12)
}
