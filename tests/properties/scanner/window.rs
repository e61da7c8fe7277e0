use crate::properties::strategies::range_strategy;
use pnetwork_monitor::{
	models::BlockRange,
	services::scanner::{ScanWindow, WindowPlan},
};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_window_count((from, to, max_span) in range_strategy()) {
		let range = BlockRange::clamped(from, to);
		let plan = WindowPlan::new(range, max_span);
		let expected = match to - from {
			0 => 1,
			span => span.div_ceil(max_span) + 1,
		};

		prop_assert_eq!(plan.total_windows(), expected);
		prop_assert_eq!(plan.count() as u64, expected);
	}

	#[test]
	fn test_windows_cover_the_range((from, to, max_span) in range_strategy()) {
		let windows: Vec<ScanWindow> = WindowPlan::new(BlockRange::clamped(from, to), max_span).collect();
		let requested: Vec<&ScanWindow> = windows.iter().filter(|w| !w.is_inverted()).collect();

		prop_assert_eq!(windows[0].from, from);
		prop_assert_eq!(requested.iter().map(|w| w.to).max(), Some(to));
		for pair in requested.windows(2) {
			// consecutive windows share their boundary block
			prop_assert_eq!(pair[1].from, pair[0].to);
		}
	}

	#[test]
	fn test_window_width((from, to, max_span) in range_strategy()) {
		let windows: Vec<ScanWindow> = WindowPlan::new(BlockRange::clamped(from, to), max_span).collect();
		let (last, body) = windows.split_last().unwrap();

		for window in body {
			prop_assert!(window.from < window.to);
			prop_assert!(window.to - window.from <= max_span);
		}
		prop_assert!(last.from >= to);
	}
}
