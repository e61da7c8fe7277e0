use crate::properties::strategies::lines_strategy;
use futures::{executor::block_on, stream, StreamExt};
use pnetwork_monitor::services::pubsub::split_lines;
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_chunking_does_not_change_lines(
		lines in lines_strategy(),
		cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
		trailing_newline in any::<bool>(),
	) {
		let mut body = lines.join("\n");
		if trailing_newline {
			body.push('\n');
		}
		let bytes = body.into_bytes();

		let mut offsets: Vec<usize> = cuts.iter().map(|cut| cut.index(bytes.len() + 1)).collect();
		offsets.push(0);
		offsets.push(bytes.len());
		offsets.sort_unstable();
		offsets.dedup();
		let chunks: Vec<Result<Vec<u8>, std::io::Error>> = offsets
			.windows(2)
			.map(|pair| Ok(bytes[pair[0]..pair[1]].to_vec()))
			.collect();

		let received: Vec<String> = block_on(
			split_lines(stream::iter(chunks))
				.map(|line| String::from_utf8(line.unwrap()).unwrap())
				.collect(),
		);
		prop_assert_eq!(received, lines);
	}
}
