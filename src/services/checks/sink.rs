//! Destinations for observation records.

use std::{
	io::Write,
	sync::{Arc, Mutex},
};

use crate::models::Observation;

/// Receives every record produced by the checks
pub trait ObservationSink: Send + Sync {
	fn emit(&self, observation: Observation);
}

/// Writes each record as pretty-printed JSON on stdout.
///
/// Diagnostics go through `tracing`, so stdout carries records only.
#[derive(Debug, Default, Clone)]
pub struct StdoutSink;

impl ObservationSink for StdoutSink {
	fn emit(&self, observation: Observation) {
		match serde_json::to_string_pretty(&observation) {
			Ok(json) => {
				let mut stdout = std::io::stdout().lock();
				if let Err(e) = writeln!(stdout, "{}", json) {
					tracing::error!(error = %e, "failed to write observation");
				}
			}
			Err(e) => tracing::error!(error = %e, title = %observation.title, "failed to serialize observation"),
		}
	}
}

/// Keeps records in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
	observations: Arc<Mutex<Vec<Observation>>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn observations(&self) -> Vec<Observation> {
		self.observations
			.lock()
			.map(|observations| observations.clone())
			.unwrap_or_else(|poisoned| poisoned.into_inner().clone())
	}
}

impl ObservationSink for MemorySink {
	fn emit(&self, observation: Observation) {
		let mut observations = self
			.observations
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner());
		observations.push(observation);
	}
}
