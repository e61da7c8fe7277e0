//! pNetwork v3 bridge monitor entry point.
//!
//! Runs the selected checks once, in order, and writes one JSON record per
//! observation to stdout. Diagnostics go through `tracing` (stderr or rolling files).
//!
//! # Flow
//! 1. Applies command-line options to the environment and sets up logging
//! 2. Loads and validates the JSON configuration
//! 3. Builds the shared services and the check registry
//! 4. Runs the selected checks; the pub/sub check may keep the process alive

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{create_check_registry, initialize_services, select_checks, Result},
	models::{resolve_config_path, ConfigLoader, MonitorConfig},
	services::checks::{CheckId, StdoutSink},
	utils::{logging::setup_logging, parse_string_to_bytes_size},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::PathBuf,
	process::ExitCode,
	sync::Arc,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(
	name = "pnetwork-monitor",
	about = "Monitors pNetwork v3 bridge contracts, events and node gossip, printing one JSON record per observation.",
	version
)]
struct Cli {
	/// Checks to run, by number or name
	#[arg(short, long, value_name = "CHECK", num_args = 1.., conflicts_with = "all", required_unless_present = "all")]
	checks: Vec<String>,

	/// Run every check
	#[arg(short, long)]
	all: bool,

	/// Print the name of each check before it runs
	#[arg(short, long)]
	verbose: bool,

	/// Path to the monitor configuration (default: config/monitor.json)
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Write logs to file instead of stderr
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		// Set log level from RUST_LOG if it exists
		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}
}

async fn run(cli: Cli) -> Result<ExitCode> {
	let checks: Vec<CheckId> = match select_checks(&cli.checks, cli.all) {
		Ok(checks) => checks,
		Err(e) => {
			eprintln!("{}\navailable checks:\n{}", e, CheckId::listing());
			return Ok(ExitCode::FAILURE);
		}
	};

	let config_path = resolve_config_path(cli.config.as_deref());
	let config = match MonitorConfig::load_from_path(&config_path).await {
		Ok(config) => Arc::new(config),
		Err(e) => {
			error!(path = %config_path.display(), error = %e, "failed to load configuration");
			return Ok(ExitCode::FAILURE);
		}
	};
	info!(path = %config_path.display(), chains = ?config.chain_names(), "configuration loaded");

	let registry = create_check_registry(&config)?;
	let context = initialize_services(config, Arc::new(StdoutSink))?;

	let mut failed = Vec::new();
	for id in checks {
		if cli.verbose {
			eprintln!("[+] {}", id.name());
		}
		failed.extend(registry.run(&[id], &context).await);
	}

	if !failed.is_empty() {
		info!(failed = ?failed, "some checks did not complete");
	}
	Ok(ExitCode::SUCCESS)
}

/// Main entry point for the bridge monitor.
///
/// Exits with status 1 on an unknown check or an unusable configuration. Check
/// failures are reported as records and do not change the exit status.
#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	match run(cli).await {
		Ok(code) => code,
		Err(e) => {
			error!(error = %e, "monitor failed to start");
			ExitCode::FAILURE
		}
	}
}
