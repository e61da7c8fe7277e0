//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"
//! - LOG_MAX_SIZE: maximum size of log files in bytes; default is 1GB
//!
//! Observation records are printed on stdout, so in "stdout" mode the diagnostic
//! log stream is written to stderr.

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::Path,
};
use tracing::{info, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{
		self,
		format::Writer,
		{FmtContext, FormatEvent, FormatFields},
	},
	prelude::*,
	registry::LookupSpan,
};

/// Base name of the log file written in "file" mode.
const LOG_FILE_NAME: &str = "pnetwork-monitor.log";

/// Default rolling threshold (1GB).
const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;

lazy_static! {
	static ref ANSI_ESCAPE: Regex =
		Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ANSI escape pattern is valid");
}

/// Custom formatter that strips ANSI escape codes from log output
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<T> StripAnsiFormatter<T> {
	fn new(inner: T) -> Self {
		Self { inner }
	}
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

/// Strips ANSI escape codes from a string
fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").to_string()
}

/// Computes the path of the rolled log file given the base file path and the date string.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let trimmed = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", trimmed, date_str, index)
}

/// Checks if the given log file exceeds the maximum allowed size (in bytes).
/// If so, it appends a sequence number to generate a new file name.
/// Returns the final log file path to use.
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut final_path = file_path.to_string();
	let mut index = 1;
	while let Ok(metadata) = metadata(&final_path) {
		if metadata.len() > max_size {
			index += 1;
			final_path = compute_rolled_file_path(base_file_path, date_str, index);
		} else {
			break;
		}
	}
	final_path
}

/// Creates a log format with configurable ANSI support
fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

fn parse_level(level: &str) -> tracing::Level {
	match level.to_lowercase().as_str() {
		"trace" => tracing::Level::TRACE,
		"debug" => tracing::Level::DEBUG,
		"warn" => tracing::Level::WARN,
		"error" => tracing::Level::ERROR,
		_ => tracing::Level::INFO,
	}
}

/// Sets up logging by reading configuration from environment variables.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
	let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
	let level_filter = parse_level(&log_level);

	let to_file = log_mode.eq_ignore_ascii_case("file");
	let format = create_log_format(!to_file);
	let subscriber = tracing_subscriber::registry().with(EnvFilter::new(level_filter.to_string()));

	if to_file {
		let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
		let log_dir = format!("{}/", log_dir.trim_end_matches('/'));
		let date_str = Utc::now().format("%Y-%m-%d").to_string();
		let base_file_path = format!("{}{}", log_dir, LOG_FILE_NAME);

		let time_based_path = compute_rolled_file_path(&base_file_path, &date_str, 1);
		if let Some(parent) = Path::new(&time_based_path).parent() {
			create_dir_all(parent)?;
		}

		let max_size = parse_log_max_size()?;
		let final_path =
			space_based_rolling(&time_based_path, &base_file_path, &date_str, max_size);

		let file_appender = tracing_appender::rolling::never(
			Path::new(&final_path).parent().unwrap_or(Path::new(".")),
			Path::new(&final_path).file_name().unwrap_or_default(),
		);

		subscriber
			.with(
				fmt::layer()
					.event_format(StripAnsiFormatter::new(format))
					.with_writer(file_appender)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
	} else {
		subscriber
			.with(
				fmt::layer()
					.event_format(format)
					.with_writer(std::io::stderr)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
	}

	info!(mode = %log_mode, level = %level_filter, "Logging is configured");
	Ok(())
}

fn parse_log_max_size() -> Result<u64, Box<dyn std::error::Error>> {
	match env::var("LOG_MAX_SIZE") {
		Ok(value) => value
			.parse::<u64>()
			.map_err(|e| format!("LOG_MAX_SIZE must be a valid u64 if set: {}", e).into()),
		Err(_) => Ok(DEFAULT_LOG_MAX_SIZE),
	}
}
