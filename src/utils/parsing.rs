//! Parsing utilities
//!
//! This module provides utilities for parsing sizes from the command line and the
//! hex quantities returned by JSON-RPC endpoints.

use alloy::primitives::U256;
use byte_unit::Byte;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a string argument into a `u64` value representing a file size.
///
/// Accepts human-readable formats like "1GB", "500MB", "1024KB", etc.
/// Returns an error if the format is invalid.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Parses a JSON-RPC hex quantity (`"0x1b4"`) into a `u64`.
///
/// The `0x` prefix is optional; an empty quantity is rejected.
pub fn parse_hex_u64(value: &str) -> Result<u64, String> {
	let digits = strip_hex_prefix(value);
	if digits.is_empty() {
		return Err(format!("Empty hex quantity: '{}'", value));
	}
	u64::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex quantity '{}': {}", value, e))
}

/// Parses a JSON-RPC hex quantity that may exceed 64 bits (balances, token amounts).
pub fn parse_hex_u256(value: &str) -> Result<U256, String> {
	let digits = strip_hex_prefix(value);
	if digits.is_empty() {
		return Err(format!("Empty hex quantity: '{}'", value));
	}
	U256::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex quantity '{}': {}", value, e))
}

/// Formats a block number as a JSON-RPC hex quantity.
pub fn to_hex_quantity(value: u64) -> String {
	format!("0x{:x}", value)
}

/// Converts an integer amount of base units into whole units (`amount / 10^decimals`).
///
/// Fails when the amount does not fit a 96-bit decimal mantissa or `decimals` exceeds 28.
pub fn format_units(amount: U256, decimals: u32) -> Result<Decimal, String> {
	let mantissa = i128::try_from(amount).map_err(|_| format!("amount {} is too large", amount))?;
	Decimal::try_from_i128_with_scale(mantissa, decimals)
		.map(|value| value.normalize())
		.map_err(|e| format!("cannot scale {} by {} decimals: {}", amount, decimals, e))
}

fn strip_hex_prefix(value: &str) -> &str {
	let value = value.trim();
	value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
		.unwrap_or(value)
}
