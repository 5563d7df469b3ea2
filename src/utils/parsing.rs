//! Parsing utilities
//!
//! This module provides utilities for parsing various types of data.

use serde_json::Value;

/// Parses a block height from a JSON value.
///
/// CometBFT-style APIs report heights as decimal strings while some REST
/// endpoints use plain numbers; both forms are accepted.
///
/// # Arguments
/// * `value` - The JSON value holding the height
///
/// # Returns
/// * `Option<u64>` - The parsed height, or `None` if the value is missing or not numeric
pub fn parse_height(value: &Value) -> Option<u64> {
	match value {
		Value::Number(n) => n.as_u64(),
		Value::String(s) => s.trim().parse::<u64>().ok(),
		_ => None,
	}
}

/// Normalizes a string by trimming whitespace and converting to lowercase.
///
/// This is useful for case-insensitive comparisons and removing leading/trailing whitespace.
///
/// # Arguments
/// * `input` - The string to normalize
///
/// # Returns
/// * `String` - The normalized string (trimmed and lowercase)
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}
