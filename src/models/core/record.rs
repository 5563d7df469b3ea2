use serde::{Deserialize, Serialize};

use crate::models::EndpointKind;

/// A single collected payload destined for the document store.
///
/// The identity key is `(chain_id, block_height, endpoint)`; re-collecting an
/// already stored key overwrites the payload and timestamp (last-write-wins).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CollectedRecord {
	/// Identifier of the chain this record belongs to
	pub chain_id: String,

	/// Height the payload was collected at
	pub block_height: u64,

	/// Record tag, the snake_case form of the endpoint kind
	pub endpoint: String,

	/// The payload exactly as returned by the chain API
	pub data: serde_json::Value,

	/// Epoch seconds, captured once per collection pass
	pub timestamp: i64,
}

impl CollectedRecord {
	/// Creates a record for the given endpoint kind at a height.
	pub fn new(
		chain_id: impl Into<String>,
		block_height: u64,
		endpoint: EndpointKind,
		data: serde_json::Value,
		timestamp: i64,
	) -> Self {
		Self {
			chain_id: chain_id.into(),
			block_height,
			endpoint: endpoint.as_tag().to_string(),
			data,
			timestamp,
		}
	}
}
