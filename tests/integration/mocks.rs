//! Mock implementations for testing purposes.
//!
//! This module contains mock implementations of the chain client trait plus
//! helpers for building canned chain API responses.
//!
//! The mocks are implemented using the `mockall` crate.

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};

use chainpulse::{
	models::EndpointKind,
	services::client::{ChainClient, ClientError},
};

mock! {
	/// Mock implementation of the chain client trait.
	///
	/// This mock allows testing collection logic by simulating chain API
	/// responses without actual network calls.
	pub ChainClient {}

	#[async_trait]
	impl ChainClient for ChainClient {
		async fn get_status(&self) -> Result<Value, ClientError>;
		async fn get_block(&self, height: u64) -> Result<Value, ClientError>;
		async fn get_validators(&self, height: Option<u64>) -> Result<Value, ClientError>;
		async fn fetch_extension(&self, kind: EndpointKind) -> Result<Value, ClientError>;
	}
}

/// A status response reporting the given tip height
pub fn status_at(tip: u64) -> Value {
	json!({
		"node_info": {"network": "test-chain-1"},
		"sync_info": {"latest_block_height": tip.to_string()},
	})
}

/// A minimal block response for the given height
pub fn block_at(height: u64) -> Value {
	json!({
		"block_id": {"hash": format!("hash-{}", height)},
		"block": {"header": {"height": height.to_string()}},
	})
}

/// A minimal validator set response
pub fn validators_at(height: u64) -> Value {
	json!({
		"block_height": height.to_string(),
		"validators": [{"address": "val-1", "voting_power": "100"}],
	})
}
