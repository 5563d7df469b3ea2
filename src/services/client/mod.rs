//! Chain API client implementations.
//!
//! Provides clients for the supported chain families:
//!
//! - `CosmosClient`: plain Cosmos-SDK chains (status, block, validators)
//! - `SymphonyClient`: Symphony chains, adding the market, treasury, and
//!   supply extension endpoints
//!
//! Clients are created per collection pass through [`create_client`]; dropping
//! a client releases its HTTP connection pool.

mod cosmos;
mod error;
mod http;
mod symphony;

pub use cosmos::CosmosClient;
pub use error::ClientError;
pub use http::HttpTransport;
pub use symphony::SymphonyClient;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::{
	models::{ChainDescriptor, EndpointKind},
	utils::RetryConfig,
};

/// Common interface for all chain clients
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Fetches the node status, including the current tip height
	async fn get_status(&self) -> Result<Value, ClientError>;

	/// Fetches the full block at the given height
	async fn get_block(&self, height: u64) -> Result<Value, ClientError>;

	/// Fetches the validator set at the given height, or the latest set when
	/// no height is given
	async fn get_validators(&self, height: Option<u64>) -> Result<Value, ClientError>;

	/// Fetches a capability extension endpoint.
	///
	/// The default implementation rejects every kind; chain families with
	/// extra module endpoints override it. Callers decide what to fetch from
	/// the descriptor's enabled endpoint set rather than by probing.
	async fn fetch_extension(&self, kind: EndpointKind) -> Result<Value, ClientError> {
		Err(ClientError::unsupported_endpoint_error(
			kind.as_tag(),
			None,
			None,
		))
	}
}

/// Creates the client implementation registered for a chain.
///
/// Symphony chains are recognized by their chain id prefix; everything else
/// gets the plain Cosmos client.
pub fn create_client(
	chain: &ChainDescriptor,
	retry: &RetryConfig,
	timeout: Duration,
) -> Result<Box<dyn ChainClient>, ClientError> {
	if chain.chain_id.starts_with("symphony-") {
		Ok(Box::new(SymphonyClient::new(chain, retry, timeout)?))
	} else {
		Ok(Box::new(CosmosClient::new(chain, retry, timeout)?))
	}
}
