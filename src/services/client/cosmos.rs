//! Base client for Cosmos-SDK chains.
//!
//! Status and block data come from the CometBFT JSON-RPC endpoint, the
//! validator set from the Cosmos REST API. Chain families with extra module
//! endpoints wrap this client and override `fetch_extension`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::{
	models::ChainDescriptor,
	services::client::{http::HttpTransport, ChainClient, ClientError},
	utils::RetryConfig,
};

/// Chain client for plain Cosmos-SDK chains
#[derive(Debug)]
pub struct CosmosClient {
	transport: HttpTransport,
}

impl CosmosClient {
	/// Creates a client bound to the chain's REST and RPC base URLs
	pub fn new(
		chain: &ChainDescriptor,
		retry: &RetryConfig,
		timeout: Duration,
	) -> Result<Self, ClientError> {
		Ok(Self {
			transport: HttpTransport::new(chain, retry, timeout)?,
		})
	}

	/// Shared access to the transport for wrapping clients
	pub(crate) fn transport(&self) -> &HttpTransport {
		&self.transport
	}
}

#[async_trait]
impl ChainClient for CosmosClient {
	async fn get_status(&self) -> Result<Value, ClientError> {
		self.transport.rpc_call("status", json!([])).await
	}

	async fn get_block(&self, height: u64) -> Result<Value, ClientError> {
		// CometBFT expects heights as decimal strings
		self.transport
			.rpc_call("block", json!([height.to_string()]))
			.await
	}

	async fn get_validators(&self, height: Option<u64>) -> Result<Value, ClientError> {
		let path = match height {
			Some(h) => format!("cosmos/base/tendermint/v1beta1/validatorsets/{}", h),
			None => "cosmos/base/tendermint/v1beta1/validatorsets/latest".to_string(),
		};
		self.transport.rest_get(&path, &[]).await
	}
}
