//! Client for the Symphony chain family.
//!
//! Symphony chains are Cosmos-SDK chains with extra module endpoints: market
//! parameters, exchange requirements, the treasury tax rate, and the note
//! supply. Everything else is delegated to the wrapped [`CosmosClient`].

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::{
	models::{ChainDescriptor, EndpointKind},
	services::client::{ChainClient, ClientError, CosmosClient},
	utils::RetryConfig,
};

/// Chain client for Symphony chains
#[derive(Debug)]
pub struct SymphonyClient {
	inner: CosmosClient,
}

impl SymphonyClient {
	/// Creates a client bound to the chain's REST and RPC base URLs
	pub fn new(
		chain: &ChainDescriptor,
		retry: &RetryConfig,
		timeout: Duration,
	) -> Result<Self, ClientError> {
		Ok(Self {
			inner: CosmosClient::new(chain, retry, timeout)?,
		})
	}
}

#[async_trait]
impl ChainClient for SymphonyClient {
	async fn get_status(&self) -> Result<Value, ClientError> {
		self.inner.get_status().await
	}

	async fn get_block(&self, height: u64) -> Result<Value, ClientError> {
		self.inner.get_block(height).await
	}

	async fn get_validators(&self, height: Option<u64>) -> Result<Value, ClientError> {
		self.inner.get_validators(height).await
	}

	async fn fetch_extension(&self, kind: EndpointKind) -> Result<Value, ClientError> {
		let transport = self.inner.transport();
		match kind {
			EndpointKind::MarketParams => {
				transport.rest_get("symphony/market/v1beta1/params", &[]).await
			}
			EndpointKind::ExchangeRequirements => {
				transport
					.rest_get("symphony/market/v1beta1/exchange_requirements", &[])
					.await
			}
			EndpointKind::TaxRate => {
				transport
					.rest_get("symphony/treasury/v1beta1/tax_rate", &[])
					.await
			}
			EndpointKind::NoteSupply => {
				transport
					.rest_get(
						"cosmos/bank/v1beta1/supply/by_denom",
						&[("denom", "note".to_string())],
					)
					.await
			}
			_ => Err(ClientError::unsupported_endpoint_error(
				kind.as_tag(),
				None,
				None,
			)),
		}
	}
}
