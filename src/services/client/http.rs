//! HTTP transport shared by all chain clients.
//!
//! Wraps a retry-capable HTTP client and exposes the two request shapes the
//! chain APIs use: plain REST GETs against the REST base URL and JSON-RPC
//! POSTs against the RPC base URL.

use reqwest_middleware::ClientWithMiddleware;
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};

use crate::{
	models::ChainDescriptor,
	services::client::ClientError,
	utils::{create_retryable_http_client, RetryConfig, TransientErrorRetryStrategy},
};

/// A retrying HTTP transport bound to one chain's REST and RPC base URLs
#[derive(Debug)]
pub struct HttpTransport {
	client: ClientWithMiddleware,
	rest_url: String,
	rpc_url: String,
	request_id: AtomicU64,
}

impl HttpTransport {
	/// Creates a transport for the given chain.
	///
	/// The underlying connection pool is shared by all requests made through
	/// this transport and is released when the transport is dropped.
	pub fn new(
		chain: &ChainDescriptor,
		retry: &RetryConfig,
		timeout: Duration,
	) -> Result<Self, ClientError> {
		let base_client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| {
				ClientError::network_error(
					format!("failed to build HTTP client: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"chain_id".to_string(),
						chain.chain_id.clone(),
					)])),
				)
			})?;

		let client =
			create_retryable_http_client(retry, base_client, Some(TransientErrorRetryStrategy));

		Ok(Self {
			client,
			rest_url: chain.rest_url.trim_end_matches('/').to_string(),
			rpc_url: chain.rpc_url.trim_end_matches('/').to_string(),
			request_id: AtomicU64::new(1),
		})
	}

	/// Sends a GET request to the chain's REST API.
	///
	/// # Arguments
	/// * `path` - Path below the REST base URL
	/// * `query` - Query parameters to append
	///
	/// # Returns
	/// The decoded JSON body, or a [`ClientError`] classifying the failure.
	pub async fn rest_get(
		&self,
		path: &str,
		query: &[(&str, String)],
	) -> Result<Value, ClientError> {
		let url = format!("{}/{}", self.rest_url, path.trim_start_matches('/'));

		let response = self
			.client
			.get(&url)
			.query(query)
			.send()
			.await
			.map_err(|e| {
				ClientError::network_error(
					format!("REST request failed: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([("url".to_string(), url.clone())])),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ClientError::remote_error(
				format!("REST request returned {}", status),
				None,
				Some(HashMap::from([
					("url".to_string(), url),
					("status".to_string(), status.to_string()),
					("body".to_string(), body.chars().take(200).collect()),
				])),
			));
		}

		response.json::<Value>().await.map_err(|e| {
			ClientError::malformed_response_error(
				format!("failed to decode REST response: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), url)])),
			)
		})
	}

	/// Sends a JSON-RPC request to the chain's RPC endpoint.
	///
	/// An `error` member embedded in the envelope is treated as a failure
	/// even when the HTTP status is 200.
	///
	/// # Arguments
	/// * `method` - The RPC method name
	/// * `params` - The RPC parameters, typically an array
	///
	/// # Returns
	/// The `result` member of the response envelope.
	pub async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
		let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
		let envelope = json!({
			"jsonrpc": "2.0",
			"id": request_id,
			"method": method,
			"params": params,
		});

		let response = self
			.client
			.post(&self.rpc_url)
			.json(&envelope)
			.send()
			.await
			.map_err(|e| {
				ClientError::network_error(
					format!("RPC request failed: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([
						("url".to_string(), self.rpc_url.clone()),
						("method".to_string(), method.to_string()),
					])),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(ClientError::remote_error(
				format!("RPC request returned {}", status),
				None,
				Some(HashMap::from([
					("url".to_string(), self.rpc_url.clone()),
					("method".to_string(), method.to_string()),
					("status".to_string(), status.to_string()),
				])),
			));
		}

		let mut body: Value = response.json().await.map_err(|e| {
			ClientError::malformed_response_error(
				format!("failed to decode RPC response: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"method".to_string(),
					method.to_string(),
				)])),
			)
		})?;

		if let Some(error) = body.get("error") {
			if !error.is_null() {
				return Err(ClientError::remote_error(
					format!("RPC method '{}' returned an error", method),
					None,
					Some(HashMap::from([
						("method".to_string(), method.to_string()),
						("error".to_string(), error.to_string()),
					])),
				));
			}
		}

		match body.get_mut("result") {
			Some(result) => Ok(result.take()),
			None => Err(ClientError::malformed_response_error(
				format!("RPC response for '{}' is missing a result", method),
				None,
				Some(HashMap::from([(
					"method".to_string(),
					method.to_string(),
				)])),
			)),
		}
	}
}
