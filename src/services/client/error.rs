//! Chain API client error types.
//!
//! This module defines the errors that can occur while talking to a chain's
//! REST or JSON-RPC endpoints.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during chain API operations
#[derive(ThisError, Debug)]
pub enum ClientError {
	/// Transport failures: connection refused, DNS, timeout
	#[error("Network error: {0}")]
	Network(ErrorContext),

	/// The remote answered with a non-2xx status or an embedded RPC error
	#[error("Remote error: {0}")]
	Remote(ErrorContext),

	/// The response body could not be decoded as the expected shape
	#[error("Malformed response: {0}")]
	MalformedResponse(ErrorContext),

	/// The requested extension endpoint is not provided by this client
	#[error("Unsupported endpoint: {0}")]
	UnsupportedEndpoint(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ClientError {
	// Network error
	pub fn network_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Remote error
	pub fn remote_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Remote(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Malformed response error
	pub fn malformed_response_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::MalformedResponse(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Unsupported endpoint error
	pub fn unsupported_endpoint_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UnsupportedEndpoint(ErrorContext::new(msg, source, metadata))
	}
}

impl TraceableError for ClientError {
	fn trace_id(&self) -> String {
		match self {
			Self::Network(ctx) => ctx.trace_id.clone(),
			Self::Remote(ctx) => ctx.trace_id.clone(),
			Self::MalformedResponse(ctx) => ctx.trace_id.clone(),
			Self::UnsupportedEndpoint(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

impl From<reqwest_middleware::Error> for ClientError {
	fn from(err: reqwest_middleware::Error) -> Self {
		Self::network_error(err.to_string(), Some(Box::new(err)), None)
	}
}

impl From<reqwest::Error> for ClientError {
	fn from(err: reqwest::Error) -> Self {
		Self::network_error(err.to_string(), Some(Box::new(err)), None)
	}
}

impl From<serde_json::Error> for ClientError {
	fn from(err: serde_json::Error) -> Self {
		Self::malformed_response_error(err.to_string(), Some(Box::new(err)), None)
	}
}
