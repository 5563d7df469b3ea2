//! Collection pass error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that abort a chain's collection pass
#[derive(ThisError, Debug)]
pub enum CollectorError {
	/// The status request failed, so no tip height is known
	#[error("Status fetch error: {0}")]
	StatusFetch(ErrorContext),

	/// The status response carried no usable tip height
	#[error("Malformed status: {0}")]
	MalformedStatus(ErrorContext),

	/// A block fetch failed mid-backlog; earlier progress is kept
	#[error("Block fetch error: {0}")]
	BlockFetch(ErrorContext),

	/// The chain client could not be constructed
	#[error("Client setup error: {0}")]
	ClientSetup(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl CollectorError {
	// Status fetch error
	pub fn status_fetch_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::StatusFetch(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Malformed status error
	pub fn malformed_status_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::MalformedStatus(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Block fetch error
	pub fn block_fetch_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockFetch(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Client setup error
	pub fn client_setup_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ClientSetup(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for CollectorError {
	fn trace_id(&self) -> String {
		match self {
			Self::StatusFetch(ctx) => ctx.trace_id.clone(),
			Self::MalformedStatus(ctx) => ctx.trace_id.clone(),
			Self::BlockFetch(ctx) => ctx.trace_id.clone(),
			Self::ClientSetup(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
