//! Record store error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during record store operations
#[derive(ThisError, Debug)]
pub enum StorageError {
	/// Errors related to connecting to the store
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// Errors related to writing records
	#[error("Write error: {0}")]
	WriteError(ErrorContext),

	/// Errors related to reading records
	#[error("Query error: {0}")]
	QueryError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl StorageError {
	// Connection error
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Write error
	pub fn write_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::WriteError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Query error
	pub fn query_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::QueryError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for StorageError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) => ctx.trace_id.clone(),
			Self::WriteError(ctx) => ctx.trace_id.clone(),
			Self::QueryError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
