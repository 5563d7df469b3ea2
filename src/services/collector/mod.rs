//! One complete collection pass for one chain.
//!
//! A pass fetches the node status, stores a status record at the tip height,
//! computes the backlog of heights missed since the last pass, and walks that
//! backlog in ascending order storing block, validator, and extension records
//! per height. Failures of individual validator or extension fetches are
//! logged and skipped; a failed block fetch aborts the remainder of the pass
//! while keeping the progress already stored.

mod error;

pub use error::CollectorError;

use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
	models::{ChainDescriptor, CollectedRecord, EndpointKind},
	services::{client::ChainClient, storage::RecordStore},
	utils::parse_height,
};

/// Upper bound on heights processed in one pass; larger gaps are caught up
/// across successive passes
pub const MAX_BLOCKS_PER_PASS: u64 = 100;

/// Outcome of one collection pass, for logging and tests
#[derive(Debug, Clone, Default)]
pub struct PassSummary {
	/// Tip height reported by the chain at the start of the pass
	pub tip_height: u64,
	/// Heights fully processed, in the order they were walked
	pub heights_processed: Vec<u64>,
	/// Number of records successfully stored
	pub records_stored: u64,
	/// Number of records that failed to store
	pub store_failures: u64,
}

/// Computes the heights a pass has to process.
///
/// No stored progress means a first run, which collects only the tip. When
/// progress exists the backlog is the half-open range above the stored height,
/// capped at [`MAX_BLOCKS_PER_PASS`]; a stored height at or above the tip
/// yields nothing.
fn compute_backlog(stored: Option<u64>, tip: u64) -> Vec<u64> {
	match stored {
		None => vec![tip],
		Some(stored) if stored >= tip => Vec::new(),
		Some(stored) => {
			let span = (tip - stored).min(MAX_BLOCKS_PER_PASS);
			(stored + 1..=stored + span).collect()
		}
	}
}

/// Runs one collection pass for a chain.
///
/// # Arguments
/// * `chain` - The chain to collect
/// * `client` - Client for the chain's APIs, owned for the duration of the pass
/// * `store` - Record store receiving the collected payloads
/// * `shutdown` - Cooperative shutdown signal, observed between heights
///
/// # Returns
/// A [`PassSummary`] on success; an error when the pass had to be aborted.
pub async fn run_pass<S>(
	chain: &ChainDescriptor,
	client: &dyn ChainClient,
	store: &S,
	shutdown: &watch::Receiver<bool>,
) -> Result<PassSummary, CollectorError>
where
	S: RecordStore + ?Sized,
{
	let timestamp = Utc::now().timestamp();

	let status = client.get_status().await.map_err(|e| {
		CollectorError::status_fetch_error(
			format!("failed to fetch status for chain '{}'", chain.chain_id),
			Some(Box::new(e)),
			Some(HashMap::from([(
				"chain_id".to_string(),
				chain.chain_id.clone(),
			)])),
		)
	})?;

	let tip_height = parse_height(&status["sync_info"]["latest_block_height"]).ok_or_else(|| {
		CollectorError::malformed_status_error(
			format!(
				"status for chain '{}' carries no usable tip height",
				chain.chain_id
			),
			None,
			Some(HashMap::from([(
				"chain_id".to_string(),
				chain.chain_id.clone(),
			)])),
		)
	})?;

	let mut summary = PassSummary {
		tip_height,
		..Default::default()
	};

	// The status record always lands at the tip with the pass timestamp,
	// independent of backlog progress
	store_record(
		store,
		&CollectedRecord::new(
			&chain.chain_id,
			tip_height,
			EndpointKind::Status,
			status,
			timestamp,
		),
		&mut summary,
	)
	.await;

	let stored = store.latest_block_height(&chain.chain_id).await;
	let backlog = compute_backlog(stored, tip_height);

	debug!(
		"Chain '{}': tip {}, stored {:?}, backlog of {} heights",
		chain.chain_id,
		tip_height,
		stored,
		backlog.len()
	);

	for height in backlog {
		if *shutdown.borrow() {
			info!(
				"Shutdown requested, stopping pass for chain '{}' at height {}",
				chain.chain_id, height
			);
			break;
		}

		let block = client.get_block(height).await.map_err(|e| {
			CollectorError::block_fetch_error(
				format!(
					"failed to fetch block {} for chain '{}'",
					height, chain.chain_id
				),
				Some(Box::new(e)),
				Some(HashMap::from([
					("chain_id".to_string(), chain.chain_id.clone()),
					("height".to_string(), height.to_string()),
				])),
			)
		})?;

		store_record(
			store,
			&CollectedRecord::new(&chain.chain_id, height, EndpointKind::Block, block, timestamp),
			&mut summary,
		)
		.await;

		if chain.is_enabled(EndpointKind::Validators) {
			match client.get_validators(Some(height)).await {
				Ok(validators) => {
					store_record(
						store,
						&CollectedRecord::new(
							&chain.chain_id,
							height,
							EndpointKind::Validators,
							validators,
							timestamp,
						),
						&mut summary,
					)
					.await;
				}
				Err(e) => {
					warn!(
						"Failed to fetch validators at height {} for chain '{}': {}",
						height, chain.chain_id, e
					);
				}
			}
		}

		for kind in chain.enabled_extensions() {
			match client.fetch_extension(kind).await {
				Ok(data) => {
					store_record(
						store,
						&CollectedRecord::new(&chain.chain_id, height, kind, data, timestamp),
						&mut summary,
					)
					.await;
				}
				Err(e) => {
					warn!(
						"Failed to fetch {} at height {} for chain '{}': {}",
						kind.as_tag(),
						height,
						chain.chain_id,
						e
					);
				}
			}
		}

		summary.heights_processed.push(height);
	}

	info!(
		"Chain '{}': pass complete, {} heights processed, {} records stored, {} store failures",
		chain.chain_id,
		summary.heights_processed.len(),
		summary.records_stored,
		summary.store_failures
	);

	Ok(summary)
}

/// Stores one record, counting the outcome instead of failing the pass
async fn store_record<S>(store: &S, record: &CollectedRecord, summary: &mut PassSummary)
where
	S: RecordStore + ?Sized,
{
	match store.upsert(record).await {
		Ok(()) => summary.records_stored += 1,
		Err(e) => {
			summary.store_failures += 1;
			warn!(
				"Failed to store {} record at height {} for chain '{}': {}",
				record.endpoint, record.block_height, record.chain_id, e
			);
		}
	}
}
