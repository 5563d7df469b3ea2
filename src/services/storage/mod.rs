//! Record persistence and collection progress tracking.
//!
//! The [`RecordStore`] trait covers both storage contracts: idempotent writes
//! keyed by `(chain_id, block_height, endpoint)` and the progress query used
//! to compute each chain's backlog. The production implementation is
//! [`MongoRecordStore`].

mod error;
mod mongo;

pub use error::StorageError;
pub use mongo::MongoRecordStore;

use async_trait::async_trait;

use crate::models::CollectedRecord;

/// Common interface for persisting collected records
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Inserts or overwrites the record identified by its key.
	///
	/// Writing the same key twice must leave exactly one record holding the
	/// payload and timestamp of the later write.
	async fn upsert(&self, record: &CollectedRecord) -> Result<(), StorageError>;

	/// Returns the highest stored `block` record height for a chain.
	///
	/// `None` means no block record exists, or the store could not be
	/// queried; either way the caller treats the chain as a first run.
	async fn latest_block_height(&self, chain_id: &str) -> Option<u64>;
}
