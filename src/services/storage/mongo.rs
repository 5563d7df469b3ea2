//! MongoDB-backed record store.
//!
//! Records land in a single collection keyed by
//! `(chain_id, block_height, endpoint)`; a unique compound index over that key
//! is created at startup so upserts can never produce duplicates.

use async_trait::async_trait;
use mongodb::{
	bson::{doc, Bson, Document},
	options::IndexOptions,
	Client, Collection, IndexModel,
};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::{
	models::CollectedRecord,
	services::storage::{RecordStore, StorageError},
};

const RECORDS_COLLECTION: &str = "blockchain_data";

/// Record store backed by a MongoDB collection
#[derive(Clone, Debug)]
pub struct MongoRecordStore {
	records: Collection<Document>,
}

impl MongoRecordStore {
	/// Connects to MongoDB, verifies the connection, and ensures indexes.
	///
	/// # Arguments
	/// * `uri` - MongoDB connection string
	/// * `db_name` - Name of the database holding collected records
	pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StorageError> {
		let client = Client::with_uri_str(uri).await.map_err(|e| {
			StorageError::connection_error(
				format!("failed to parse MongoDB connection string: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		let database = client.database(db_name);

		// Connection handshake is lazy; ping so startup fails fast
		database
			.run_command(doc! { "ping": 1 })
			.await
			.map_err(|e| {
				StorageError::connection_error(
					format!("failed to reach MongoDB: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"database".to_string(),
						db_name.to_string(),
					)])),
				)
			})?;

		let store = Self {
			records: database.collection::<Document>(RECORDS_COLLECTION),
		};
		store.ensure_indexes().await?;

		info!("Connected to MongoDB database '{}'", db_name);
		Ok(store)
	}

	/// Creates the identity and query indexes on the records collection
	async fn ensure_indexes(&self) -> Result<(), StorageError> {
		let indexes = vec![
			IndexModel::builder()
				.keys(doc! { "chain_id": 1, "block_height": 1, "endpoint": 1 })
				.options(IndexOptions::builder().unique(true).build())
				.build(),
			IndexModel::builder().keys(doc! { "timestamp": 1 }).build(),
			IndexModel::builder()
				.keys(doc! { "chain_id": 1, "endpoint": 1 })
				.build(),
		];

		self.records.create_indexes(indexes).await.map_err(|e| {
			StorageError::connection_error(
				format!("failed to create indexes: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		Ok(())
	}

	fn height_as_i64(record: &CollectedRecord) -> Result<i64, StorageError> {
		i64::try_from(record.block_height).map_err(|e| {
			StorageError::write_error(
				format!("block height {} exceeds storable range", record.block_height),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"chain_id".to_string(),
					record.chain_id.clone(),
				)])),
			)
		})
	}
}

#[async_trait]
impl RecordStore for MongoRecordStore {
	async fn upsert(&self, record: &CollectedRecord) -> Result<(), StorageError> {
		let height = Self::height_as_i64(record)?;

		let data = mongodb::bson::to_bson(&record.data).map_err(|e| {
			StorageError::write_error(
				format!("failed to convert payload to BSON: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([
					("chain_id".to_string(), record.chain_id.clone()),
					("endpoint".to_string(), record.endpoint.clone()),
				])),
			)
		})?;

		let filter = doc! {
			"chain_id": &record.chain_id,
			"block_height": height,
			"endpoint": &record.endpoint,
		};
		let update = doc! {
			"$set": {
				"data": data,
				"timestamp": record.timestamp,
			}
		};

		self.records
			.update_one(filter, update)
			.upsert(true)
			.await
			.map_err(|e| {
				StorageError::write_error(
					format!("failed to upsert record: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([
						("chain_id".to_string(), record.chain_id.clone()),
						("block_height".to_string(), record.block_height.to_string()),
						("endpoint".to_string(), record.endpoint.clone()),
					])),
				)
			})?;

		Ok(())
	}

	async fn latest_block_height(&self, chain_id: &str) -> Option<u64> {
		let filter = doc! { "chain_id": chain_id, "endpoint": "block" };

		let result = self
			.records
			.find_one(filter)
			.sort(doc! { "block_height": -1 })
			.projection(doc! { "block_height": 1 })
			.await;

		match result {
			Ok(Some(document)) => match document.get("block_height") {
				Some(Bson::Int64(height)) => u64::try_from(*height).ok(),
				Some(Bson::Int32(height)) => u64::try_from(*height).ok(),
				_ => {
					warn!(
						"Stored block record for chain '{}' has a non-numeric height",
						chain_id
					);
					None
				}
			},
			Ok(None) => None,
			Err(e) => {
				// Treated as a first run; collection proceeds from the tip
				warn!(
					"Failed to query latest block height for chain '{}': {}",
					chain_id, e
				);
				None
			}
		}
	}
}
