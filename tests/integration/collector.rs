//! Collection pass scenarios against a mocked chain client and an in-memory
//! record store.

use mockall::predicate::eq;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

use chainpulse::{
	models::{ChainDescriptor, CollectedRecord, EndpointKind},
	services::{
		collector::{run_pass, CollectorError, MAX_BLOCKS_PER_PASS},
		storage::RecordStore,
	},
	utils::tests::{builders::chain::ChainDescriptorBuilder, MemoryRecordStore},
};

use super::mocks::{block_at, status_at, validators_at, MockChainClient};

fn base_chain() -> ChainDescriptor {
	ChainDescriptorBuilder::new()
		.chain_id("test-chain-1")
		.enabled_endpoints(vec![EndpointKind::Block, EndpointKind::Status])
		.build()
}

fn chain_with_validators() -> ChainDescriptor {
	ChainDescriptorBuilder::new()
		.chain_id("test-chain-1")
		.enabled_endpoints(vec![
			EndpointKind::Block,
			EndpointKind::Status,
			EndpointKind::Validators,
		])
		.build()
}

async fn seed_block(store: &MemoryRecordStore, chain_id: &str, height: u64) {
	store
		.upsert(&CollectedRecord::new(
			chain_id,
			height,
			EndpointKind::Block,
			json!({}),
			0,
		))
		.await
		.unwrap();
}

#[tokio::test]
async fn first_run_collects_only_the_tip() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(5)));
	client
		.expect_get_block()
		.with(eq(5))
		.times(1)
		.returning(|h| Ok(block_at(h)));

	let store = MemoryRecordStore::new();
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&base_chain(), &client, &store, &rx).await.unwrap();

	assert_eq!(summary.tip_height, 5);
	assert_eq!(summary.heights_processed, vec![5]);
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![5]);
	assert_eq!(store.heights_for("test-chain-1", "status"), vec![5]);
	assert_eq!(summary.store_failures, 0);
}

#[tokio::test]
async fn catch_up_collects_the_missing_range_ascending() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(8)));
	client
		.expect_get_block()
		.times(3)
		.returning(|h| Ok(block_at(h)));

	let store = MemoryRecordStore::new();
	seed_block(&store, "test-chain-1", 5).await;
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&base_chain(), &client, &store, &rx).await.unwrap();

	assert_eq!(summary.heights_processed, vec![6, 7, 8]);
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![5, 6, 7, 8]);
	assert_eq!(store.latest_block_height("test-chain-1").await, Some(8));
}

#[tokio::test]
async fn large_gap_is_capped_per_pass() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(500)));
	client
		.expect_get_block()
		.times(MAX_BLOCKS_PER_PASS as usize)
		.returning(|h| Ok(block_at(h)));

	let store = MemoryRecordStore::new();
	seed_block(&store, "test-chain-1", 100).await;
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&base_chain(), &client, &store, &rx).await.unwrap();

	let expected: Vec<u64> = (101..=200).collect();
	assert_eq!(summary.heights_processed, expected);
	assert_eq!(store.latest_block_height("test-chain-1").await, Some(200));
}

#[tokio::test]
async fn caught_up_chain_stores_status_only() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(8)));
	client.expect_get_block().times(0);

	let store = MemoryRecordStore::new();
	seed_block(&store, "test-chain-1", 8).await;
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&base_chain(), &client, &store, &rx).await.unwrap();

	assert!(summary.heights_processed.is_empty());
	assert_eq!(store.heights_for("test-chain-1", "status"), vec![8]);
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![8]);
}

#[tokio::test]
async fn validators_failure_does_not_block_the_pass() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(6)));
	client.expect_get_block().returning(|h| Ok(block_at(h)));
	client.expect_get_validators().returning(|_| {
		Err(ClientErrorFixture::remote())
	});

	let store = MemoryRecordStore::new();
	seed_block(&store, "test-chain-1", 4).await;
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&chain_with_validators(), &client, &store, &rx)
		.await
		.unwrap();

	assert_eq!(summary.heights_processed, vec![5, 6]);
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![4, 5, 6]);
	assert!(store.heights_for("test-chain-1", "validators").is_empty());
}

#[tokio::test]
async fn extension_failure_is_isolated_per_kind() {
	let chain = ChainDescriptorBuilder::new()
		.chain_id("symphony-testnet-4")
		.enabled_endpoints(vec![
			EndpointKind::Block,
			EndpointKind::Status,
			EndpointKind::TaxRate,
			EndpointKind::MarketParams,
		])
		.build();

	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(3)));
	client.expect_get_block().returning(|h| Ok(block_at(h)));
	client
		.expect_fetch_extension()
		.with(eq(EndpointKind::TaxRate))
		.returning(|_| Err(ClientErrorFixture::remote()));
	client
		.expect_fetch_extension()
		.with(eq(EndpointKind::MarketParams))
		.returning(|_| Ok(json!({"params": {}})));

	let store = MemoryRecordStore::new();
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&chain, &client, &store, &rx).await.unwrap();

	assert_eq!(summary.heights_processed, vec![3]);
	assert_eq!(
		store.heights_for("symphony-testnet-4", "market_params"),
		vec![3]
	);
	assert!(store.heights_for("symphony-testnet-4", "tax_rate").is_empty());
	assert_eq!(store.heights_for("symphony-testnet-4", "block"), vec![3]);
}

#[tokio::test]
async fn store_failures_are_counted_not_fatal() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(5)));
	client.expect_get_block().returning(|h| Ok(block_at(h)));

	let store = MemoryRecordStore::new();
	store.fail_writes(true);
	let (_tx, rx) = watch::channel(false);

	let summary = run_pass(&base_chain(), &client, &store, &rx).await.unwrap();

	assert_eq!(summary.records_stored, 0);
	assert_eq!(summary.store_failures, 2); // status and block
}

#[tokio::test]
async fn status_fetch_failure_aborts_the_pass() {
	let mut client = MockChainClient::new();
	client
		.expect_get_status()
		.returning(|| Err(ClientErrorFixture::network()));
	client.expect_get_block().times(0);

	let store = MemoryRecordStore::new();
	let (_tx, rx) = watch::channel(false);

	let result = run_pass(&base_chain(), &client, &store, &rx).await;

	assert!(matches!(result, Err(CollectorError::StatusFetch(_))));
	assert!(store.is_empty());
}

#[tokio::test]
async fn missing_tip_height_aborts_the_pass() {
	let mut client = MockChainClient::new();
	client
		.expect_get_status()
		.returning(|| Ok(json!({"sync_info": {}})));
	client.expect_get_block().times(0);

	let store = MemoryRecordStore::new();
	let (_tx, rx) = watch::channel(false);

	let result = run_pass(&base_chain(), &client, &store, &rx).await;

	assert!(matches!(result, Err(CollectorError::MalformedStatus(_))));
	assert!(store.is_empty());
}

#[tokio::test]
async fn block_fetch_failure_keeps_earlier_progress() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(8)));
	client
		.expect_get_block()
		.with(eq(6))
		.returning(|h| Ok(block_at(h)));
	client
		.expect_get_block()
		.with(eq(7))
		.returning(|_| Err(ClientErrorFixture::network()));

	let store = MemoryRecordStore::new();
	seed_block(&store, "test-chain-1", 5).await;
	let (_tx, rx) = watch::channel(false);

	let result = run_pass(&base_chain(), &client, &store, &rx).await;

	assert!(matches!(result, Err(CollectorError::BlockFetch(_))));
	// 6 survived, 7 and 8 were never stored
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![5, 6]);
	assert_eq!(store.latest_block_height("test-chain-1").await, Some(6));
}

#[tokio::test]
async fn shutdown_mid_backlog_keeps_completed_heights_only() {
	let (tx, rx) = watch::channel(false);
	let tx = Arc::new(tx);

	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(9)));
	// Shutdown is requested while the first height is being processed; the
	// collector must notice it before starting the next height
	let shutdown_tx = tx.clone();
	client.expect_get_block().times(1).returning(move |h| {
		let _ = shutdown_tx.send(true);
		Ok(block_at(h))
	});

	let store = MemoryRecordStore::new();
	seed_block(&store, "test-chain-1", 5).await;

	let summary = run_pass(&base_chain(), &client, &store, &rx).await.unwrap();

	assert_eq!(summary.heights_processed, vec![6]);
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![5, 6]);
}

#[tokio::test]
async fn rerunning_a_pass_is_idempotent() {
	let mut client = MockChainClient::new();
	client.expect_get_status().returning(|| Ok(status_at(5)));
	client
		.expect_get_block()
		.with(eq(5))
		.times(1)
		.returning(|h| Ok(block_at(h)));
	client
		.expect_get_validators()
		.returning(|h| Ok(validators_at(h.unwrap_or(0))));

	let store = MemoryRecordStore::new();
	let (_tx, rx) = watch::channel(false);

	let chain = chain_with_validators();
	run_pass(&chain, &client, &store, &rx).await.unwrap();
	let records_after_first = store.len();

	// Second pass at the same tip stores status again and walks no heights
	run_pass(&chain, &client, &store, &rx).await.unwrap();

	assert_eq!(store.len(), records_after_first);
	assert_eq!(store.heights_for("test-chain-1", "block"), vec![5]);
}

/// Builders for client errors used across scenarios
struct ClientErrorFixture;

impl ClientErrorFixture {
	fn remote() -> chainpulse::services::client::ClientError {
		chainpulse::services::client::ClientError::remote_error("simulated 503", None, None)
	}

	fn network() -> chainpulse::services::client::ClientError {
		chainpulse::services::client::ClientError::network_error("simulated timeout", None, None)
	}
}
