//! Scheduling scenarios: bounded parallelism, per-chain pacing, failure
//! isolation, and cooperative shutdown.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};
use tokio::sync::watch;

use chainpulse::{
	models::{ChainDescriptor, EndpointKind},
	services::{
		client::{ChainClient, ClientError},
		scheduler::{ClientFactory, CollectionScheduler},
	},
	utils::tests::{builders::chain::ChainDescriptorBuilder, MemoryRecordStore},
};

use super::mocks::{block_at, status_at};

/// Tracks concurrent client lifetimes and total passes started
#[derive(Default)]
struct Gauge {
	current: AtomicUsize,
	max: AtomicUsize,
	passes: AtomicUsize,
}

/// A chain client with scripted behavior for scheduler tests
struct FakeClient {
	fail_status: bool,
	delay: Duration,
	gauge: Option<Arc<Gauge>>,
}

#[async_trait]
impl ChainClient for FakeClient {
	async fn get_status(&self) -> Result<Value, ClientError> {
		tokio::time::sleep(self.delay).await;
		if self.fail_status {
			return Err(ClientError::network_error("simulated outage", None, None));
		}
		Ok(status_at(1))
	}

	async fn get_block(&self, height: u64) -> Result<Value, ClientError> {
		Ok(block_at(height))
	}

	async fn get_validators(&self, _height: Option<u64>) -> Result<Value, ClientError> {
		Ok(json!({"validators": []}))
	}
}

impl Drop for FakeClient {
	fn drop(&mut self) {
		if let Some(gauge) = &self.gauge {
			gauge.current.fetch_sub(1, Ordering::SeqCst);
		}
	}
}

fn gauged_factory(gauge: Arc<Gauge>, delay: Duration) -> Arc<ClientFactory> {
	Arc::new(move |_chain: &ChainDescriptor| {
		let in_flight = gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
		gauge.max.fetch_max(in_flight, Ordering::SeqCst);
		gauge.passes.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(FakeClient {
			fail_status: false,
			delay,
			gauge: Some(gauge.clone()),
		}))
	})
}

fn simple_chain(chain_id: &str) -> ChainDescriptor {
	ChainDescriptorBuilder::new()
		.chain_id(chain_id)
		.enabled_endpoints(vec![EndpointKind::Block, EndpointKind::Status])
		.build()
}

#[tokio::test]
async fn parallelism_never_exceeds_the_configured_cap() {
	let chains: Vec<ChainDescriptor> = (0..20)
		.map(|i| simple_chain(&format!("chain-{}", i)))
		.collect();
	let gauge = Arc::new(Gauge::default());
	let store = Arc::new(MemoryRecordStore::new());

	let scheduler = CollectionScheduler::new(
		chains,
		store.clone(),
		gauged_factory(gauge.clone(), Duration::from_millis(25)),
		Duration::from_secs(60),
		5,
	);

	let (tx, rx) = watch::channel(false);
	let handle = tokio::spawn(async move { scheduler.run(rx).await });

	tokio::time::sleep(Duration::from_millis(500)).await;
	let _ = tx.send(true);
	handle.await.unwrap();

	assert_eq!(gauge.passes.load(Ordering::SeqCst), 20);
	assert!(
		gauge.max.load(Ordering::SeqCst) <= 5,
		"observed {} concurrent passes",
		gauge.max.load(Ordering::SeqCst)
	);
	// Every chain got its first-run records
	for i in 0..20 {
		let chain_id = format!("chain-{}", i);
		assert_eq!(store.heights_for(&chain_id, "block"), vec![1]);
		assert_eq!(store.heights_for(&chain_id, "status"), vec![1]);
	}
}

#[tokio::test]
async fn one_failing_chain_does_not_affect_the_others() {
	let chains = vec![simple_chain("good-1"), simple_chain("bad-1"), simple_chain("good-2")];
	let store = Arc::new(MemoryRecordStore::new());

	let factory: Arc<ClientFactory> = Arc::new(|chain: &ChainDescriptor| {
		Ok(Box::new(FakeClient {
			fail_status: chain.chain_id == "bad-1",
			delay: Duration::ZERO,
			gauge: None,
		}))
	});

	let scheduler = CollectionScheduler::new(
		chains,
		store.clone(),
		factory,
		Duration::from_secs(60),
		5,
	);

	let (tx, rx) = watch::channel(false);
	let handle = tokio::spawn(async move { scheduler.run(rx).await });

	tokio::time::sleep(Duration::from_millis(300)).await;
	let _ = tx.send(true);
	handle.await.unwrap();

	assert_eq!(store.heights_for("good-1", "status"), vec![1]);
	assert_eq!(store.heights_for("good-2", "status"), vec![1]);
	assert!(store.heights_for("bad-1", "status").is_empty());
}

#[tokio::test]
async fn chains_are_paced_by_their_own_interval() {
	let slow = ChainDescriptorBuilder::new()
		.chain_id("slow-1")
		.enabled_endpoints(vec![EndpointKind::Block, EndpointKind::Status])
		.polling_interval_secs(3600)
		.build();
	let fast = ChainDescriptorBuilder::new()
		.chain_id("fast-1")
		.enabled_endpoints(vec![EndpointKind::Block, EndpointKind::Status])
		.polling_interval_secs(1)
		.build();

	let slow_passes = Arc::new(AtomicUsize::new(0));
	let fast_passes = Arc::new(AtomicUsize::new(0));
	let store = Arc::new(MemoryRecordStore::new());

	let factory: Arc<ClientFactory> = {
		let slow_passes = slow_passes.clone();
		let fast_passes = fast_passes.clone();
		Arc::new(move |chain: &ChainDescriptor| {
			if chain.chain_id == "slow-1" {
				slow_passes.fetch_add(1, Ordering::SeqCst);
			} else {
				fast_passes.fetch_add(1, Ordering::SeqCst);
			}
			Ok(Box::new(FakeClient {
				fail_status: false,
				delay: Duration::ZERO,
				gauge: None,
			}))
		})
	};

	let scheduler = CollectionScheduler::new(
		vec![slow, fast],
		store,
		factory,
		Duration::from_secs(60),
		5,
	);

	let (tx, rx) = watch::channel(false);
	let handle = tokio::spawn(async move { scheduler.run(rx).await });

	tokio::time::sleep(Duration::from_millis(2500)).await;
	let _ = tx.send(true);
	handle.await.unwrap();

	assert_eq!(slow_passes.load(Ordering::SeqCst), 1);
	assert!(fast_passes.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn shutdown_stops_the_loop_promptly() {
	let store = Arc::new(MemoryRecordStore::new());
	let factory: Arc<ClientFactory> = Arc::new(|_chain: &ChainDescriptor| {
		Ok(Box::new(FakeClient {
			fail_status: false,
			delay: Duration::ZERO,
			gauge: None,
		}))
	});

	let scheduler = CollectionScheduler::new(
		vec![simple_chain("chain-1")],
		store,
		factory,
		Duration::from_secs(60),
		5,
	);

	let (tx, rx) = watch::channel(false);
	let handle = tokio::spawn(async move { scheduler.run(rx).await });

	tokio::time::sleep(Duration::from_millis(100)).await;
	let _ = tx.send(true);

	tokio::time::timeout(Duration::from_secs(5), handle)
		.await
		.expect("scheduler did not stop after shutdown")
		.unwrap();
}
