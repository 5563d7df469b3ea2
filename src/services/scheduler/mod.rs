//! Collection cycle scheduling across all configured chains.
//!
//! Each cycle spawns one task per due chain, gated by a semaphore so at most
//! `max_parallel_chains` passes run at once. A cycle awaits all of its passes
//! before the next cycle starts, so passes for one chain never overlap. The
//! loop observes a watch channel for cooperative shutdown, including during
//! the inter-cycle sleep.

use std::{
	collections::HashMap,
	sync::Arc,
	time::{Duration, Instant},
};
use tokio::sync::{watch, Semaphore};
use tracing::{debug, info, warn};

use crate::{
	models::ChainDescriptor,
	services::{
		client::{ChainClient, ClientError},
		collector::{run_pass, CollectorError, PassSummary},
		storage::RecordStore,
	},
};

/// Creates a chain client for one collection pass.
///
/// The returned client is dropped when the pass finishes, releasing its
/// connection pool.
pub type ClientFactory =
	dyn Fn(&ChainDescriptor) -> Result<Box<dyn ChainClient>, ClientError> + Send + Sync;

/// Pause between due-checks; keeps shutdown latency low without busy-looping
const CYCLE_TICK: Duration = Duration::from_secs(1);

/// Drives collection cycles across all configured chains
pub struct CollectionScheduler<S: RecordStore + 'static> {
	chains: Vec<ChainDescriptor>,
	store: Arc<S>,
	client_factory: Arc<ClientFactory>,
	default_interval: Duration,
	slots: Arc<Semaphore>,
}

impl<S: RecordStore + 'static> CollectionScheduler<S> {
	/// Creates a scheduler over the given chains.
	///
	/// # Arguments
	/// * `chains` - Chains to collect
	/// * `store` - Shared record store
	/// * `client_factory` - Creates a fresh client per pass
	/// * `default_interval` - Polling interval for chains without their own
	/// * `max_parallel_chains` - Concurrent pass ceiling, reused across cycles
	pub fn new(
		chains: Vec<ChainDescriptor>,
		store: Arc<S>,
		client_factory: Arc<ClientFactory>,
		default_interval: Duration,
		max_parallel_chains: usize,
	) -> Self {
		Self {
			chains,
			store,
			client_factory,
			default_interval,
			slots: Arc::new(Semaphore::new(max_parallel_chains)),
		}
	}

	/// Runs collection cycles until shutdown is signalled.
	pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
		let mut last_pass: HashMap<String, Instant> = HashMap::new();

		info!(
			"Scheduler started for {} chains ({} parallel)",
			self.chains.len(),
			self.slots.available_permits()
		);

		loop {
			if *shutdown.borrow() {
				break;
			}

			let cycle_started = Instant::now();
			let passes = self.run_cycle(&mut last_pass, &shutdown).await;
			if passes > 0 {
				info!(
					"Collection cycle completed in {:?} ({} passes)",
					cycle_started.elapsed(),
					passes
				);
			}

			tokio::select! {
				_ = shutdown.changed() => {
					if *shutdown.borrow() {
						break;
					}
				}
				_ = tokio::time::sleep(CYCLE_TICK) => {}
			}
		}

		info!("Scheduler stopped");
	}

	/// Runs one cycle: spawns a pass for every due chain and awaits them all.
	///
	/// Returns the number of passes started.
	async fn run_cycle(
		&self,
		last_pass: &mut HashMap<String, Instant>,
		shutdown: &watch::Receiver<bool>,
	) -> usize {
		let now = Instant::now();
		let mut handles = Vec::new();

		for chain in &self.chains {
			if *shutdown.borrow() {
				break;
			}

			let interval = chain
				.polling_interval_secs
				.map(Duration::from_secs)
				.unwrap_or(self.default_interval);
			if !is_due(last_pass.get(&chain.chain_id), now, interval) {
				continue;
			}
			last_pass.insert(chain.chain_id.clone(), now);

			let permit = match self.slots.clone().acquire_owned().await {
				Ok(permit) => permit,
				Err(_) => break,
			};

			let chain = chain.clone();
			let store = self.store.clone();
			let factory = self.client_factory.clone();
			let shutdown = shutdown.clone();

			handles.push(tokio::spawn(async move {
				let _permit = permit;
				let result = run_chain_pass(&chain, factory.as_ref(), store.as_ref(), &shutdown).await;
				(chain.chain_id, result)
			}));
		}

		let passes = handles.len();
		for handle in handles {
			match handle.await {
				Ok((chain_id, Ok(summary))) => {
					debug!(
						"Chain '{}': pass stored {} records at tip {}",
						chain_id, summary.records_stored, summary.tip_height
					);
				}
				Ok((chain_id, Err(e))) => {
					warn!("Pass for chain '{}' failed: {}", chain_id, e);
				}
				Err(e) => {
					// A panicking pass is contained here; other chains are unaffected
					warn!("Collection task panicked: {}", e);
				}
			}
		}

		passes
	}
}

/// Whether a chain's polling interval has elapsed since its last pass start
fn is_due(last_started: Option<&Instant>, now: Instant, interval: Duration) -> bool {
	match last_started {
		None => true,
		Some(started) => now.duration_since(*started) >= interval,
	}
}

/// Creates a client for the chain and runs one pass with it
async fn run_chain_pass<S>(
	chain: &ChainDescriptor,
	factory: &ClientFactory,
	store: &S,
	shutdown: &watch::Receiver<bool>,
) -> Result<PassSummary, CollectorError>
where
	S: RecordStore + ?Sized,
{
	let client = factory(chain).map_err(|e| {
		CollectorError::client_setup_error(
			format!("failed to create client for chain '{}'", chain.chain_id),
			Some(Box::new(e)),
			None,
		)
	})?;

	// The client is dropped when this returns, releasing its connections
	run_pass(chain, client.as_ref(), store, shutdown).await
}
