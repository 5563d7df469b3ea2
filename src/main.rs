//! Blockchain data collection daemon entry point.
//!
//! This binary provides the main entry point for the collection daemon. It
//! loads the configured chains, connects to the record store, starts the
//! collection scheduler, and handles graceful shutdown on interrupt signals.
//!
//! # Flow
//! 1. Loads process settings from the environment and chain descriptors from
//!    the config directory
//! 2. Connects to the record store and ensures indexes
//! 3. Runs collection cycles across all chains with bounded parallelism
//! 4. Handles graceful shutdown on Ctrl+C

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{create_client_factory, initialize_storage, load_configuration, Result},
	services::scheduler::CollectionScheduler,
	utils::logging::setup_logging,
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::env::{set_var, var};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Parser)]
#[command(
	name = "chainpulse",
	about = "A blockchain data collection daemon that polls configured chains for status, block, and validator data and persists it idempotently to a document store.",
	version
)]
struct Cli {
	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Path to the chain configuration directory (default: config/chains/)
	#[arg(long, value_name = "PATH")]
	config_path: Option<PathBuf>,

	/// Validate configuration files without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		// Override any existing environment variables
		dotenv_override().ok();

		// Log file mode - override if CLI flag is set
		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		// Set log level from RUST_LOG if it exists
		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		// Log level - override if CLI flag is set
		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		// Log path - override if CLI flag is set
		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}
	}
}

/// Main entry point for the collection daemon.
///
/// # Errors
/// Returns an error if configuration loading fails or the record store is
/// unreachable.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Apply CLI options to environment
	cli.apply_to_env();

	// Setup logging to stdout
	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	// If --check flag is provided, only validate configuration and exit
	if cli.check {
		validate_configuration(cli.config_path.as_deref()).await;
		return Ok(());
	}

	let (config, chains) = load_configuration(cli.config_path.as_deref())
		.await
		.map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

	if chains.is_empty() {
		info!("No chains configured. Exiting...");
		return Ok(());
	}

	let store = initialize_storage(&config)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to connect to the record store: {}", e))?;

	let client_factory = create_client_factory(&config);

	let scheduler = CollectionScheduler::new(
		chains,
		store,
		client_factory,
		Duration::from_secs(config.default_polling_interval),
		config.max_parallel_chains,
	);

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let scheduler_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

	info!("Service started. Press Ctrl+C to shutdown");

	let ctrl_c = tokio::signal::ctrl_c();
	if let Err(e) = ctrl_c.await {
		error!("Error waiting for Ctrl+C: {}", e);
	}
	info!("Shutdown signal received, stopping services...");

	let _ = shutdown_tx.send(true);

	if let Err(e) = scheduler_handle.await {
		error!("Error during shutdown: {}", e);
	}

	info!("Shutdown complete");
	Ok(())
}

/// Validates configuration files and their structure
async fn validate_configuration(config_path: Option<&Path>) {
	info!("Validating configuration files...");

	match load_configuration(config_path).await {
		Ok((config, chains)) => {
			info!("✓ Process configuration loaded successfully");

			if chains.is_empty() {
				error!("No chains configured. Add chain descriptor files to the config directory.");
				return;
			}
			info!("✓ Found {} configured chain(s)", chains.len());

			for chain in &chains {
				let interval = chain
					.polling_interval_secs
					.unwrap_or(config.default_polling_interval);
				info!(
					"✓ Chain '{}' ({}): {} endpoint(s), polling every {}s",
					chain.chain_id,
					chain.name,
					chain.enabled_endpoints.len(),
					interval
				);
			}

			info!("Configuration validation completed successfully!");
		}
		Err(e) => {
			error!("Configuration validation failed: {}", e);
		}
	}
}
