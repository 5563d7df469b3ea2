//! Bootstrap module for loading configuration and wiring services.
//!
//! This module provides the startup steps shared by the daemon and the
//! `--check` validation mode:
//!
//! - `load_configuration`: reads process settings from the environment and
//!   chain descriptors from the config directory
//! - `initialize_storage`: connects to the record store and ensures indexes
//! - `create_client_factory`: builds the per-pass chain client factory

use std::{collections::HashMap, error::Error, path::Path, sync::Arc};

use crate::{
	models::{AppConfig, ChainDescriptor, ConfigLoader},
	services::{client::create_client, scheduler::ClientFactory, storage::MongoRecordStore},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Loads the process configuration and all chain descriptors.
///
/// # Arguments
/// * `config_path` - Directory holding chain descriptor JSON files; the
///   default config directory when `None`
///
/// # Returns
/// The process configuration and the configured chains.
///
/// # Errors
/// Returns an error if the environment settings are invalid or any chain
/// descriptor fails to load or validate.
pub async fn load_configuration(
	config_path: Option<&Path>,
) -> Result<(AppConfig, Vec<ChainDescriptor>)> {
	let config = AppConfig::from_env()?;

	let chains: HashMap<String, ChainDescriptor> = ChainDescriptor::load_all(config_path).await?;
	let mut chains: Vec<ChainDescriptor> = chains.into_values().collect();
	// Deterministic cycle order regardless of directory iteration order
	chains.sort_by(|a, b| a.chain_id.cmp(&b.chain_id));

	Ok((config, chains))
}

/// Connects to the record store configured in the environment.
///
/// # Errors
/// Returns an error if the store is unreachable; the process cannot run
/// without it.
pub async fn initialize_storage(config: &AppConfig) -> Result<Arc<MongoRecordStore>> {
	let store = MongoRecordStore::connect(&config.mongodb_uri, &config.mongodb_db_name).await?;
	Ok(Arc::new(store))
}

/// Creates the factory the scheduler uses to build one client per pass
pub fn create_client_factory(config: &AppConfig) -> Arc<ClientFactory> {
	let retry = config.retry.clone();
	let timeout = config.request_timeout;
	Arc::new(move |chain: &ChainDescriptor| create_client(chain, &retry, timeout))
}
