//! Chain configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for chain descriptors,
//! allowing chain definitions to be loaded from JSON files.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path};
use url::Url;

use crate::{
	models::{config::error::ConfigError, ChainDescriptor, ConfigLoader},
	utils::normalize_string,
};

#[async_trait]
impl ConfigLoader for ChainDescriptor {
	/// Load all chain configurations from a directory
	///
	/// Reads and parses all JSON files in the specified directory (or default
	/// config directory) as chain descriptors.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let chain_dir = path.unwrap_or(Path::new("config/chains"));
		let mut pairs = Vec::new();

		if !chain_dir.exists() {
			return Err(ConfigError::file_error(
				"chains directory not found",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					chain_dir.display().to_string(),
				)])),
			));
		}

		for entry in std::fs::read_dir(chain_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read chains directory: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					chain_dir.display().to_string(),
				)])),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"path".to_string(),
						chain_dir.display().to_string(),
					)])),
				)
			})?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let chain = Self::load_from_path(&path).await?;

			let existing_chains: Vec<&ChainDescriptor> =
				pairs.iter().map(|(_, chain)| chain).collect();
			// Check chain identity uniqueness before pushing
			Self::validate_uniqueness(&existing_chains, &chain, &path.display().to_string())?;

			pairs.push((name, chain));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a chain configuration from a specific file
	///
	/// Reads and parses a single JSON file as a chain descriptor.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open chain config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;
		let config: ChainDescriptor = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse chain config: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		// Validate the config after loading
		config.validate()?;

		Ok(config)
	}

	/// Validate the chain configuration
	///
	/// Ensures that:
	/// - The chain has a non-empty id and name
	/// - The REST and RPC base URLs parse as http(s) URLs
	/// - At least one endpoint is enabled
	/// - The polling interval, when set, is greater than zero
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate chain id
		if self.chain_id.is_empty() {
			return Err(ConfigError::validation_error(
				"Chain id is required",
				None,
				None,
			));
		}

		// Validate chain name
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Chain name is required",
				None,
				None,
			));
		}

		// Validate base URLs
		for (label, raw) in [("rest_url", &self.rest_url), ("rpc_url", &self.rpc_url)] {
			let url = Url::parse(raw).map_err(|e| {
				ConfigError::validation_error(
					format!("Invalid {}: {}", label, e),
					Some(Box::new(e)),
					Some(HashMap::from([
						("chain_id".to_string(), self.chain_id.clone()),
						(label.to_string(), raw.clone()),
					])),
				)
			})?;

			if url.scheme() != "http" && url.scheme() != "https" {
				return Err(ConfigError::validation_error(
					format!("{} must use http or https", label),
					None,
					Some(HashMap::from([
						("chain_id".to_string(), self.chain_id.clone()),
						(label.to_string(), raw.clone()),
					])),
				));
			}
		}

		// Validate enabled endpoints
		if self.enabled_endpoints.is_empty() {
			return Err(ConfigError::validation_error(
				"At least one endpoint must be enabled",
				None,
				Some(HashMap::from([(
					"chain_id".to_string(),
					self.chain_id.clone(),
				)])),
			));
		}

		// Validate polling interval
		if let Some(interval) = self.polling_interval_secs {
			if interval == 0 {
				return Err(ConfigError::validation_error(
					"polling_interval_secs must be greater than 0",
					None,
					Some(HashMap::from([(
						"chain_id".to_string(),
						self.chain_id.clone(),
					)])),
				));
			}
		}

		// Log a warning if the chain uses an insecure protocol
		self.validate_protocol();

		Ok(())
	}

	/// Validate the safety of the protocol used by the chain endpoints
	///
	/// Returns if safe, or logs a warning message if unsafe.
	fn validate_protocol(&self) {
		if self.rest_url.starts_with("http://") {
			tracing::warn!(
				"Chain '{}' uses an insecure REST URL: {}",
				self.chain_id,
				self.rest_url
			);
		}
		if self.rpc_url.starts_with("http://") {
			tracing::warn!(
				"Chain '{}' uses an insecure RPC URL: {}",
				self.chain_id,
				self.rpc_url
			);
		}
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		if instances.iter().any(|existing_chain| {
			normalize_string(&existing_chain.chain_id) == normalize_string(&current_instance.chain_id)
		}) {
			return Err(ConfigError::validation_error(
				format!(
					"Duplicate chain_id found: '{}'",
					current_instance.chain_id
				),
				None,
				Some(HashMap::from([
					("chain_id".to_string(), current_instance.chain_id.clone()),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}
		Ok(())
	}
}
