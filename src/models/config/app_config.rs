//! Process-wide settings read from the environment.
//!
//! All tunables have defaults so a bare environment yields a working local
//! configuration; a `.env` file is honored when present.

use std::{collections::HashMap, env, str::FromStr, time::Duration};

use crate::{models::config::error::ConfigError, utils::RetryConfig};

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_MONGODB_DB_NAME: &str = "chainpulse";
const DEFAULT_POLLING_INTERVAL_SECS: u64 = 60;
const DEFAULT_MAX_PARALLEL_CHAINS: usize = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Process-wide configuration for the collection daemon
#[derive(Debug, Clone)]
pub struct AppConfig {
	/// MongoDB connection string
	pub mongodb_uri: String,
	/// Name of the database holding collected records
	pub mongodb_db_name: String,
	/// Seconds between collection cycles for chains without their own interval
	pub default_polling_interval: u64,
	/// Maximum number of chains collected concurrently
	pub max_parallel_chains: usize,
	/// Timeout applied to every chain API request
	pub request_timeout: Duration,
	/// Retry policy for chain API requests
	pub retry: RetryConfig,
}

impl AppConfig {
	/// Builds the configuration from environment variables.
	///
	/// Recognized variables: `MONGODB_URI`, `MONGODB_DB_NAME`,
	/// `DEFAULT_POLLING_INTERVAL`, `MAX_PARALLEL_CHAINS`, `REQUEST_TIMEOUT`,
	/// `MAX_RETRIES`, `RETRY_INITIAL_BACKOFF_MS`.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut retry = RetryConfig::default();
		if let Some(max_retries) = parse_env_var::<u32>("MAX_RETRIES")? {
			retry.max_retries = max_retries;
		}
		if let Some(backoff_ms) = parse_env_var::<u64>("RETRY_INITIAL_BACKOFF_MS")? {
			retry.initial_backoff = Duration::from_millis(backoff_ms);
		}

		let config = Self {
			mongodb_uri: env::var("MONGODB_URI")
				.unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
			mongodb_db_name: env::var("MONGODB_DB_NAME")
				.unwrap_or_else(|_| DEFAULT_MONGODB_DB_NAME.to_string()),
			default_polling_interval: parse_env_var::<u64>("DEFAULT_POLLING_INTERVAL")?
				.unwrap_or(DEFAULT_POLLING_INTERVAL_SECS),
			max_parallel_chains: parse_env_var::<usize>("MAX_PARALLEL_CHAINS")?
				.unwrap_or(DEFAULT_MAX_PARALLEL_CHAINS),
			request_timeout: Duration::from_secs(
				parse_env_var::<u64>("REQUEST_TIMEOUT")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
			),
			retry,
		};

		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.default_polling_interval == 0 {
			return Err(ConfigError::validation_error(
				"DEFAULT_POLLING_INTERVAL must be greater than 0",
				None,
				None,
			));
		}
		if self.max_parallel_chains == 0 {
			return Err(ConfigError::validation_error(
				"MAX_PARALLEL_CHAINS must be greater than 0",
				None,
				None,
			));
		}
		Ok(())
	}
}

/// Parses an optional environment variable, failing on malformed values
fn parse_env_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	match env::var(key) {
		Ok(raw) => {
			let parsed = raw.parse::<T>().map_err(|e| {
				ConfigError::parse_error(
					format!("invalid value for {}: '{}'", key, raw),
					Some(Box::new(e)),
					Some(HashMap::from([(key.to_string(), raw.clone())])),
				)
			})?;
			Ok(Some(parsed))
		}
		Err(_) => Ok(None),
	}
}
