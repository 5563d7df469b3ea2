use serde::{Deserialize, Serialize};

/// A data endpoint that can be collected for a chain.
///
/// The base kinds (`Block`, `Status`, `Validators`) are served by every
/// supported chain; the remaining kinds are capability extensions only some
/// chain families provide. The serialized snake_case form doubles as the
/// record tag under which collected payloads are stored.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
	/// Full block data at a height
	Block,
	/// Node status, including the current tip height
	Status,
	/// The validator set at a height
	Validators,
	/// Market module parameters (Symphony chain family)
	MarketParams,
	/// Exchange requirements (Symphony chain family)
	ExchangeRequirements,
	/// Current tax rate (Symphony chain family)
	TaxRate,
	/// Circulating note supply (Symphony chain family)
	NoteSupply,
}

impl EndpointKind {
	/// Returns the snake_case tag this endpoint's records are stored under
	pub fn as_tag(&self) -> &'static str {
		match self {
			Self::Block => "block",
			Self::Status => "status",
			Self::Validators => "validators",
			Self::MarketParams => "market_params",
			Self::ExchangeRequirements => "exchange_requirements",
			Self::TaxRate => "tax_rate",
			Self::NoteSupply => "note_supply",
		}
	}

	/// Whether this endpoint is a capability extension rather than a base kind
	pub fn is_extension(&self) -> bool {
		!matches!(self, Self::Block | Self::Status | Self::Validators)
	}
}

/// Configuration for connecting to and collecting from a blockchain network.
///
/// Defines connection details and operational parameters for one chain. Each
/// descriptor is loaded from its own JSON file in the chains config directory.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChainDescriptor {
	/// Unique identifier for this chain (e.g. "symphony-testnet-4")
	pub chain_id: String,

	/// Human-readable name of the chain
	pub name: String,

	/// Base URL of the chain's REST API
	pub rest_url: String,

	/// Base URL of the chain's JSON-RPC API
	pub rpc_url: String,

	/// Endpoints to collect for this chain
	pub enabled_endpoints: Vec<EndpointKind>,

	/// Seconds between collection passes; falls back to the process-wide
	/// default when absent
	pub polling_interval_secs: Option<u64>,
}

impl ChainDescriptor {
	/// Returns the enabled extension endpoints, in configuration order
	pub fn enabled_extensions(&self) -> impl Iterator<Item = EndpointKind> + '_ {
		self.enabled_endpoints
			.iter()
			.copied()
			.filter(EndpointKind::is_extension)
	}

	/// Whether the given endpoint is enabled for this chain
	pub fn is_enabled(&self, kind: EndpointKind) -> bool {
		self.enabled_endpoints.contains(&kind)
	}
}
