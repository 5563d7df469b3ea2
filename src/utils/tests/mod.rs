//! Test helper utilities
//!
//! This module contains test helper utilities for the application.
//!
//! - `builders`: Test helper utilities for creating test instances of models
//! - `store`: In-memory record store for collection tests

pub mod builders {
	pub mod chain;
}


pub use builders::*;
pub use store::*;
