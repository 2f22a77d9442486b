//! Data-driven match content and loaders.
//!
//! This crate reads the inputs of a match from disk:
//! - Balance tables (TOML)
//! - Match scenarios: board, climate, seed and squads (RON)
//!
//! All loaders deserialize battle-core types directly with serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ContentFactory, LoadResult, ScenarioLoader, TablesLoader};
