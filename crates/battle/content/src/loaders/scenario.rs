//! Match scenario loader.
//!
//! Scenarios are RON documents describing the board, the climate, the RNG
//! seed and both squads. Loading validates the scenario by building it once,
//! so a scenario that loads is guaranteed to produce a battlefield.

use std::path::Path;

use battle_core::Scenario;

use crate::loaders::{LoadResult, read_file};

/// Loader for match scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load and validate a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Parse and validate a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        scenario
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid scenario: {}", e))?;

        Ok(scenario)
    }
}
