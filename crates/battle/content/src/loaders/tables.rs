//! Balance tables loader.

use std::path::Path;

use battle_core::BattleTables;

use crate::loaders::{LoadResult, read_file};

/// Loader for balance tables from TOML files.
///
/// Every section is optional; missing sections and fields keep their
/// built-in defaults.
pub struct TablesLoader;

impl TablesLoader {
    /// Load tables from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BattleTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse tables from TOML text.
    pub fn parse(content: &str) -> LoadResult<BattleTables> {
        let tables: BattleTables = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))?;

        let speed = &tables.speed;
        anyhow::ensure!(
            speed.min_attack_speed > 0.0 && speed.min_attack_speed <= speed.max_attack_speed,
            "Invalid attack speed bounds: min {} / max {}",
            speed.min_attack_speed,
            speed.max_attack_speed
        );

        Ok(tables)
    }
}
