//! Content factory for loading match inputs from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleTables, Scenario};

use crate::loaders::{LoadResult, ScenarioLoader, TablesLoader};

/// Content factory that loads all match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tables.toml
/// └── scenarios/
///     ├── skirmish.ron
///     └── blizzard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load balance tables from `tables.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_tables(&self) -> LoadResult<BattleTables> {
        let path = self.data_dir.join("tables.toml");
        if !path.exists() {
            return Ok(BattleTables::default());
        }
        TablesLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.scenarios_dir().join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Names of the available scenarios, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.scenarios_dir();
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn scenarios_dir(&self) -> PathBuf {
        self.data_dir.join("scenarios")
    }
}
