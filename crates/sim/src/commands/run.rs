use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::{ContentFactory, ScenarioLoader, TablesLoader};
use battle_core::{BattleEngine, BattleEnv, Battlefield, PcgRng};
use clap::Args;
use tracing::info;

/// Simulate a scenario to completion
#[derive(Args)]
pub struct Run {
    /// Content directory (defaults to the bundled data)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Scenario name inside the content directory
    #[arg(short, long, default_value = "skirmish", conflicts_with = "file")]
    scenario: String,

    /// Scenario RON file outside the content directory
    #[arg(long)]
    file: Option<PathBuf>,

    /// Balance tables TOML file (overrides the content directory's)
    #[arg(long)]
    tables: Option<PathBuf>,

    /// RNG seed (overrides the scenario's)
    #[arg(long)]
    seed: Option<u64>,

    /// Time step in milliseconds
    #[arg(long, default_value_t = 50)]
    dt: u32,

    /// Time limit in milliseconds
    #[arg(long, default_value_t = 120_000)]
    max_ms: u32,

    /// Print the replay log as JSON
    #[arg(long)]
    events: bool,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let data_dir = self.data.clone().unwrap_or_else(super::default_data_dir);
        let factory = ContentFactory::new(data_dir);

        let tables = match &self.tables {
            Some(path) => TablesLoader::load(path)?,
            None => factory.load_tables()?,
        };
        let mut scenario = match &self.file {
            Some(path) => ScenarioLoader::load(path)?,
            None => factory.load_scenario(&self.scenario)?,
        };
        if let Some(seed) = self.seed {
            scenario.seed = seed;
        }

        let mut field = scenario.build().context("Failed to build scenario")?;
        let mut rng = PcgRng::new(scenario.seed);
        info!(
            seed = scenario.seed,
            climate = %scenario.climate,
            combatants = scenario.combatants.len(),
            "starting match"
        );

        let env = BattleEnv::new(&tables, scenario.climate);
        let report = BattleEngine::new(&mut field, env, &mut rng).run(self.dt, self.max_ms);

        if self.events {
            let json = serde_json::to_string_pretty(field.events())
                .context("Failed to serialize replay log")?;
            println!("{}", json);
            return Ok(());
        }

        println!(
            "outcome: {:?} after {} ms ({} ticks){}",
            report.outcome,
            report.elapsed_ms,
            report.ticks,
            if report.timed_out { ", timed out" } else { "" }
        );
        print_roster(&field);
        Ok(())
    }
}

fn print_roster(field: &Battlefield) {
    println!(
        "{:<5} {:<5} {:>9} {:>5} {:<10} {:>7} {:>5} {:>7}",
        "id", "team", "life", "mana", "state", "attacks", "crits", "doubles"
    );
    for c in field.combatants() {
        println!(
            "{:<5} {:<5} {:>4}/{:<4} {:>5} {:<10} {:>7} {:>5} {:>7}",
            c.id.to_string(),
            c.team.as_ref(),
            c.life,
            c.stats.max_life,
            c.mana,
            c.behavior.as_ref(),
            c.counters.attack_count,
            c.counters.crit_count,
            c.counters.double_attack_count
        );
    }
}
