use std::path::PathBuf;

use anyhow::Result;
use battle_content::ContentFactory;
use clap::Args;

/// List available scenarios
#[derive(Args)]
pub struct List {
    /// Content directory (defaults to the bundled data)
    #[arg(long)]
    data: Option<PathBuf>,
}

impl List {
    pub fn execute(self) -> Result<()> {
        let data_dir = self.data.unwrap_or_else(super::default_data_dir);
        let factory = ContentFactory::new(data_dir);

        for name in factory.scenario_names()? {
            match factory.load_scenario(&name) {
                Ok(scenario) => println!(
                    "{:<16} {}x{} {:<10} {} combatants",
                    name,
                    scenario.board.board_width,
                    scenario.board.board_height,
                    scenario.climate,
                    scenario.combatants.len()
                ),
                Err(e) => println!("{:<16} invalid: {:#}", name, e),
            }
        }
        Ok(())
    }
}
