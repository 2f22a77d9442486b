//! Command-line match runner.
//!
//! Loads balance tables and a scenario from a content directory, runs the
//! match with a seeded RNG stream and prints the result. Run with:
//! `cargo run -p battle-sim -- run --scenario skirmish`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{List, Run};

/// Autobattler match runner
#[derive(Parser)]
#[command(name = "battle-sim")]
#[command(about = "Run autobattler matches from content files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Simulate a scenario to completion
    Run(Run),

    /// List the scenarios of a content directory
    List(List),
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::List(cmd) => cmd.execute(),
    }
}

/// Logs to stderr so stdout only carries the match output.
fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
