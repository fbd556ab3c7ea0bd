//! api-scenario - run declarative API test scenarios
//!
//! Loads a scenario file, executes its steps against a live API, narrates
//! the results and exits non-zero when any step failed.

use api_scenario::commands::Commands;
use api_scenario::common::logging::{self, Verbosity};
use api_scenario::cli;
use clap::Parser;

#[derive(Parser)]
#[command(name = "api-scenario", about = "Run API test scenarios")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(args) => logging::init_cli(
            Verbosity::from_flags(args.quiet, args.verbose),
            !args.no_color,
        ),
        Commands::Version => logging::init_cli(Verbosity::Quiet, false),
    }

    match cli::dispatch(cli.command).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
