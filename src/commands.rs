//! CLI command definitions
//!
//! Defines the clap commands for the api-scenario CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario file
    Run(RunArgs),

    /// Print the version
    Version,
}

/// Options of the `run` command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Scenario file (JSON or YAML)
    #[arg(long, short = 's')]
    pub scenario: PathBuf,

    /// Header sent with every request, replacing the scenario's own
    /// Can be specified multiple times: -H "Accept: application/json"
    #[arg(long = "header", short = 'H', value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Variable available before the first step
    /// Can be specified multiple times: -V "base_url: http://localhost:8080"
    #[arg(long = "variable", short = 'V', value_name = "NAME:VALUE")]
    pub variables: Vec<String>,

    /// Token sent as `Authorization: Bearer <token>`
    #[arg(long, short = 't')]
    pub authorization_token: Option<String>,

    /// Write the scenario result to this file
    #[arg(long, short = 'f')]
    pub output_file: Option<PathBuf>,

    /// Format of the result file: json or yaml
    #[arg(long)]
    pub output_format: Option<String>,

    /// Only print errors
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Print debug diagnostics
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}
