//! CLI command handling
//!
//! Builds the context, transport, and runner for a scenario, narrates the
//! run, and writes the result file.

use indexmap::IndexMap;
use std::path::Path;

use crate::commands::{Commands, RunArgs};
use crate::common::config::{Config, OutputFormat};
use crate::common::{add_bearer_prefix, split_pair, Error, Result};
use crate::context::Context;
use crate::engine::{ReqwestClient, ScenarioRunner, StepExecutor};
use crate::model::{Scenario, ScenarioResult};
use crate::report::Printer;

/// Dispatch a CLI command. Returns whether the command succeeded.
pub async fn dispatch(command: Commands) -> Result<bool> {
    match command {
        Commands::Run(args) => run(args).await,
        Commands::Version => {
            println!("api-scenario {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}

async fn run(args: RunArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    Printer::set_color(!args.no_color && config.output.color);
    let printer = Printer::new(args.quiet);

    let scenario = Scenario::from_file(&args.scenario)?;

    let mut context = Context::new();
    for (name, value) in &config.variables {
        context.add(name.clone(), value.clone());
    }
    for (name, value) in parse_pairs(&args.variables, "variable") {
        context.add(name, value);
    }

    for (name, value) in context.variables() {
        tracing::debug!("Variable {}: {}", name, value);
    }

    let client = ReqwestClient::new(&config.http)?;
    let executor =
        StepExecutor::new(Box::new(client)).with_overrides(header_overrides(&config, &args));
    for (name, value) in executor.overrides() {
        tracing::debug!("Header override {}: {}", name, value);
    }
    let mut runner = ScenarioRunner::new(executor, context);

    printer.scenario_header(&scenario);
    let result = runner
        .run_with(&scenario, |index, step| printer.step(index, step))
        .await;
    printer.summary(&result);

    if let Some(path) = &args.output_file {
        let format = args
            .output_format
            .as_deref()
            .map(OutputFormat::parse)
            .unwrap_or(config.output.format);
        write_result(&result, path, format)?;
        tracing::info!("Result saved to {}", path.display());
    }

    Ok(result.is_success())
}

/// Parse `name:value` pairs, skipping malformed ones
fn parse_pairs(pairs: &[String], what: &str) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|pair| match split_pair(pair) {
            Some(parsed) => Some(parsed),
            None => {
                tracing::warn!("Ignoring {} '{}': expected NAME:VALUE", what, pair);
                None
            }
        })
        .collect()
}

/// Headers from the config file, then `-H`, then the authorization token
fn header_overrides(config: &Config, args: &RunArgs) -> IndexMap<String, String> {
    let mut overrides: IndexMap<String, String> = IndexMap::new();
    let mut set = |name: String, value: String| {
        overrides.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        overrides.insert(name, value);
    };

    for (name, value) in &config.headers {
        set(name.clone(), value.clone());
    }
    for (name, value) in parse_pairs(&args.headers, "header") {
        set(name, value);
    }
    if let Some(token) = &args.authorization_token {
        set("Authorization".to_string(), add_bearer_prefix(token));
    }
    overrides
}

/// Serialize a result as JSON or YAML into a file
pub fn write_result(result: &ScenarioResult, path: &Path, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Yaml => serde_yaml::to_string(result)?,
    };
    std::fs::write(path, content).map_err(|e| Error::OutputWrite {
        path: path.display().to_string(),
        error: e.to_string(),
    })
}
