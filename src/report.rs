//! Console narration of a scenario run

use colored::Colorize;

use crate::model::{ResultAssertion, ResultStep, ResultVariable, Scenario, ScenarioResult};

/// Prints steps as they finish and a summary at the end
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    quiet: bool,
}

impl Printer {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Enable or disable colors for the whole process
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    pub fn scenario_header(&self, scenario: &Scenario) {
        if self.quiet {
            return;
        }
        let version = if scenario.version.is_empty() {
            String::new()
        } else {
            format!(" ({})", scenario.version)
        };
        println!(
            "\n{} {}{}",
            "Running Scenario:".blue().bold(),
            scenario.name.white().bold(),
            version.dimmed()
        );
        if !scenario.description.is_empty() {
            println!("  {}", scenario.description.dimmed());
        }
    }

    pub fn step(&self, index: usize, step: &ResultStep) {
        if self.quiet {
            return;
        }
        println!("\n{}", format!("Step {}", index + 1).cyan());

        if step.step_type == "pause" {
            println!("  Pause for {:.1}s", step.step_time.as_secs_f64());
            return;
        }

        if let Some(request) = &step.request {
            let url = request
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|_| request.base_url.clone());
            println!("  {} {}", request.method.to_string().bold(), url);
        }

        if !step.variables_applied.is_empty() {
            println!("  {}", "Variables used:".dimmed());
            for variable in &step.variables_applied {
                print_variable(variable);
            }
        }

        if let Some(error) = &step.error {
            println!("  {} {}", "✗".red(), error.red());
            return;
        }

        if let Some(response) = &step.response {
            println!(
                "  {} {}",
                response.status_code.to_string().bold(),
                format!("in {} ms", response.time_elapsed.as_millis()).dimmed()
            );
        }

        if !step.assertions.is_empty() {
            println!("  {}", "Assertions:".dimmed());
            for assertion in &step.assertions {
                print_assertion(assertion);
            }
        }

        if !step.variables_created.is_empty() {
            println!("  {}", "Variables created:".dimmed());
            for variable in &step.variables_created {
                print_variable(variable);
            }
        }
    }

    pub fn summary(&self, result: &ScenarioResult) {
        if self.quiet {
            return;
        }
        let total = result.step_results.len();
        let failed = result.steps_failed();
        let elapsed = format!("in {:.2}s", result.total_time().as_secs_f64());
        println!();
        if result.is_success() {
            println!(
                "{} {} ({} steps) {}",
                "✓".green().bold(),
                "PASSED".green().bold(),
                total,
                elapsed.dimmed()
            );
        } else {
            println!(
                "{} {} ({} of {} steps failed) {}",
                "✗".red().bold(),
                "FAILED".red().bold(),
                failed,
                total,
                elapsed.dimmed()
            );
        }
    }
}

fn print_assertion(assertion: &ResultAssertion) {
    let mut label = assertion.source.to_string();
    if !assertion.property.is_empty() {
        label = format!("{}.{}", label, assertion.property);
    }
    match &assertion.error {
        Some(error) => println!("    {} {} - {}", "✗".red(), label, error.red()),
        None if assertion.success => {
            println!("    {} {} - {}", "✓".green(), label, assertion.message)
        }
        None => println!("    {} {} - {}", "✗".red(), label, assertion.message.red()),
    }
}

fn print_variable(variable: &ResultVariable) {
    match &variable.error {
        Some(error) => println!("    {} {}: {}", "✗".red(), variable.key, error.red()),
        None => println!(
            "    {} {} = {}",
            "✓".green(),
            variable.key,
            variable.new_value.dimmed()
        ),
    }
}
