//! Scenario runner

use super::step::StepExecutor;
use crate::context::Context;
use crate::model::{ResultStep, Scenario, ScenarioResult, Step};

/// Runs the steps of scenarios in order against one shared context
pub struct ScenarioRunner {
    executor: StepExecutor,
    context: Context,
}

impl ScenarioRunner {
    pub fn new(executor: StepExecutor, context: Context) -> Self {
        Self { executor, context }
    }

    /// Variables as left by the last run
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Run every step of a scenario
    pub async fn run(&mut self, scenario: &Scenario) -> ScenarioResult {
        self.run_with(scenario, |_, _| {}).await
    }

    /// Run every step, calling `on_step` as soon as each one finishes.
    ///
    /// A step that cannot be dispatched is recorded as failed and the run
    /// goes on with the next one.
    pub async fn run_with<F>(&mut self, scenario: &Scenario, mut on_step: F) -> ScenarioResult
    where
        F: FnMut(usize, &ResultStep),
    {
        tracing::info!(
            "Running scenario '{}' ({} steps)",
            scenario.name,
            scenario.steps.len()
        );

        let mut result = ScenarioResult {
            name: scenario.name.clone(),
            version: scenario.version.clone(),
            description: scenario.description.clone(),
            step_results: Vec::with_capacity(scenario.steps.len()),
        };

        for (index, definition) in scenario.steps.iter().enumerate() {
            let step_result = match Step::try_from(definition) {
                Ok(step) => {
                    tracing::debug!("Step {}: {}", index + 1, step.step_type());
                    self.executor.execute(&mut self.context, &step).await
                }
                Err(e) => {
                    tracing::error!("Step {}: {}", index + 1, e);
                    ResultStep::failed(definition.step_type.clone(), e)
                }
            };
            on_step(index, &step_result);
            result.step_results.push(step_result);
        }

        tracing::info!(
            "Scenario '{}' finished: {}",
            scenario.name,
            if result.is_success() { "passed" } else { "failed" }
        );
        result
    }
}
