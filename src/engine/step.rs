//! Step execution
//!
//! A request step is patched through the [`Context`], sent, and then checked:
//! assertions first, captures second. A failure anywhere is recorded on the
//! returned [`ResultStep`]; executing a step never fails as a whole.

use indexmap::IndexMap;
use std::time::{Duration, Instant};

use super::assertion::evaluate;
use super::client::HttpClient;
use crate::context::Context;
use crate::model::value::format_number;
use crate::model::{
    RequestStep, ResolvedRequest, Response, ResultStep, ResultVariable, Source, Step, Value,
    VariableCapture,
};

/// Executes steps against one transport
pub struct StepExecutor {
    client: Box<dyn HttpClient>,
    /// Headers that replace same-named scenario headers on every request
    overrides: IndexMap<String, String>,
}

impl StepExecutor {
    pub fn new(client: Box<dyn HttpClient>) -> Self {
        Self {
            client,
            overrides: IndexMap::new(),
        }
    }

    /// Set the header overrides applied to every request
    pub fn with_overrides(mut self, overrides: IndexMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn overrides(&self) -> &IndexMap<String, String> {
        &self.overrides
    }

    /// Execute one step
    pub async fn execute(&self, ctx: &mut Context, step: &Step) -> ResultStep {
        match step {
            Step::Pause { duration } => pause(*duration).await,
            Step::Request(request) => self.request(ctx, request).await,
        }
    }

    async fn request(&self, ctx: &mut Context, step: &RequestStep) -> ResultStep {
        let mut result = ResultStep::new("request");

        let (request, applied) = match self.resolve(ctx, step) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!("{}", e);
                result.error = Some(e.to_string());
                return result;
            }
        };
        result.variables_applied = applied;

        let start = Instant::now();
        let sent = self.client.send(&request).await;
        let elapsed = start.elapsed();
        result.step_time = elapsed;
        result.request = Some(request);

        let http = match sent {
            Ok(http) => http,
            Err(e) => {
                tracing::error!("{}", e);
                result.error = Some(e.to_string());
                return result;
            }
        };

        let response = Response::new(http.status_code, elapsed, http.body, http.headers);

        result.assertions = step
            .assertions
            .iter()
            .map(|assertion| evaluate(assertion, &response))
            .collect();

        for capture in step.variables.iter().filter(|c| !c.name.is_empty()) {
            let variable = match capture_value(capture, &response) {
                Ok(value) => {
                    ctx.add(capture.name.clone(), value.clone());
                    ResultVariable::created(capture.name.clone(), value)
                }
                Err(error) => ResultVariable::failed(capture.name.clone(), error),
            };
            result.variables_created.push(variable);
        }

        result.response = Some(response);
        result
    }

    /// Patch every templated field and assemble the request
    fn resolve(
        &self,
        ctx: &Context,
        step: &RequestStep,
    ) -> crate::common::Result<(ResolvedRequest, Vec<ResultVariable>)> {
        let mut applied = Vec::new();
        let mut patch = |key: String, raw: &str| {
            let patched = ctx.patch(raw);
            if patched != raw {
                applied.push(ResultVariable::used(key, patched.clone()));
            }
            patched
        };

        let url = patch("url".to_string(), step.url.as_str());
        let body = patch("body".to_string(), step.body.as_str());

        let mut headers: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, values) in &step.headers {
            let patched = values
                .iter()
                .map(|value| patch(format!("headers.{}", name), value.as_str()))
                .collect();
            headers.insert(name.clone(), patched);
        }

        let mut request = ResolvedRequest::new(step.method, &url)?;
        request.body = body;
        request.headers = headers.into();
        for (name, value) in &self.overrides {
            let patched = patch(format!("headers.{}", name), value.as_str());
            request.headers.set(name.clone(), vec![patched]);
        }

        Ok((request, applied))
    }
}

async fn pause(duration: Duration) -> ResultStep {
    tracing::debug!("Pausing for {:?}", duration);
    let start = Instant::now();
    tokio::time::sleep(duration).await;
    let mut result = ResultStep::new("pause");
    result.step_time = start.elapsed();
    result
}

/// Extract the captured value as the string stored in the context
fn capture_value(
    capture: &VariableCapture,
    response: &Response,
) -> std::result::Result<String, String> {
    let property = capture.property.as_str();
    match capture.source {
        Source::Status => Ok(response.status_code.to_string()),
        Source::Time => Ok(response.time_elapsed.as_millis().to_string()),
        Source::Text => Ok(response.body.clone()),
        Source::Header => response
            .headers
            .first(property)
            .map(str::to_string)
            .ok_or_else(|| format!("Header {:?} not found.", property)),
        Source::Json => scalar(response.json()?.lookup(property), property, "JSON"),
        Source::Xml => scalar(response.xml()?.lookup(property), property, "XML"),
    }
}

fn scalar(value: Option<&Value>, property: &str, format: &str) -> std::result::Result<String, String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(format_number(*n)),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(format!(
            "'{}' cannot be stored as a variable: {} values are not supported",
            property,
            other.kind()
        )),
        None => Err(format!(
            "Unable to locate {} property in path '{}' in {}",
            property, property, format
        )),
    }
}
