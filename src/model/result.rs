//! Results produced by a scenario run
//!
//! Success is always derived from the contained assertions and variable
//! operations. It is serialized for the output file but never stored.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

use super::assertion::{Assertion, Source};
use super::request::ResolvedRequest;
use super::response::Response;

/// Outcome of one assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultAssertion {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "Source")]
    pub source: Source,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub property: String,
}

impl ResultAssertion {
    /// An evaluated assertion
    pub fn evaluated(assertion: &Assertion, success: bool, message: String) -> Self {
        Self {
            success,
            message,
            error: None,
            source: assertion.source,
            property: assertion.property.clone(),
        }
    }

    /// An assertion that could not be evaluated
    pub fn failed(assertion: &Assertion, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: String::new(),
            error: Some(error.into()),
            source: assertion.source,
            property: assertion.property.clone(),
        }
    }
}

/// How a variable took part in a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Captured from a response into the context
    Created,
    /// Substituted into the outgoing request
    Used,
}

/// One variable operation of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultVariable {
    pub key: String,
    pub new_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub kind: VariableKind,
}

impl ResultVariable {
    pub fn created(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: value.into(),
            error: None,
            kind: VariableKind::Created,
        }
    }

    pub fn used(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: value.into(),
            error: None,
            kind: VariableKind::Used,
        }
    }

    /// A capture that could not be extracted
    pub fn failed(key: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: String::new(),
            error: Some(error.into()),
            kind: VariableKind::Created,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Default)]
pub struct ResultStep {
    pub step_type: String,
    pub step_time: Duration,
    pub request: Option<ResolvedRequest>,
    pub response: Option<Response>,
    pub assertions: Vec<ResultAssertion>,
    pub variables_applied: Vec<ResultVariable>,
    pub variables_created: Vec<ResultVariable>,
    /// Dispatch or transport failure; assertions and captures were skipped
    pub error: Option<String>,
}

impl ResultStep {
    pub fn new(step_type: impl Into<String>) -> Self {
        Self {
            step_type: step_type.into(),
            ..Default::default()
        }
    }

    /// A step that could not run at all
    pub fn failed(step_type: impl Into<String>, error: impl ToString) -> Self {
        Self {
            step_type: step_type.into(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self.assertions.iter().all(|a| a.success)
            && self.variables_applied.iter().all(ResultVariable::is_success)
            && self.variables_created.iter().all(ResultVariable::is_success)
    }

    pub fn assertions_passed(&self) -> usize {
        self.assertions.iter().filter(|a| a.success).count()
    }
}

impl Serialize for ResultStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResultStep", 9)?;
        s.serialize_field("step_type", &self.step_type)?;
        s.serialize_field("step_time", &self.step_time.as_secs_f64())?;
        s.serialize_field("success", &self.is_success())?;
        s.serialize_field("request", &self.request)?;
        s.serialize_field("response", &self.response)?;
        s.serialize_field("assertions", &self.assertions)?;
        s.serialize_field("variables_applied", &self.variables_applied)?;
        s.serialize_field("variables_created", &self.variables_created)?;
        s.serialize_field("error", &self.error)?;
        s.end()
    }
}

/// Outcome of a whole scenario
#[derive(Debug, Clone, Default)]
pub struct ScenarioResult {
    pub name: String,
    pub version: String,
    pub description: String,
    pub step_results: Vec<ResultStep>,
}

impl ScenarioResult {
    /// True when every recorded step succeeded
    pub fn is_success(&self) -> bool {
        self.step_results.iter().all(ResultStep::is_success)
    }

    /// Time spent in steps
    pub fn total_time(&self) -> Duration {
        self.step_results.iter().map(|s| s.step_time).sum()
    }

    pub fn steps_failed(&self) -> usize {
        self.step_results.iter().filter(|s| !s.is_success()).count()
    }
}

impl Serialize for ScenarioResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ScenarioResult", 5)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("version", &self.version)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field("success", &self.is_success())?;
        s.serialize_field("step_results", &self.step_results)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assertion::Comparison;

    fn assertion() -> Assertion {
        Assertion::new(Comparison::Equal, "200", Source::Status)
    }

    #[test]
    fn test_step_success_is_derived() {
        let mut step = ResultStep::new("request");
        assert!(step.is_success());

        step.assertions
            .push(ResultAssertion::evaluated(&assertion(), true, "ok".into()));
        assert!(step.is_success());

        step.variables_created
            .push(ResultVariable::failed("id", "not found"));
        assert!(!step.is_success());
    }

    #[test]
    fn test_failed_assertion_fails_step() {
        let mut step = ResultStep::new("request");
        step.assertions
            .push(ResultAssertion::failed(&assertion(), "unsupported"));
        assert!(!step.is_success());
        assert_eq!(step.assertions_passed(), 0);
    }

    #[test]
    fn test_dispatch_failure_fails_step() {
        let step = ResultStep::failed("RequestXXX", "'RequestXXX' is an invalid step_type");
        assert!(!step.is_success());
    }

    #[test]
    fn test_scenario_success_and_serialization() {
        let mut result = ScenarioResult {
            name: "demo".into(),
            version: "1.0".into(),
            description: String::new(),
            step_results: vec![ResultStep::new("pause")],
        };
        result.step_results[0].step_time = Duration::from_millis(250);
        assert!(result.is_success());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], serde_json::json!(true));
        assert_eq!(json["step_results"][0]["step_time"], serde_json::json!(0.25));
        assert_eq!(json["step_results"][0]["step_type"], serde_json::json!("pause"));

        result.step_results.push(ResultStep::failed("request", "boom"));
        assert!(!result.is_success());
        assert_eq!(result.steps_failed(), 1);
    }
}
