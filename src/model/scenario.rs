//! Scenario files and executable steps

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::assertion::{Assertion, Source};
use super::request::Method;
use crate::common::{Error, Result};

/// A named, versioned sequence of steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<i64>,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

impl Scenario {
    /// Load a scenario, decoding by extension.
    ///
    /// `.yaml` and `.yml` files are YAML. Anything else is tried as JSON
    /// first and then as YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::scenario_read(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| Error::scenario_parse(path, e))
            }
            _ => serde_json::from_str(&content).or_else(|json_err| {
                tracing::debug!("{} is not JSON ({}), trying YAML", path.display(), json_err);
                serde_yaml::from_str(&content).map_err(|_| Error::scenario_parse(path, json_err))
            }),
        }
    }
}

/// A step exactly as written in a scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub step_type: String,
    /// Pause length in seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default, alias = "Url")]
    pub url: String,
    #[serde(default, alias = "Method")]
    pub method: String,
    #[serde(default)]
    pub headers: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub variables: Vec<VariableCapture>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Extract a value from a response into the context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableCapture {
    #[serde(alias = "Source")]
    pub source: Source,
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub name: String,
}

/// An HTTP request step before templating
#[derive(Debug, Clone, PartialEq)]
pub struct RequestStep {
    pub method: Method,
    pub url: String,
    pub headers: IndexMap<String, Vec<String>>,
    pub body: String,
    pub assertions: Vec<Assertion>,
    pub variables: Vec<VariableCapture>,
}

/// A step ready to execute
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Pause { duration: Duration },
    Request(RequestStep),
}

impl Step {
    /// Tag used in scenario files and results
    pub fn step_type(&self) -> &'static str {
        match self {
            Step::Pause { .. } => "pause",
            Step::Request(_) => "request",
        }
    }
}

impl TryFrom<&StepDefinition> for Step {
    type Error = Error;

    fn try_from(def: &StepDefinition) -> Result<Self> {
        match def.step_type.as_str() {
            "pause" => Ok(Step::Pause {
                duration: Duration::from_secs(def.duration),
            }),
            "request" => Ok(Step::Request(RequestStep {
                method: def.method.parse()?,
                url: def.url.clone(),
                headers: def.headers.clone(),
                body: def.body.clone(),
                assertions: def.assertions.clone(),
                variables: def.variables.clone(),
            })),
            other => Err(Error::UnsupportedStep(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assertion::Comparison;
    use std::io::Write;

    const SCENARIO_JSON: &str = r#"{
        "name": "Users",
        "version": "1.0",
        "description": "List users",
        "exported_at": 1587046097,
        "steps": [
            {"step_type": "pause", "duration": 2},
            {
                "step_type": "request",
                "Url": "{{SCIMBaseURL}}/Users?count=2",
                "Method": "GET",
                "headers": {"Accept": ["application/json"]},
                "variables": [{"source": "response_json", "property": "id", "name": "user_id"}],
                "assertions": [
                    {"comparison": "equal", "value": "200", "Source": "response_status"},
                    {"comparison": "is_less_than_or_equals", "value": "2", "Source": "response_json", "property": "totalResults"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_historical_json() {
        let scenario: Scenario = serde_json::from_str(SCENARIO_JSON).unwrap();
        assert_eq!(scenario.name, "Users");
        assert_eq!(scenario.steps.len(), 2);

        let request = &scenario.steps[1];
        assert_eq!(request.url, "{{SCIMBaseURL}}/Users?count=2");
        assert_eq!(request.method, "GET");
        assert_eq!(request.headers["Accept"], vec!["application/json"]);
        assert_eq!(request.variables[0].source, Source::Json);
        assert_eq!(
            request.assertions[1].comparison,
            Comparison::IsLessThanOrEqual
        );
    }

    #[test]
    fn test_step_conversion() {
        let scenario: Scenario = serde_json::from_str(SCENARIO_JSON).unwrap();
        let pause = Step::try_from(&scenario.steps[0]).unwrap();
        assert_eq!(pause.step_type(), "pause");
        assert_eq!(
            pause,
            Step::Pause {
                duration: Duration::from_secs(2)
            }
        );

        let request = Step::try_from(&scenario.steps[1]).unwrap();
        assert_eq!(request.step_type(), "request");
        match request {
            Step::Request(request) => {
                assert_eq!(request.method, Method::Get);
                assert_eq!(request.assertions.len(), 2);
            }
            other => panic!("expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_step_type() {
        let def = StepDefinition {
            step_type: "RequestXXX".into(),
            ..Default::default()
        };
        let err = Step::try_from(&def).unwrap_err();
        assert_eq!(err.to_string(), "'RequestXXX' is an invalid step_type");
    }

    #[test]
    fn test_invalid_method() {
        let def = StepDefinition {
            step_type: "request".into(),
            url: "http://x".into(),
            method: "FETCH".into(),
            ..Default::default()
        };
        assert!(matches!(Step::try_from(&def), Err(Error::InvalidMethod(_))));
    }

    #[test]
    fn test_from_file_yaml_and_fallback() {
        let yaml = "name: Yaml\nsteps:\n  - step_type: pause\n    duration: 0\n";

        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let scenario = Scenario::from_file(file.path()).unwrap();
        assert_eq!(scenario.name, "Yaml");

        let mut file = tempfile::Builder::new().suffix(".scenario").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        assert_eq!(Scenario::from_file(file.path()).unwrap().steps.len(), 1);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = Scenario::from_file(Path::new("/nonexistent/scenario.json"));
        assert!(matches!(missing, Err(Error::ScenarioRead { .. })));

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{\"steps\": [").unwrap();
        assert!(matches!(
            Scenario::from_file(file.path()),
            Err(Error::ScenarioParse { .. })
        ));
    }
}
