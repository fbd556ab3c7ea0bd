//! Data model shared by the engine, the reporter, and the output file

pub mod assertion;
pub mod request;
pub mod response;
pub mod result;
pub mod scenario;
pub mod value;

pub use assertion::{Assertion, Comparison, Source};
pub use request::{Method, ResolvedRequest};
pub use response::{HeaderMap, Response};
pub use result::{ResultAssertion, ResultStep, ResultVariable, ScenarioResult, VariableKind};
pub use scenario::{RequestStep, Scenario, Step, StepDefinition, VariableCapture};
pub use value::{Value, ValueKind};

/// Durations as floating point seconds
pub(crate) mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
