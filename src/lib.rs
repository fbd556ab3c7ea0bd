//! api-scenario - declarative API test scenarios
//!
//! A scenario is an ordered list of pauses and HTTP requests. Requests are
//! templated through a shared [`Context`], their responses are checked with
//! assertions, and values captured from them feed the following steps.

pub mod cli;
pub mod commands;
pub mod common;
pub mod context;
pub mod engine;
pub mod model;
pub mod report;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use context::Context;
pub use engine::{HttpClient, ReqwestClient, ScenarioRunner, StepExecutor};
pub use model::{Scenario, ScenarioResult};
