//! Scenario execution: assertion evaluation, transport, steps, and runs

pub mod assertion;
pub mod client;
pub mod scenario;
pub mod step;

pub use client::{HttpClient, HttpResponse, ReqwestClient};
pub use scenario::ScenarioRunner;
pub use step::StepExecutor;
