//! Assertion definitions: what to compare, against what, and where to read it

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators available to assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    EqualNumber,
    Equal,
    NotEqual,
    IsANumber,
    IsLessThan,
    #[serde(alias = "is_less_than_or_equals")]
    IsLessThanOrEqual,
    IsGreaterThan,
    IsGreaterThanOrEqual,
    Contains,
    #[serde(alias = "does_not_contains")]
    DoesNotContain,
    NotEmpty,
    Empty,
    IsNull,
    HasValue,
    HasKey,
}

/// Message pair of an operator, selected by the outcome.
///
/// `{actual}` and `{expected}` are replaced when rendering.
#[derive(Debug, Clone, Copy)]
pub struct MessageTemplate {
    pub success: &'static str,
    pub failure: &'static str,
}

impl MessageTemplate {
    /// Render the template for an outcome
    pub fn render(&self, success: bool, actual: &str, expected: &str) -> String {
        let template = if success { self.success } else { self.failure };
        template
            .replace("{actual}", actual)
            .replace("{expected}", expected)
    }
}

impl Comparison {
    /// Every operator, in declaration order
    pub const ALL: [Comparison; 15] = [
        Comparison::EqualNumber,
        Comparison::Equal,
        Comparison::NotEqual,
        Comparison::IsANumber,
        Comparison::IsLessThan,
        Comparison::IsLessThanOrEqual,
        Comparison::IsGreaterThan,
        Comparison::IsGreaterThanOrEqual,
        Comparison::Contains,
        Comparison::DoesNotContain,
        Comparison::NotEmpty,
        Comparison::Empty,
        Comparison::IsNull,
        Comparison::HasValue,
        Comparison::HasKey,
    ];

    /// Name used in scenario files
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::EqualNumber => "equal_number",
            Comparison::Equal => "equal",
            Comparison::NotEqual => "not_equal",
            Comparison::IsANumber => "is_a_number",
            Comparison::IsLessThan => "is_less_than",
            Comparison::IsLessThanOrEqual => "is_less_than_or_equal",
            Comparison::IsGreaterThan => "is_greater_than",
            Comparison::IsGreaterThanOrEqual => "is_greater_than_or_equal",
            Comparison::Contains => "contains",
            Comparison::DoesNotContain => "does_not_contain",
            Comparison::NotEmpty => "not_empty",
            Comparison::Empty => "empty",
            Comparison::IsNull => "is_null",
            Comparison::HasValue => "has_value",
            Comparison::HasKey => "has_key",
        }
    }

    /// Success/failure messages of this operator
    pub fn messages(&self) -> MessageTemplate {
        let (success, failure) = match self {
            Comparison::Equal => ("'{actual}' was equal to {expected}", "'{actual}' was not equal to {expected}"),
            Comparison::NotEqual => ("'{actual}' was not equal to {expected}", "'{actual}' was equal to {expected}"),
            Comparison::EqualNumber => (
                "'{actual}' was a number equal to {expected}",
                "'{actual}' was not a number equal to {expected}",
            ),
            Comparison::IsANumber => ("'{actual}' was a number", "'{actual}' was not a number"),
            Comparison::IsLessThan => ("'{actual}' was less than {expected}", "'{actual}' was not less than {expected}"),
            Comparison::IsLessThanOrEqual => (
                "'{actual}' was less than or equal to {expected}",
                "'{actual}' was not less than or equal to {expected}",
            ),
            Comparison::IsGreaterThan => (
                "'{actual}' was greater than {expected}",
                "'{actual}' was not greater than {expected}",
            ),
            Comparison::IsGreaterThanOrEqual => (
                "'{actual}' was greater than or equal to {expected}",
                "'{actual}' was not greater than or equal to {expected}",
            ),
            Comparison::Contains => ("'{actual}' does contain {expected}", "'{actual}' does not contain {expected}"),
            Comparison::DoesNotContain => ("'{actual}' does not contain {expected}", "'{actual}' does contain {expected}"),
            Comparison::NotEmpty => ("'{actual}' was not empty", "'{actual}' was empty"),
            Comparison::Empty => ("'{actual}' was empty", "'{actual}' was not empty"),
            Comparison::IsNull => ("'{actual}' was null", "'{actual}' was not null"),
            Comparison::HasValue => ("'{actual}' had value {expected}", "'{actual}' had no value {expected}"),
            Comparison::HasKey => ("'{actual}' key does exist", "'{actual}' key does not exist"),
        };
        MessageTemplate { success, failure }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of a response an assertion or capture reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "response_status", alias = "status")]
    Status,
    #[serde(rename = "response_time", alias = "time")]
    Time,
    #[serde(rename = "response_json", alias = "json")]
    Json,
    #[serde(rename = "response_xml", alias = "xml")]
    Xml,
    #[serde(rename = "response_header", alias = "header")]
    Header,
    #[serde(rename = "response_text", alias = "text")]
    Text,
}

impl Source {
    /// Label used when narrating results
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Status => "status",
            Source::Time => "response time",
            Source::Json => "body",
            Source::Xml => "xml body",
            Source::Header => "header",
            Source::Text => "text",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One expected result on a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub comparison: Comparison,
    /// Expected literal, compared according to the operator
    #[serde(default)]
    pub value: String,
    #[serde(rename = "Source", alias = "source")]
    pub source: Source,
    /// Dotted/bracketed path for structured bodies, header name for headers
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub property: String,
}

impl Assertion {
    pub fn new(comparison: Comparison, value: impl Into<String>, source: Source) -> Self {
        Self {
            comparison,
            value: value.into(),
            source,
            property: String::new(),
        }
    }

    /// Set the property path
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }
}
