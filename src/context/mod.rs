//! Variable store and templating
//!
//! A [`Context`] is created once per run and shared by every step. Strings
//! are patched in two phases:
//!
//! 1. every `{{name}}` token whose name is a stored variable is replaced by
//!    its value, in a single scan of the input: inserted values are never
//!    scanned again by this phase;
//! 2. the [`Builtins`] pipeline runs over the whole result.
//!
//! The store is not synchronized. Wrap it in a mutex before sharing it
//! across threads.

mod builtins;
pub mod date;

pub use builtins::{Builtins, SubstitutionRule};

use indexmap::IndexMap;
use regex::{Captures, Regex};

/// Shared variable namespace of a scenario run
#[derive(Debug, Clone)]
pub struct Context {
    variables: IndexMap<String, String>,
    token: Regex,
    builtins: Builtins,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
            token: Regex::new(r"\{\{([^{}]+)\}\}").expect("variable token regex is valid"),
            builtins: Builtins::default(),
        }
    }

    /// Store a variable, overwriting any previous value
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        tracing::trace!("Context: {} = {}", key, value);
        self.variables.insert(key, value);
    }

    /// Look up a stored variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Remove every stored variable
    pub fn reset(&mut self) {
        self.variables.clear();
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Stored variables in insertion order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply variable substitution then the builtin functions
    pub fn patch(&self, input: &str) -> String {
        let named = if self.variables.is_empty() {
            input.to_string()
        } else {
            self.token
                .replace_all(input, |caps: &Captures<'_>| match self.get(&caps[1]) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                })
                .into_owned()
        };
        self.builtins.apply(&named)
    }
}
