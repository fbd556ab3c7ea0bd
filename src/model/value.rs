//! Structured values extracted from response bodies
//!
//! JSON and XML bodies are both converted into [`Value`] so that assertions
//! and variable captures navigate them the same way.

use indexmap::IndexMap;
use std::fmt;

/// A value resolved from a response
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

/// Runtime kind of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Render a number the way every comparison and capture sees it: the
/// shortest form that round-trips (`200`, `1.1`, `-0.5`), switching to
/// exponent notation (`1e+06`, `1.5e-05`) when the decimal exponent is
/// below -4 or at least 6.
pub fn format_number(n: f64) -> String {
    if n == 0.0 || !n.is_finite() {
        return n.to_string();
    }

    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => match e.parse::<i32>() {
            Ok(e) => (m, e),
            Err(_) => return n.to_string(),
        },
        None => return n.to_string(),
    };

    if (-4..6).contains(&exponent) {
        n.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Whether a string is a finite decimal number
pub fn is_numeric(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Parse a finite decimal number. `inf` and `NaN` spellings are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Split a property path such as `emails[0].value` into its segments
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split(|c: char| c == '.' || c == '[' || c == ']')
        .filter(|s| !s.is_empty())
        .collect()
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Navigate a dotted/bracketed path. An empty path is the value itself.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path_segments(path)
            .into_iter()
            .try_fold(self, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Parse a JSON document
    pub fn from_json_str(s: &str) -> std::result::Result<Self, String> {
        serde_json::from_str::<serde_json::Value>(s)
            .map(Value::from)
            .map_err(|e| e.to_string())
    }

    /// Parse an XML document. The root element is the value; its own tag
    /// name is not part of property paths.
    pub fn from_xml_str(s: &str) -> std::result::Result<Self, String> {
        let doc = roxmltree::Document::parse(s).map_err(|e| e.to_string())?;
        Ok(xml_element(doc.root_element()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => {
                let json = serde_json::Value::from(self);
                write!(f, "{}", json)
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serde_json::Value::Number((*n as i64).into())
            }
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Convert an element: attributes become `@name` keys, child elements are
/// keyed by tag (repeated tags collapse into an array), and text-only
/// elements without attributes become strings.
fn xml_element(node: roxmltree::Node<'_, '_>) -> Value {
    let children: Vec<_> = node.children().filter(|c| c.is_element()).collect();
    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect::<String>()
        .trim()
        .to_string();

    if children.is_empty() && node.attributes().next().is_none() {
        return Value::String(text);
    }

    let mut map: IndexMap<String, Value> = IndexMap::new();
    for attr in node.attributes() {
        map.insert(format!("@{}", attr.name()), Value::String(attr.value().to_string()));
    }
    for child in children {
        let name = child.tag_name().name().to_string();
        let value = xml_element(child);
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::Null);
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    if !text.is_empty() {
        map.insert("#text".to_string(), Value::String(text));
    }
    Value::Object(map)
}
