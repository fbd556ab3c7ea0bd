//! HTTP response as seen by assertions and captures

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

use super::value::Value;

/// Multi-valued header map with case-insensitive lookup.
///
/// Names keep the spelling they were inserted with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap(IndexMap<String, Vec<String>>);

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a header, creating it if needed
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.key_of(&name) {
            Some(key) => {
                if let Some(values) = self.0.get_mut(&key) {
                    values.push(value);
                }
            }
            None => {
                self.0.insert(name, vec![value]);
            }
        }
    }

    /// Replace every value of a header, whatever the case of its existing name
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.insert(name, values);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let key = self.key_of(name)?;
        self.0.shift_remove(&key)
    }

    /// All values of a header
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// First value of a header
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn key_of(&self, name: &str) -> Option<String> {
        self.0.keys().find(|k| k.eq_ignore_ascii_case(name)).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (k, v) in iter {
            map.append(k, v);
        }
        map
    }
}

impl From<IndexMap<String, Vec<String>>> for HeaderMap {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        let mut headers = HeaderMap::new();
        for (name, values) in map {
            for value in values {
                headers.append(name.clone(), value);
            }
        }
        headers
    }
}

/// A received response.
///
/// The body is parsed as JSON or XML the first time a structured source asks
/// for it; a malformed body only becomes an error for that source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    #[serde(with = "super::duration_secs")]
    pub time_elapsed: Duration,
    pub body: String,
    pub headers: HeaderMap,
    #[serde(skip)]
    json: OnceLock<std::result::Result<Value, String>>,
    #[serde(skip)]
    xml: OnceLock<std::result::Result<Value, String>>,
}

impl Response {
    pub fn new(
        status_code: u16,
        time_elapsed: Duration,
        body: impl Into<String>,
        headers: HeaderMap,
    ) -> Self {
        Self {
            status_code,
            time_elapsed,
            body: body.into(),
            headers,
            json: OnceLock::new(),
            xml: OnceLock::new(),
        }
    }

    /// Body as JSON. An empty body is an empty object.
    pub fn json(&self) -> std::result::Result<&Value, String> {
        self.json
            .get_or_init(|| {
                if self.body.trim().is_empty() {
                    return Ok(Value::Object(IndexMap::new()));
                }
                Value::from_json_str(&self.body).map_err(|e| {
                    format!(
                        "there is a result and this is not a valid JSON api Response is not in JSON: {}",
                        e
                    )
                })
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    /// Body as XML. An empty body is an empty object.
    pub fn xml(&self) -> std::result::Result<&Value, String> {
        self.xml
            .get_or_init(|| {
                if self.body.trim().is_empty() {
                    return Ok(Value::Object(IndexMap::new()));
                }
                Value::from_xml_str(&self.body)
                    .map_err(|e| format!("response body is not valid XML: {}", e))
            })
            .as_ref()
            .map_err(|e| e.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let headers: HeaderMap = [("Content-Type", "application/json"), ("Set-Cookie", "a=1")]
            .into_iter()
            .collect();
        assert_eq!(headers.first("content-type"), Some("application/json"));
        assert_eq!(headers.first("CONTENT-TYPE"), Some("application/json"));
        assert!(headers.get("X-Missing").is_none());
    }

    #[test]
    fn test_header_append_and_set() {
        let mut headers = HeaderMap::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");
        assert_eq!(headers.get("Set-Cookie").unwrap(), ["a=1", "b=2"]);
        assert_eq!(headers.len(), 1);

        headers.set("SET-COOKIE", vec!["c=3".to_string()]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.first("set-cookie"), Some("c=3"));
        assert_eq!(headers.iter().next().unwrap().0, "SET-COOKIE");
    }

    #[test]
    fn test_json_is_parsed_lazily() {
        let response = Response::new(200, Duration::ZERO, "not json", HeaderMap::new());
        assert_eq!(response.status_code, 200);
        assert!(response.json().is_err());

        let response = Response::new(200, Duration::ZERO, "", HeaderMap::new());
        assert_eq!(response.json().unwrap(), &Value::Object(IndexMap::new()));

        let response = Response::new(200, Duration::ZERO, r#"[1,2]"#, HeaderMap::new());
        assert_eq!(response.json().unwrap().lookup("[1]"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_xml() {
        let response = Response::new(200, Duration::ZERO, "<a><b>1</b></a>", HeaderMap::new());
        assert_eq!(
            response.xml().unwrap().lookup("b"),
            Some(&Value::String("1".to_string()))
        );
        let response = Response::new(200, Duration::ZERO, "<a>", HeaderMap::new());
        assert!(response.xml().is_err());
    }

    #[test]
    fn test_serializes_elapsed_as_seconds() {
        let response = Response::new(204, Duration::from_millis(1500), "", HeaderMap::new());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["time_elapsed"], serde_json::json!(1.5));
        assert_eq!(json["status_code"], serde_json::json!(204));
    }
}
