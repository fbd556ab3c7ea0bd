//! Requests after templating

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::response::HeaderMap;
use crate::common::{Error, Result};

/// HTTP methods a request step may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
    Connect,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            "CONNECT" => Ok(Method::Connect),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully patched request, ready to send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    pub method: Method,
    /// Scheme, host, and path, without query string
    pub base_url: String,
    pub query_params: IndexMap<String, Vec<String>>,
    pub headers: HeaderMap,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl ResolvedRequest {
    /// Split a patched URL into base URL and query parameters
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::invalid_url(url, e))?;

        let mut query_params: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, value) in parsed.query_pairs() {
            query_params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        let mut base = parsed;
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self {
            method,
            base_url: base.to_string(),
            query_params,
            headers: HeaderMap::new(),
            body: String::new(),
        })
    }

    /// Full URL with the query string re-encoded
    pub fn url(&self) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| Error::invalid_url(&self.base_url, e))?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, values) in &self.query_params {
                for value in values {
                    pairs.append_pair(key, value);
                }
            }
        }
        Ok(url)
    }
}
