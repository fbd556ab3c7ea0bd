//! HTTP transport
//!
//! The engine only needs to hand a [`ResolvedRequest`] to something that
//! sends it. [`ReqwestClient`] is the real transport; tests plug in their own
//! [`HttpClient`].

use async_trait::async_trait;
use std::time::Duration;

use crate::common::config::HttpConfig;
use crate::common::{Error, Result};
use crate::model::{HeaderMap, Method, ResolvedRequest};

/// What came back from the transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// Trait for request senders
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and wait for the full response body
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse>;
}

/// Transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { inner })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Trace => reqwest::Method::TRACE,
        Method::Connect => reqwest::Method::CONNECT,
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse> {
        let url = request.url()?;
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self.inner.request(to_reqwest_method(request.method), url);
        for (name, values) in request.headers.iter() {
            for value in values {
                tracing::debug!("  {}: {}", name, value);
                builder = builder.header(name, value);
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();

        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            headers.append(
                canonical_header_name(name.as_str()),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }

        let body = response.text().await?;
        tracing::debug!("{} ({} bytes)", status_code, body.len());

        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}

/// `content-type` -> `Content-Type`
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_name("ETAG"), "Etag");
    }

    #[test]
    fn test_client_builds_from_config() {
        let config = HttpConfig {
            timeout_secs: 5,
            user_agent: "test-agent".to_string(),
            accept_invalid_certs: true,
        };
        assert!(ReqwestClient::new(&config).is_ok());
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(to_reqwest_method(Method::Delete).as_str(), "DELETE");
    }
}
