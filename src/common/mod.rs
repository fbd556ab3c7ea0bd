//! Common utilities shared across the crate

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Split a `name:value` command-line pair on its first colon.
///
/// Both halves are trimmed. Returns `None` when there is no colon.
pub fn split_pair(pair: &str) -> Option<(String, String)> {
    let (name, value) = pair.split_once(':')?;
    Some((name.trim().to_string(), value.trim().to_string()))
}

/// Prefix a token with `Bearer ` unless it already carries it
pub fn add_bearer_prefix(token: &str) -> String {
    const BEARER: &str = "Bearer ";
    let token = token.trim();
    if token.to_ascii_lowercase().starts_with(&BEARER.to_ascii_lowercase()) {
        token.to_string()
    } else {
        format!("{}{}", BEARER, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pair() {
        assert_eq!(
            split_pair(" X-Id : 42 "),
            Some(("X-Id".to_string(), "42".to_string()))
        );
        assert_eq!(
            split_pair("url:http://localhost:8080"),
            Some(("url".to_string(), "http://localhost:8080".to_string()))
        );
        assert_eq!(split_pair("no-separator"), None);
    }

    #[test]
    fn test_add_bearer_prefix() {
        assert_eq!(add_bearer_prefix("abc"), "Bearer abc");
        assert_eq!(add_bearer_prefix("  Bearer abc "), "Bearer abc");
        assert_eq!(add_bearer_prefix("bearer abc"), "bearer abc");
    }
}
