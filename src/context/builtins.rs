//! Builtin substitution functions
//!
//! Each builtin is an independent [`SubstitutionRule`]: a pattern plus a
//! render function. [`Builtins`] applies them in a fixed order, every match
//! rendered on its own so two identical calls in one string produce two
//! independent values. A render function returning `None` leaves the match
//! untouched; builtins never fail.

use base64::Engine as _;
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::{Captures, Regex};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;

use super::date;

type Render = fn(&Captures<'_>) -> Option<String>;

/// One builtin function: what it matches and how a match is rendered
#[derive(Clone)]
pub struct SubstitutionRule {
    name: &'static str,
    pattern: Regex,
    render: Render,
}

impl SubstitutionRule {
    /// Build a rule from a static pattern
    pub fn new(name: &'static str, pattern: &'static str, render: Render) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("builtin patterns are valid regexes"),
            render,
        }
    }

    /// Name of the builtin, as written in templates
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the input contains at least one call to this builtin
    pub fn matches(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    /// Replace every call in the input
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, |caps: &Captures<'_>| {
                (self.render)(caps).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl fmt::Debug for SubstitutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// The ordered builtin pipeline
#[derive(Debug, Clone)]
pub struct Builtins {
    rules: Vec<SubstitutionRule>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self {
            rules: vec![
                SubstitutionRule::new("timestamp", r"\{\{timestamp\}\}", timestamp),
                SubstitutionRule::new("utc_datetime", r"\{\{utc_datetime\}\}", utc_datetime),
                SubstitutionRule::new("random_int", r"\{\{random_int\}\}", random_int),
                SubstitutionRule::new("uuid", r"\{\{uuid\}\}", uuid),
                SubstitutionRule::new(
                    "random_int(a,b)",
                    r"\{\{random_int\((-?[0-9]+),(-?[0-9]+)\)\}\}",
                    random_int_range,
                ),
                SubstitutionRule::new(
                    "random_string",
                    r"\{\{random_string\(([0-9]+)\)\}\}",
                    random_string,
                ),
                SubstitutionRule::new("md5", r"\{\{md5\((.+?)\)\}\}", md5_hex),
                SubstitutionRule::new("sha1", r"\{\{sha1\((.+?)\)\}\}", sha1_hex),
                SubstitutionRule::new("sha256", r"\{\{sha256\((.+?)\)\}\}", sha256_hex),
                SubstitutionRule::new(
                    "encode_base64",
                    r"\{\{encode_base64\((.+?)\)\}\}",
                    encode_base64,
                ),
                SubstitutionRule::new("url_encode", r"\{\{url_encode\((.+?)\)\}\}", url_encode),
                SubstitutionRule::new(
                    "hmac_sha1",
                    r"\{\{hmac_sha1\((.+?),([^,]+?)\)\}\}",
                    hmac_sha1,
                ),
                SubstitutionRule::new(
                    "hmac_sha256",
                    r"\{\{hmac_sha256\((.+?),([^,]+?)\)\}\}",
                    hmac_sha256,
                ),
                SubstitutionRule::new(
                    "format_timestamp",
                    r"\{\{format_timestamp\(([0-9]+),(.+?)\)\}\}",
                    format_timestamp,
                ),
                SubstitutionRule::new(
                    "timestamp_offset",
                    r"\{\{timestamp_offset\((-?[0-9]+)\)\}\}",
                    timestamp_offset,
                ),
            ],
        }
    }
}

impl Builtins {
    /// Rules in application order
    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    /// Run the input through every rule, left to right
    pub fn apply(&self, input: &str) -> String {
        self.rules.iter().fold(input.to_string(), |acc, rule| {
            if rule.matches(&acc) {
                rule.apply(&acc)
            } else {
                acc
            }
        })
    }
}

fn timestamp(_: &Captures<'_>) -> Option<String> {
    Some(Utc::now().timestamp().to_string())
}

fn utc_datetime(_: &Captures<'_>) -> Option<String> {
    Some(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true))
}

fn random_int(_: &Captures<'_>) -> Option<String> {
    Some(rand::thread_rng().gen::<u64>().to_string())
}

fn uuid(_: &Captures<'_>) -> Option<String> {
    Some(uuid::Uuid::new_v4().to_string())
}

fn random_int_range(caps: &Captures<'_>) -> Option<String> {
    let a: i64 = caps[1].parse().ok()?;
    let b: i64 = caps[2].parse().ok()?;
    let (min, max) = if a > b { (b, a) } else { (a, b) };
    Some(rand::thread_rng().gen_range(min..=max).to_string())
}

fn random_string(caps: &Captures<'_>) -> Option<String> {
    let length: usize = caps[1].parse().ok()?;
    Some(
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect(),
    )
}

fn md5_hex(caps: &Captures<'_>) -> Option<String> {
    Some(format!("{:x}", md5::compute(caps[1].as_bytes())))
}

fn sha1_hex(caps: &Captures<'_>) -> Option<String> {
    Some(hex::encode(Sha1::digest(caps[1].as_bytes())))
}

fn sha256_hex(caps: &Captures<'_>) -> Option<String> {
    Some(hex::encode(Sha256::digest(caps[1].as_bytes())))
}

fn encode_base64(caps: &Captures<'_>) -> Option<String> {
    Some(base64::engine::general_purpose::STANDARD.encode(caps[1].as_bytes()))
}

fn url_encode(caps: &Captures<'_>) -> Option<String> {
    Some(url::form_urlencoded::byte_serialize(caps[1].as_bytes()).collect())
}

fn hmac_sha1(caps: &Captures<'_>) -> Option<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(caps[2].trim().as_bytes()).ok()?;
    mac.update(caps[1].trim().as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn hmac_sha256(caps: &Captures<'_>) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(caps[2].trim().as_bytes()).ok()?;
    mac.update(caps[1].trim().as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn format_timestamp(caps: &Captures<'_>) -> Option<String> {
    let timestamp: i64 = caps[1].trim().parse().ok()?;
    date::format_timestamp(timestamp, caps[2].trim())
}

fn timestamp_offset(caps: &Captures<'_>) -> Option<String> {
    let offset: i64 = caps[1].trim().parse().ok()?;
    Some(Utc::now().timestamp().checked_add(offset)?.to_string())
}
