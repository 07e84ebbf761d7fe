// crates/listgate-core/src/transport.rs
// ============================================================================
// Module: Transport Seam
// Description: Backend-agnostic HTTP boundary for suites.
// Purpose: Keep the core network-free while suites issue real GETs through
//          an injected implementation.
// Dependencies: serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! Every check issues at most one GET through a [`Transport`]. The trait
//! keeps the core synchronous and testable: unit tests inject a canned
//! transport, deployments inject the blocking HTTP client from
//! `listgate-http`. The [`Envelope`] hook peels the item array out of a
//! wrapping response object such as `{"items": [...]}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport errors surfaced to suites and checks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - A non-2xx response is an error, never a payload.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Endpoint answered with a non-2xx status.
    #[error("http status {status} for {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Resolved request URL.
        url: String,
    },
    /// Request could not be completed.
    #[error("request to {url} failed: {detail}")]
    Failed {
        /// Resolved request URL.
        url: String,
        /// Human-readable failure detail.
        detail: String,
    },
    /// Response body was not valid JSON.
    #[error("response body was not JSON: {0}")]
    Body(String),
}

/// Synchronous GET-only transport used by suites.
///
/// Implementations own connection reuse; suites hold one transport for
/// their whole lifetime and never mutate it.
pub trait Transport {
    /// Issues one GET with the given query parameters and decodes the JSON
    /// body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on connection failure, non-2xx status, or
    /// a non-JSON body.
    fn get(&self, endpoint: &str, query: &BTreeMap<String, String>)
    -> Result<Value, TransportError>;
}

/// Renders the URL a query resolves to, for reports and error messages.
#[must_use]
pub fn resolve_url(endpoint: &str, query: &BTreeMap<String, String>) -> String {
    if query.is_empty() {
        return endpoint.to_string();
    }
    Url::parse_with_params(endpoint, query.iter())
        .map_or_else(|_| endpoint.to_string(), |url| url.to_string())
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Error raised when a response body does not peel to an item list.
#[derive(Debug, Error)]
#[error("response envelope mismatch: {0}")]
pub struct PeelError(pub String);

/// How the item array is packaged inside the response body.
///
/// # Invariants
/// - Variants are stable for suite-definition deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Envelope {
    /// The body is the item array itself.
    Bare,
    /// The item array sits under the named object member.
    Member(String),
}

impl Default for Envelope {
    fn default() -> Self {
        Self::Bare
    }
}

impl Envelope {
    /// Extracts the item list from a decoded response body.
    ///
    /// # Errors
    ///
    /// Returns [`PeelError`] when the body does not match the declared
    /// shape.
    pub fn peel(&self, body: Value) -> Result<Vec<Value>, PeelError> {
        let listed = match self {
            Self::Bare => body,
            Self::Member(key) => match body {
                Value::Object(mut map) => map
                    .remove(key)
                    .ok_or_else(|| PeelError(format!("missing member {key:?}")))?,
                other => {
                    return Err(PeelError(format!(
                        "expected an object with member {key:?}, got {other}"
                    )));
                }
            },
        };
        match listed {
            Value::Array(items) => Ok(items),
            other => Err(PeelError(format!("expected a JSON array of items, got {other}"))),
        }
    }
}
