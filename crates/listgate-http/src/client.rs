// crates/listgate-http/src/client.rs
// ============================================================================
// Module: Blocking HTTP Transport
// Description: reqwest-backed transport for live suite runs.
// Purpose: Issue bounded GETs with one reused session and strict limits.
// Dependencies: listgate-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! One [`HttpTransport`] is built per suite and reused read-only across all
//! checks, so connection pooling amortizes over the whole plan. Redirects
//! are not followed (a redirected list endpoint is a contract smell, not
//! something to paper over), response bodies are size-limited, and non-2xx
//! statuses surface as transport errors so the owning check records them as
//! wrapped failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use listgate_core::Transport;
use listgate_core::TransportError;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the blocking HTTP transport.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpTransportConfig {
    /// Allow cleartext HTTP. Enabled by default; suites routinely target
    /// staging and loopback endpoints.
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            allow_http: true,
            timeout_ms: 30_000,
            max_response_bytes: 8 * 1024 * 1024,
            user_agent: "listgate/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Transport Implementation
// ============================================================================

/// Blocking GET-only transport over one reused reqwest session.
///
/// # Invariants
/// - Redirects are not followed.
/// - Responses exceeding configured limits fail the request.
pub struct HttpTransport {
    /// Transport configuration, including limits.
    config: HttpTransportConfig,
    /// Reused HTTP client.
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Failed {
                url: String::new(),
                detail: format!("http client build failed: {err}"),
            })?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(HttpTransportConfig::default())
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        endpoint: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Value, TransportError> {
        let url = build_url(endpoint, query, &self.config)?;
        let response = self.client.get(url.clone()).send().map_err(|err| {
            TransportError::Failed {
                url: url.to_string(),
                detail: err.to_string(),
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = read_limited(response, self.config.max_response_bytes, &url)?;
        serde_json::from_slice(&body).map_err(|err| TransportError::Body(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses the endpoint, applies query parameters, and enforces the scheme
/// policy.
fn build_url(
    endpoint: &str,
    query: &BTreeMap<String, String>,
    config: &HttpTransportConfig,
) -> Result<Url, TransportError> {
    let url = if query.is_empty() {
        Url::parse(endpoint)
    } else {
        Url::parse_with_params(endpoint, query.iter())
    }
    .map_err(|err| TransportError::Failed {
        url: endpoint.to_string(),
        detail: format!("invalid endpoint url: {err}"),
    })?;
    match url.scheme() {
        "https" => {}
        "http" if config.allow_http => {}
        scheme => {
            return Err(TransportError::Failed {
                url: url.to_string(),
                detail: format!("scheme {scheme:?} not allowed"),
            });
        }
    }
    Ok(url)
}

/// Reads the response body while enforcing a byte limit.
fn read_limited(
    response: Response,
    max_bytes: usize,
    url: &Url,
) -> Result<Vec<u8>, TransportError> {
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    response.take(limit).read_to_end(&mut buf).map_err(|err| TransportError::Failed {
        url: url.to_string(),
        detail: format!("failed to read response: {err}"),
    })?;
    if buf.len() > max_bytes {
        return Err(TransportError::Failed {
            url: url.to_string(),
            detail: format!("response exceeds {max_bytes} byte limit"),
        });
    }
    Ok(buf)
}
