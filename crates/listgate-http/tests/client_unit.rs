// crates/listgate-http/tests/client_unit.rs
// ============================================================================
// Module: HTTP Transport Unit Tests
// Description: Transport behavior against a local tiny_http server.
// Purpose: Verify query encoding, status handling, body limits, and JSON
//          decoding.
// ============================================================================

//! ## Overview
//! Spins up throwaway local servers and drives the blocking transport
//! against them: query parameters arrive wire-encoded, non-2xx statuses
//! become errors, non-JSON bodies become errors, and oversized bodies are
//! rejected at the configured limit.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::thread;

use listgate_core::Transport;
use listgate_core::TransportError;
use listgate_http::HttpTransport;
use listgate_http::HttpTransportConfig;
use serde_json::json;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Starts a server answering one request with the given body and status.
fn one_shot_server(status: u16, body: String) -> (String, thread::JoinHandle<Option<String>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}/requests.json");
    let handle = thread::spawn(move || {
        server.recv().ok().map(|request| {
            let seen = request.url().to_string();
            let response = Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
            seen
        })
    });
    (url, handle)
}

/// Transport with default configuration.
fn transport() -> HttpTransport {
    HttpTransport::with_defaults().unwrap()
}

// ============================================================================
// SECTION: Happy Path
// ============================================================================

#[test]
fn get_decodes_json_and_encodes_query() {
    let (url, handle) = one_shot_server(200, json!([{"id": 1}]).to_string());
    let query = BTreeMap::from([("status".to_string(), "open".to_string())]);
    let body = transport().get(&url, &query).unwrap();
    assert_eq!(body, json!([{"id": 1}]));
    let seen = handle.join().unwrap().unwrap();
    assert!(seen.contains("status=open"), "query must reach the wire: {seen}");
}

#[test]
fn empty_query_requests_the_bare_endpoint() {
    let (url, handle) = one_shot_server(200, "[]".to_string());
    let body = transport().get(&url, &BTreeMap::new()).unwrap();
    assert_eq!(body, json!([]));
    let seen = handle.join().unwrap().unwrap();
    assert!(!seen.contains('?'));
}

// ============================================================================
// SECTION: Failure Modes
// ============================================================================

#[test]
fn non_2xx_status_is_an_error() {
    let (url, handle) = one_shot_server(503, "busy".to_string());
    let err = transport().get(&url, &BTreeMap::new()).unwrap_err();
    handle.join().unwrap();
    assert!(matches!(err, TransportError::Status { status: 503, .. }));
}

#[test]
fn non_json_body_is_an_error() {
    let (url, handle) = one_shot_server(200, "<html>not json</html>".to_string());
    let err = transport().get(&url, &BTreeMap::new()).unwrap_err();
    handle.join().unwrap();
    assert!(matches!(err, TransportError::Body(_)));
}

#[test]
fn oversized_body_is_rejected() {
    let big = format!("[{}]", "1,".repeat(64 * 1024).trim_end_matches(','));
    let (url, handle) = one_shot_server(200, big);
    let limited = HttpTransport::new(HttpTransportConfig {
        max_response_bytes: 1024,
        ..HttpTransportConfig::default()
    })
    .unwrap();
    let err = limited.get(&url, &BTreeMap::new()).unwrap_err();
    handle.join().unwrap();
    assert!(matches!(err, TransportError::Failed { .. }));
}

#[test]
fn cleartext_http_can_be_disabled() {
    let strict = HttpTransport::new(HttpTransportConfig {
        allow_http: false,
        ..HttpTransportConfig::default()
    })
    .unwrap();
    let err = strict.get("http://127.0.0.1:1/requests.json", &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, TransportError::Failed { .. }));
}

#[test]
fn invalid_endpoint_is_an_error() {
    let err = transport().get("not a url", &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, TransportError::Failed { .. }));
}
