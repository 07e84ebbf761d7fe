// crates/listgate-core/tests/suite_unit.rs
// ============================================================================
// Module: Suite Orchestration Unit Tests
// Description: End-to-end suite behavior over a canned transport.
// Purpose: Verify preparation, execution contracts, error records, and
//          aggregation without touching the network.
// ============================================================================

//! ## Overview
//! Drives whole suites against an in-memory transport: fatal empty
//! baseline, parameter-mismatch and schema-violation contracts, the
//! insufficient-results rule, idempotent runs, envelope peeling, and the
//! base-parameter merge.

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

use std::cell::RefCell;
use std::collections::BTreeMap;

use listgate_core::CheckErrorKind;
use listgate_core::CheckKind;
use listgate_core::Envelope;
use listgate_core::Limits;
use listgate_core::NullProgress;
use listgate_core::Param;
use listgate_core::Suite;
use listgate_core::SuiteConfig;
use listgate_core::SuiteError;
use listgate_core::Transport;
use listgate_core::TransportError;
use listgate_core::ValueKind;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Canned Transport
// ============================================================================

/// In-memory transport that answers from a routing table.
///
/// The baseline request (no filter parameters beyond the base set) gets the
/// `baseline` body; filtered requests are answered by the first rule whose
/// key/value pair appears in the query, falling back to an empty list.
struct CannedTransport {
    /// Body returned for the unfiltered baseline request.
    baseline: Value,
    /// Filter-pair routing rules, first match wins.
    rules: Vec<((String, String), Value)>,
    /// Queries observed, for merge assertions.
    seen: RefCell<Vec<BTreeMap<String, String>>>,
}

impl CannedTransport {
    fn new(baseline: Value) -> Self {
        Self {
            baseline,
            rules: Vec::new(),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn with_rule(mut self, key: &str, value: &str, body: Value) -> Self {
        self.rules.push(((key.to_string(), value.to_string()), body));
        self
    }
}

impl Transport for CannedTransport {
    fn get(
        &self,
        _endpoint: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Value, TransportError> {
        self.seen.borrow_mut().push(query.clone());
        for ((key, value), body) in &self.rules {
            if query.get(key) == Some(value) {
                return Ok(body.clone());
            }
        }
        let filtered = query.keys().any(|key| key != "page_size");
        if filtered { Ok(json!([])) } else { Ok(self.baseline.clone()) }
    }
}

/// Transport that fails every request.
struct BrokenTransport;

impl Transport for BrokenTransport {
    fn get(
        &self,
        endpoint: &str,
        _query: &BTreeMap<String, String>,
    ) -> Result<Value, TransportError> {
        Err(TransportError::Status {
            status: 500,
            url: endpoint.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Schema requiring an `id` field on every item.
fn item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "status": {"type": "string"}
        },
        "required": ["id"]
    })
}

/// Two-item baseline used across scenarios.
fn baseline() -> Value {
    json!([
        {"status": "open", "id": 1},
        {"status": "closed", "id": 2}
    ])
}

/// Suite over the canned transport with a single `status` parameter.
fn status_suite(transport: CannedTransport) -> Suite<CannedTransport> {
    let mut config = SuiteConfig::new("requests", "http://gateway.test/requests.json");
    config.seed = Some(3);
    Suite::new(
        config,
        &item_schema(),
        vec![Param::new("status", ValueKind::Text)],
        Limits::default(),
        transport,
    )
    .unwrap()
}

// ============================================================================
// SECTION: Fatal Conditions
// ============================================================================

#[test]
fn empty_baseline_is_fatal_and_builds_no_plan() {
    let mut suite = status_suite(CannedTransport::new(json!([])));
    let err = suite.run(&mut NullProgress).unwrap_err();
    assert!(matches!(err, SuiteError::EmptyBaseline));
    assert!(suite.checks().is_none(), "no plan may exist after a fatal baseline");
}

#[test]
fn baseline_transport_failure_is_fatal() {
    let mut config = SuiteConfig::new("broken", "http://gateway.test/requests.json");
    config.seed = Some(3);
    let mut suite = Suite::new(
        config,
        &item_schema(),
        vec![Param::new("status", ValueKind::Text)],
        Limits::default(),
        BrokenTransport,
    )
    .unwrap();
    assert!(matches!(suite.run(&mut NullProgress), Err(SuiteError::Transport(_))));
}

#[test]
fn invalid_schema_fails_construction() {
    let schema = json!({"type": 13});
    let result = Suite::new(
        SuiteConfig::new("bad", "http://gateway.test/requests.json"),
        &schema,
        Vec::new(),
        Limits::default(),
        CannedTransport::new(json!([])),
    );
    assert!(matches!(result, Err(SuiteError::Schema(_))));
}

// ============================================================================
// SECTION: Execution Contracts
// ============================================================================

#[test]
fn mismatched_item_yields_exactly_one_parameter_mismatch() {
    // Filtering by status=open returns a closed item: one mismatch record.
    let transport = CannedTransport::new(baseline())
        .with_rule("status", "open", json!([{"status": "closed", "id": 2}]))
        .with_rule("status", "closed", json!([{"status": "closed", "id": 2}]));
    let mut suite = status_suite(transport);
    suite.run(&mut NullProgress).unwrap();
    let mismatches: Vec<_> = suite
        .errors()
        .into_iter()
        .filter(|error| error.kind == CheckErrorKind::ParameterMismatch)
        .collect();
    assert_eq!(mismatches.len(), 1);
    assert!(mismatches[0].item.is_some());
}

#[test]
fn item_without_the_filtered_property_is_a_parameter_mismatch() {
    // Filtering by status returns an item that carries no status at all.
    let transport = CannedTransport::new(baseline())
        .with_rule("status", "open", json!([{"id": 3}]))
        .with_rule("status", "closed", json!([{"status": "closed", "id": 2}]));
    let mut suite = status_suite(transport);
    suite.run(&mut NullProgress).unwrap();
    let errors = suite.errors();
    assert!(
        errors
            .iter()
            .all(|error| error.kind != CheckErrorKind::WrappedFailure),
        "a missing property is not a wrapped failure"
    );
    let mismatch = errors
        .iter()
        .find(|error| error.kind == CheckErrorKind::ParameterMismatch)
        .unwrap();
    assert!(mismatch.message.contains("missing"));
}

#[test]
fn schema_violation_fires_independently_of_mismatch() {
    // The returned item both violates the filter and lacks the required id.
    let transport = CannedTransport::new(baseline())
        .with_rule("status", "open", json!([{"status": "closed"}]))
        .with_rule("status", "closed", json!([{"status": "closed", "id": 2}]));
    let mut suite = status_suite(transport);
    suite.run(&mut NullProgress).unwrap();
    let kinds: Vec<CheckErrorKind> = suite.errors().iter().map(|error| error.kind).collect();
    assert!(kinds.contains(&CheckErrorKind::ParameterMismatch));
    assert!(kinds.contains(&CheckErrorKind::SchemaViolation));
}

#[test]
fn zero_results_for_an_observed_value_is_insufficient() {
    // No rules: every filtered query answers with an empty list.
    let mut suite = status_suite(CannedTransport::new(baseline()));
    suite.run(&mut NullProgress).unwrap();
    let insufficient = suite
        .errors()
        .into_iter()
        .filter(|error| error.kind == CheckErrorKind::InsufficientResults)
        .count();
    // One per observed status value.
    assert_eq!(insufficient, 2);
}

#[test]
fn check_level_transport_failure_is_wrapped_not_fatal() {
    /// Transport whose baseline succeeds and whose filtered requests fail.
    struct FlakyTransport;

    impl Transport for FlakyTransport {
        fn get(
            &self,
            endpoint: &str,
            query: &BTreeMap<String, String>,
        ) -> Result<Value, TransportError> {
            if query.is_empty() {
                Ok(json!([{"status": "open", "id": 1}]))
            } else {
                Err(TransportError::Status {
                    status: 502,
                    url: endpoint.to_string(),
                })
            }
        }
    }

    let mut config = SuiteConfig::new("flaky", "http://gateway.test/requests.json");
    config.seed = Some(3);
    let mut suite = Suite::new(
        config,
        &item_schema(),
        vec![Param::new("status", ValueKind::Text)],
        Limits::default(),
        FlakyTransport,
    )
    .unwrap();
    let summary = suite.run(&mut NullProgress).unwrap();
    assert!(summary.checks_run >= 2, "plan must keep going past a failing check");
    let wrapped: Vec<_> = suite
        .errors()
        .into_iter()
        .filter(|error| error.kind == CheckErrorKind::WrappedFailure)
        .collect();
    assert_eq!(wrapped.len(), 1);
    assert!(wrapped[0].underlying.as_deref().is_some_and(|u| u.contains("502")));
}

#[test]
fn baseline_schema_check_reports_all_violations() {
    let transport = CannedTransport::new(json!([
        {"status": "open"},
        {"status": "closed", "id": 2},
        {"status": "closed"}
    ]));
    let mut suite = status_suite(transport);
    suite.run(&mut NullProgress).unwrap();
    let baseline_check = &suite.checks().unwrap()[0];
    assert!(matches!(baseline_check.kind(), CheckKind::BaselineSchema));
    let violations = baseline_check
        .errors()
        .unwrap()
        .iter()
        .filter(|error| error.kind == CheckErrorKind::SchemaViolation)
        .count();
    assert_eq!(violations, 2);
}

// ============================================================================
// SECTION: Merge and Envelope
// ============================================================================

#[test]
fn base_params_are_merged_and_overridden_by_checks() {
    let transport = CannedTransport::new(baseline())
        .with_rule("status", "open", json!([{"status": "open", "id": 1}]))
        .with_rule("status", "closed", json!([{"status": "closed", "id": 2}]));
    let mut config = SuiteConfig::new("requests", "http://gateway.test/requests.json");
    config.seed = Some(3);
    config.base_params.insert("page_size".to_string(), "500".to_string());
    let mut suite = Suite::new(
        config,
        &item_schema(),
        vec![Param::new("status", ValueKind::Text)],
        Limits::default(),
        transport,
    )
    .unwrap();
    suite.run(&mut NullProgress).unwrap();
    let seen = suite.transport().seen.borrow();
    assert!(seen.iter().all(|query| query.get("page_size") == Some(&"500".to_string())));
}

#[test]
fn enveloped_bodies_are_peeled_to_the_item_list() {
    let transport = CannedTransport::new(json!({"items": [{"status": "open", "id": 1}]}));
    let mut config = SuiteConfig::new("requests", "http://gateway.test/requests.json");
    config.seed = Some(3);
    config.envelope = Envelope::Member("items".to_string());
    let mut suite = Suite::new(
        config,
        &item_schema(),
        Vec::new(),
        Limits::default(),
        transport,
    )
    .unwrap();
    suite.prepare().unwrap();
    assert_eq!(suite.baseline_len(), Some(1));
}

// ============================================================================
// SECTION: Idempotence and Aggregates
// ============================================================================

#[test]
fn rerun_skips_completed_checks_and_keeps_outcomes() {
    let transport = CannedTransport::new(baseline())
        .with_rule("status", "open", json!([{"status": "open", "id": 1}]))
        .with_rule("status", "closed", json!([{"status": "closed", "id": 2}]));
    let mut suite = status_suite(transport);
    let first = suite.run(&mut NullProgress).unwrap();
    assert!(first.checks_run > 0);
    let errors_before = suite.error_count();
    let second = suite.run(&mut NullProgress).unwrap();
    assert_eq!(second.checks_run, 0, "a completed plan must not re-execute");
    assert_eq!(suite.error_count(), errors_before);
}

#[test]
fn report_exposes_checks_stats_and_details() {
    let transport = CannedTransport::new(baseline())
        .with_rule("status", "open", json!([{"status": "open", "id": 1}]))
        .with_rule("status", "closed", json!([{"status": "closed", "id": 2}]));
    let mut suite = status_suite(transport);
    suite.run(&mut NullProgress).unwrap();
    let report = suite.report();
    assert_eq!(report.name, "requests");
    assert_eq!(report.checks.len(), 3);
    assert!(report.stats.is_some());
    assert_eq!(report.details.get("baseline_items"), Some(&"2".to_string()));
    // Filtered checks expose the resolved request URL.
    let single = &report.checks[1];
    assert!(single.url.as_deref().is_some_and(|url| url.contains("status=")));
}
