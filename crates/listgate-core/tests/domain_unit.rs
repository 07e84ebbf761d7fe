// crates/listgate-core/tests/domain_unit.rs
// ============================================================================
// Module: Value Domain Unit Tests
// Description: Tests for baseline value extraction, bucketing, and sampling.
// Purpose: Verify the domain-derivation laws the plan builder relies on.
// ============================================================================

//! ## Overview
//! Covers the derivation pipeline: distinct value extraction with silent
//! skip of missing properties, bucket deduplication, discrete sampling
//! without replacement, and continuous sampling bounded by the observed
//! range.

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

use std::collections::BTreeSet;

use listgate_core::BucketRule;
use listgate_core::Param;
use listgate_core::ParamValue;
use listgate_core::ValueDomain;
use listgate_core::ValueKind;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Deterministic RNG for sampling assertions.
fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// Builds a text domain from string literals.
fn text_domain(values: &[&str]) -> ValueDomain {
    ValueDomain::new(values.iter().map(|v| ParamValue::Text((*v).to_string())).collect())
}

// ============================================================================
// SECTION: Value Extraction
// ============================================================================

#[test]
fn values_from_skips_items_missing_the_property() {
    let param = Param::new("status", ValueKind::Text);
    let items = vec![
        json!({"status": "open"}),
        json!({"id": 2}),
        json!({"status": "closed"}),
        json!({"status": "open"}),
    ];
    let values = param.values_from(&items);
    assert_eq!(values.len(), 2);
    let wires: BTreeSet<String> = values.iter().map(ParamValue::to_wire).collect();
    assert_eq!(wires, BTreeSet::from(["open".to_string(), "closed".to_string()]));
}

#[test]
fn values_from_decodes_numeric_strings() {
    let param = Param::new("lat", ValueKind::Number);
    let items = vec![json!({"lat": "60.17"}), json!({"lat": 60.17}), json!({"lat": 24.94})];
    let values = param.values_from(&items);
    // "60.17" and 60.17 collapse to the same wire encoding.
    assert_eq!(values.len(), 2);
}

// ============================================================================
// SECTION: Bucketing
// ============================================================================

#[test]
fn embucket_keeps_one_representative_per_day() {
    let param = Param::new("requested_datetime", ValueKind::Datetime)
        .with_bucket(BucketRule::CalendarDay);
    let values = vec![
        ValueKind::Datetime.parse_wire("2025-04-01T08:00:00Z").unwrap(),
        ValueKind::Datetime.parse_wire("2025-04-01T20:30:00Z").unwrap(),
        ValueKind::Datetime.parse_wire("2025-04-02T08:00:00Z").unwrap(),
    ];
    let bucketed = param.embucket(values);
    assert_eq!(bucketed.len(), 2);
}

#[test]
fn embucket_without_rule_is_identity() {
    let param = Param::new("status", ValueKind::Text);
    let values = vec![
        ParamValue::Text("open".to_string()),
        ParamValue::Text("closed".to_string()),
    ];
    assert_eq!(param.embucket(values.clone()), values);
}

// ============================================================================
// SECTION: Discrete Sampling
// ============================================================================

#[test]
fn unbounded_discrete_sample_returns_whole_domain() {
    let domain = text_domain(&["a", "b", "c"]);
    let sampled = domain.sample_discrete(0, &mut rng());
    assert_eq!(sampled, domain.values().to_vec());
}

#[test]
fn bounded_discrete_sample_is_distinct_and_sorted() {
    let domain = text_domain(&["e", "a", "d", "b", "c"]);
    let sampled = domain.sample_discrete(3, &mut rng());
    assert_eq!(sampled.len(), 3);
    let wires: Vec<String> = sampled.iter().map(ParamValue::to_wire).collect();
    let mut sorted = wires.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(wires, sorted, "sample must be sorted and distinct");
    for value in &sampled {
        assert!(domain.values().contains(value), "sample must stay inside the domain");
    }
}

#[test]
fn oversized_count_clamps_to_domain() {
    let domain = text_domain(&["a", "b"]);
    let sampled = domain.sample_discrete(10, &mut rng());
    assert_eq!(sampled.len(), 2);
}

// ============================================================================
// SECTION: Continuous Sampling
// ============================================================================

#[test]
fn continuous_numbers_stay_within_observed_range() {
    let domain = ValueDomain::new(vec![
        ParamValue::Number(1.5),
        ParamValue::Number(9.25),
        ParamValue::Number(4.0),
    ]);
    let mut rng = rng();
    for _ in 0..200 {
        let Some(ParamValue::Number(sampled)) = domain.sample_continuous(&mut rng) else {
            panic!("expected a number sample");
        };
        assert!((1.5..=9.25).contains(&sampled));
    }
}

#[test]
fn continuous_datetimes_stay_within_observed_range() {
    let low = ValueKind::Datetime.parse_wire("2025-01-01T00:00:00Z").unwrap();
    let high = ValueKind::Datetime.parse_wire("2025-12-31T00:00:00Z").unwrap();
    let domain = ValueDomain::new(vec![low.clone(), high.clone()]);
    let mut rng = rng();
    for _ in 0..100 {
        let sampled = domain.sample_continuous(&mut rng).unwrap();
        assert!(sampled.partial_cmp_value(&low).unwrap().is_ge());
        assert!(sampled.partial_cmp_value(&high).unwrap().is_le());
    }
}

#[test]
fn continuous_datetimes_keep_subsecond_bounds() {
    let low = ValueKind::Datetime.parse_wire("2025-01-01T00:00:00.9Z").unwrap();
    let high = ValueKind::Datetime.parse_wire("2025-01-01T00:00:01.1Z").unwrap();
    let domain = ValueDomain::new(vec![low.clone(), high.clone()]);
    let mut rng = rng();
    for _ in 0..200 {
        let sampled = domain.sample_continuous(&mut rng).unwrap();
        assert!(
            sampled.partial_cmp_value(&low).unwrap().is_ge(),
            "sampled {} below observed minimum {}",
            sampled.to_wire(),
            low.to_wire()
        );
        assert!(sampled.partial_cmp_value(&high).unwrap().is_le());
    }
}

#[test]
fn empty_domain_yields_no_continuous_sample() {
    let domain = ValueDomain::new(Vec::new());
    assert!(domain.sample_continuous(&mut rng()).is_none());
}
