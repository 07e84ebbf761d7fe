// crates/listgate-report/src/text.rs
// ============================================================================
// Module: Text Report
// Description: Terminal-friendly suite summary.
// Purpose: Render one suite per section with per-check outcomes and
//          aggregate timing statistics.
// Dependencies: listgate-core
// ============================================================================

//! ## Overview
//! A compact plain-text rendering: suite header, check lines with pass/fail
//! markers and durations, the flattened error list, and timing aggregates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use listgate_core::CheckReport;
use listgate_core::SuiteReport;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders suites as plain text, sorted by suite name.
#[must_use]
pub fn render_text(suites: &[SuiteReport]) -> String {
    let mut sorted: Vec<&SuiteReport> = suites.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let mut out = String::new();
    for suite in sorted {
        render_suite(&mut out, suite);
    }
    out
}

/// Renders one suite section.
fn render_suite(out: &mut String, suite: &SuiteReport) {
    out.push_str(&format!("## {}\n", suite.name));
    out.push_str(&format!("endpoint: {}\n", suite.endpoint));
    for (key, value) in &suite.details {
        if key != "endpoint" {
            out.push_str(&format!("{key}: {value}\n"));
        }
    }
    out.push('\n');
    for check in &suite.checks {
        render_check(out, check);
    }
    if let Some(stats) = &suite.stats {
        out.push_str(&format!(
            "\ntiming: n={} min={:.1}ms max={:.1}ms mean={:.1}ms median={:.1}ms \
             std={:.1}ms total={:.1}ms\n",
            stats.count,
            stats.min_ms,
            stats.max_ms,
            stats.mean_ms,
            stats.median_ms,
            stats.std_dev_ms,
            stats.total_ms
        ));
    }
    if let Some(score) = suite.apdex {
        out.push_str(&format!("apdex: {score:.3}\n"));
    }
    out.push_str(&format!(
        "result: {} error{}\n",
        suite.error_count,
        if suite.error_count == 1 { "" } else { "s" }
    ));
    out.push_str(&"=".repeat(78));
    out.push('\n');
}

/// Renders one check line plus its errors.
fn render_check(out: &mut String, check: &CheckReport) {
    let marker = if check.errors.is_empty() { "ok " } else { "FAIL" };
    let duration = check
        .duration_ms
        .map_or_else(|| "unrun".to_string(), |ms| format!("{ms:.1}ms"));
    out.push_str(&format!("[{marker}] {} ({duration})\n", check.name));
    for error in &check.errors {
        out.push_str(&format!("    [!] {error}\n"));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use std::collections::BTreeMap;

    use listgate_core::CheckError;
    use listgate_core::CheckId;

    use super::*;

    fn sample_suite(name: &str) -> SuiteReport {
        SuiteReport {
            name: name.to_string(),
            endpoint: "http://gateway.test/requests.json".to_string(),
            details: BTreeMap::from([("baseline_items".to_string(), "2".to_string())]),
            checks: vec![CheckReport {
                id: CheckId::new(1),
                name: "baseline schema".to_string(),
                description: "validate".to_string(),
                url: None,
                duration_ms: Some(1.5),
                errors: vec![CheckError::insufficient(CheckId::new(1), "got none".to_string())],
                details: BTreeMap::new(),
            }],
            stats: None,
            apdex: Some(0.625),
            error_count: 1,
        }
    }

    #[test]
    fn renders_failures_and_apdex() {
        let rendered = render_text(&[sample_suite("requests")]);
        assert!(rendered.contains("## requests"));
        assert!(rendered.contains("[FAIL] baseline schema"));
        assert!(rendered.contains("[!]"));
        assert!(rendered.contains("apdex: 0.625"));
        assert!(rendered.contains("result: 1 error\n"));
    }

    #[test]
    fn suites_are_sorted_by_name() {
        let rendered = render_text(&[sample_suite("zeta"), sample_suite("alpha")]);
        let alpha = rendered.find("## alpha").unwrap();
        let zeta = rendered.find("## zeta").unwrap();
        assert!(alpha < zeta);
    }
}
