// crates/listgate-report/src/html.rs
// ============================================================================
// Module: HTML Report
// Description: Self-contained HTML document over suite results.
// Purpose: Produce a shareable report artifact with per-check detail.
// Dependencies: listgate-core
// ============================================================================

//! ## Overview
//! Generates one self-contained HTML document (inline styles, no external
//! assets) listing every suite sorted by name, its checks with resolved
//! URLs and durations, collected errors, and aggregate statistics. All
//! interpolated content is escaped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use listgate_core::CheckReport;
use listgate_core::SuiteReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Inline stylesheet for the report document.
const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
h2{border-bottom:2px solid #444}\
table{border-collapse:collapse;width:100%;margin:1em 0}\
td,th{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
tr.fail{background:#fde8e8}\
tr.pass{background:#e8f5e9}\
.errors{color:#b00020;margin:0;padding-left:1.2em}\
.meta{color:#666;font-size:0.9em}";

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders suites as one HTML document, sorted by suite name.
#[must_use]
pub fn render_html(title: &str, suites: &[SuiteReport]) -> String {
    let mut sorted: Vec<&SuiteReport> = suites.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(title)));
    out.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
    out.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    for suite in sorted {
        render_suite(&mut out, suite);
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Renders one suite section.
fn render_suite(out: &mut String, suite: &SuiteReport) {
    out.push_str(&format!("<h2>{}</h2>\n", escape(&suite.name)));
    out.push_str("<p class=\"meta\">");
    for (key, value) in &suite.details {
        out.push_str(&format!("{}: {} · ", escape(key), escape(value)));
    }
    out.push_str(&format!("errors: {}</p>\n", suite.error_count));
    out.push_str("<table>\n<tr><th>check</th><th>request</th><th>duration</th><th>errors</th></tr>\n");
    for check in &suite.checks {
        render_check_row(out, check);
    }
    out.push_str("</table>\n");
    if let Some(stats) = &suite.stats {
        out.push_str(&format!(
            "<p class=\"meta\">timing over {} checks: min {:.1} ms, max {:.1} ms, mean {:.1} ms, \
             median {:.1} ms, std {:.1} ms, total {:.1} ms</p>\n",
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
        out.push_str(&format!("<p class=\"meta\">apdex: {score:.3}</p>\n"));
    }
}

/// Renders one check as a table row.
fn render_check_row(out: &mut String, check: &CheckReport) {
    let class = if check.errors.is_empty() { "pass" } else { "fail" };
    out.push_str(&format!("<tr class=\"{class}\">"));
    out.push_str(&format!(
        "<td>{}<br><span class=\"meta\">{}</span></td>",
        escape(&check.name),
        escape(&check.description)
    ));
    out.push_str(&format!(
        "<td>{}</td>",
        check.url.as_deref().map_or_else(String::new, escape)
    ));
    out.push_str(&format!(
        "<td>{}</td>",
        check
            .duration_ms
            .map_or_else(|| "unrun".to_string(), |ms| format!("{ms:.1} ms"))
    ));
    if check.errors.is_empty() {
        out.push_str("<td></td>");
    } else {
        out.push_str("<td><ul class=\"errors\">");
        for error in &check.errors {
            out.push_str(&format!("<li>{}</li>", escape(&error.to_string())));
        }
        out.push_str("</ul></td>");
    }
    out.push_str("</tr>\n");
}

/// Escapes text for HTML interpolation.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ============================================================================
// SECTION: Tests
// ============================================================================
