// crates/listgate-core/src/stats.rs
// ============================================================================
// Module: Timing Statistics
// Description: Aggregate duration statistics and Apdex scoring.
// Purpose: Summarize completed check durations for reporting.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Duration aggregates are computed over completed checks only, in
//! milliseconds. The Apdex score credits durations at or under the
//! threshold fully, durations within four thresholds at half weight, and
//! anything slower not at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Duration Statistics
// ============================================================================

/// Aggregate statistics over completed check durations, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    /// Number of samples.
    pub count: usize,
    /// Smallest sample.
    pub min_ms: f64,
    /// Largest sample.
    pub max_ms: f64,
    /// Sum over all samples.
    pub total_ms: f64,
    /// Arithmetic mean.
    pub mean_ms: f64,
    /// Median (midpoint average for even counts).
    pub median_ms: f64,
    /// Population standard deviation.
    pub std_dev_ms: f64,
}

impl DurationStats {
    /// Summarizes a set of durations; `None` when there are no samples.
    #[must_use]
    pub fn from_durations(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut millis: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1_000.0).collect();
        millis.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let count = millis.len();
        let total: f64 = millis.iter().sum();
        #[allow(clippy::cast_precision_loss, reason = "Sample counts stay far below 2^52.")]
        let count_f = count as f64;
        let mean = total / count_f;
        let variance = millis.iter().map(|ms| (ms - mean).powi(2)).sum::<f64>() / count_f;
        Some(Self {
            count,
            min_ms: millis[0],
            max_ms: millis[count - 1],
            total_ms: total,
            mean_ms: mean,
            median_ms: median_sorted(&millis),
            std_dev_ms: variance.sqrt(),
        })
    }
}

/// Median of a non-empty sorted slice; even counts average the midpoints.
fn median_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 { sorted[mid] } else { (sorted[mid - 1] + sorted[mid]) / 2.0 }
}

// ============================================================================
// SECTION: Apdex
// ============================================================================

/// Apdex satisfaction score over durations for a threshold `T`.
///
/// Durations at or under `T` are satisfied, at or under `4T` tolerating
/// (half credit), anything slower frustrated. Returns `None` without
/// samples.
#[must_use]
pub fn apdex(samples: &[Duration], threshold: Duration) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let tolerating_limit = threshold.saturating_mul(4);
    let mut score = 0.0_f64;
    for sample in samples {
        if *sample <= threshold {
            score += 1.0;
        } else if *sample <= tolerating_limit {
            score += 0.5;
        }
    }
    #[allow(clippy::cast_precision_loss, reason = "Sample counts stay far below 2^52.")]
    Some(score / samples.len() as f64)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
