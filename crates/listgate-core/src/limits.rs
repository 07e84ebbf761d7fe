// crates/listgate-core/src/limits.rs
// ============================================================================
// Module: Plan Limits
// Description: Budget and fairness policy for generated checks.
// Purpose: Cap generated test volume without embedding plan mechanics.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Limits`] is pure policy consumed by the plan builder. Every knob is
//! non-negative and zero means unbounded. The fairness cap exists so one
//! "hot" parameter cannot dominate an otherwise unbounded combination
//! space.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Budget and fairness caps for plan construction.
///
/// # Invariants
/// - Immutable after construction; the plan builder only reads it.
/// - Zero means unbounded for every count knob.
/// - `multi_param_probability` is an acceptance probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum single-parameter checks generated per parameter.
    pub max_single_checks_per_param: usize,
    /// Maximum multi-parameter checks generated in total.
    pub max_multi_checks: usize,
    /// Maximum accepted multi-parameter checks any one parameter may join.
    pub max_multi_checks_involving_param: usize,
    /// Probability that a sampled multi-parameter candidate is kept.
    pub multi_param_probability: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_single_checks_per_param: 0,
            max_multi_checks: 0,
            max_multi_checks_involving_param: 0,
            multi_param_probability: 1.0,
        }
    }
}

impl Limits {
    /// Returns the probability clamped into `[0, 1]`.
    #[must_use]
    pub fn acceptance_probability(&self) -> f64 {
        self.multi_param_probability.clamp(0.0, 1.0)
    }
}
