// crates/listgate-core/src/domain.rs
// ============================================================================
// Module: Value Domains
// Description: Derived per-parameter value domains and sampling.
// Purpose: Hold the distinct observed baseline values for a parameter and
//          draw candidate test values from them.
// Dependencies: crate::value, rand
// ============================================================================

//! ## Overview
//! A [`ValueDomain`] is the sorted, deduplicated set of values a parameter
//! exposed across the baseline. Generated test values never leave observed
//! reality: discrete sampling draws members without replacement, continuous
//! sampling draws uniformly between the observed minimum and maximum.
//! Sampling is deterministic only in output ordering, not in selection; the
//! suite threads a seedable RNG through for reproducible plans.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use rand::Rng;
use rand::seq::SliceRandom;
use time::OffsetDateTime;

use crate::value::ParamValue;

// ============================================================================
// SECTION: Value Domain
// ============================================================================

/// Distinct observed values for one parameter, sorted ascending.
///
/// # Invariants
/// - Values share one kind and are deduplicated on wire encoding.
/// - Held read-only for the owning suite's lifetime once derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDomain {
    /// Sorted distinct values.
    values: Vec<ParamValue>,
}

impl ValueDomain {
    /// Builds a domain from observed values, deduplicating and sorting.
    #[must_use]
    pub fn new(mut values: Vec<ParamValue>) -> Self {
        values.sort_by(compare_values);
        values.dedup_by(|a, b| a.to_wire() == b.to_wire());
        Self {
            values,
        }
    }

    /// Returns the domain members in sorted order.
    #[must_use]
    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    /// Returns the number of distinct members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no values were observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the smallest observed value.
    #[must_use]
    pub fn min(&self) -> Option<&ParamValue> {
        self.values.first()
    }

    /// Returns the largest observed value.
    #[must_use]
    pub fn max(&self) -> Option<&ParamValue> {
        self.values.last()
    }

    /// Draws discrete candidate values.
    ///
    /// An unbounded count (zero) returns the full domain. Otherwise returns
    /// `min(count, len)` distinct members sampled without replacement, in
    /// sorted order.
    #[must_use]
    pub fn sample_discrete<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<ParamValue> {
        if count == 0 || count >= self.values.len() {
            return self.values.clone();
        }
        let mut sampled: Vec<ParamValue> =
            self.values.choose_multiple(rng, count).cloned().collect();
        sampled.sort_by(compare_values);
        sampled
    }

    /// Draws one value uniformly from the continuous range `[min, max]`.
    ///
    /// Duplicates across draws are possible and acceptable. Text domains
    /// have no dense range and degrade to choosing an observed member.
    #[must_use]
    pub fn sample_continuous<R: Rng>(&self, rng: &mut R) -> Option<ParamValue> {
        let min = self.min()?;
        let max = self.max()?;
        match (min, max) {
            (ParamValue::Number(low), ParamValue::Number(high)) => {
                Some(ParamValue::Number(rng.gen_range(*low..=*high)))
            }
            (ParamValue::Datetime(low), ParamValue::Datetime(high)) => {
                // Nanosecond resolution keeps a fractional-second minimum
                // inside the sampled range.
                let nanos =
                    rng.gen_range(low.unix_timestamp_nanos()..=high.unix_timestamp_nanos());
                OffsetDateTime::from_unix_timestamp_nanos(nanos)
                    .ok()
                    .map(ParamValue::Datetime)
            }
            _ => self.values.choose(rng).cloned(),
        }
    }
}

/// Total ordering over domain values: kind-aware where possible, wire
/// encoding as the tiebreaker for mixed or unordered pairs.
fn compare_values(a: &ParamValue, b: &ParamValue) -> Ordering {
    a.partial_cmp_value(b).unwrap_or_else(|| a.to_wire().cmp(&b.to_wire()))
}

// ============================================================================
// SECTION: Derived Parameter Domains
// ============================================================================

/// Raw and bucketed domains derived for one parameter.
///
/// The bucketed domain feeds single-parameter generation; the raw domain
/// feeds multi-parameter combination sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDomain {
    /// Distinct observed values before bucketing.
    pub raw: ValueDomain,
    /// Domain after the parameter's bucketing rule collapsed equivalents.
    pub bucketed: ValueDomain,
}
