// crates/listgate-core/src/param.rs
// ============================================================================
// Module: Queryable Parameters
// Description: Parameter definitions, comparators, and bucketing rules.
// Purpose: Bind a wire parameter to an item property, a verification
//          predicate, and a value-derivation strategy.
// Dependencies: crate::value, serde
// ============================================================================

//! ## Overview
//! A [`Param`] binds a query-string key to an item property. During plan
//! construction its observed baseline values become the test domain; during
//! execution its [`Comparator`] decides whether a returned item satisfies
//! the filter it was queried with. An optional [`BucketRule`] collapses
//! near-equivalent values (for example all timestamps on one day) to a
//! single representative so the plan does not waste budget on redundant
//! checks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::value::ParamValue;
use crate::value::ValueKind;

// ============================================================================
// SECTION: Comparator
// ============================================================================

/// Binary predicate used to verify a returned item against the filter value.
///
/// # Invariants
/// - Variants are stable for suite-definition deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Item value equals the filter value.
    Eq,
    /// Item value differs from the filter value.
    Ne,
    /// Item value is strictly less than the filter value.
    Lt,
    /// Item value is less than or equal to the filter value.
    Le,
    /// Item value is strictly greater than the filter value.
    Gt,
    /// Item value is greater than or equal to the filter value.
    Ge,
}

impl Comparator {
    /// Returns a stable label for the comparator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        }
    }

    /// Evaluates the predicate over an item value and the filter value.
    ///
    /// A kind mismatch between the two sides evaluates to `false`; the
    /// caller reports it as a mismatch rather than an ordering.
    #[must_use]
    pub fn evaluate(self, item_value: &ParamValue, filter_value: &ParamValue) -> bool {
        item_value.partial_cmp_value(filter_value).is_some_and(|ordering| match self {
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Lt => ordering.is_lt(),
            Self::Le => ordering.is_le(),
            Self::Gt => ordering.is_gt(),
            Self::Ge => ordering.is_ge(),
        })
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Bucketing
// ============================================================================

/// Value-deduplication rule applied before single-parameter plan generation.
///
/// Values sharing a bucket key are considered equivalent for test purposes;
/// exactly one representative per key survives (last writer wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketRule {
    /// Collapse datetime values to their calendar day (`YYYYMMDD`).
    CalendarDay,
}

impl BucketRule {
    /// Returns the bucket key for a value.
    #[must_use]
    pub fn key(self, value: &ParamValue) -> String {
        match (self, value) {
            (Self::CalendarDay, ParamValue::Datetime(stamp)) => {
                format!("{:04}{:02}{:02}", stamp.year(), u8::from(stamp.month()), stamp.day())
            }
            // Non-datetime values degrade to identity bucketing.
            (Self::CalendarDay, other) => other.to_wire(),
        }
    }
}

// ============================================================================
// SECTION: Parameter
// ============================================================================

/// A queryable wire parameter bound to an item property.
///
/// # Invariants
/// - `parameter` defaults to `property` and is immutable after construction.
/// - Wire encoding and decoding are exact inverses over the parameter's
///   observed domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Item property the parameter filters on.
    pub property: String,
    /// Query-string key carried on the wire.
    pub parameter: String,
    /// Kind of values this parameter carries.
    pub kind: ValueKind,
    /// Predicate verifying returned items against the filter value.
    pub comparator: Comparator,
    /// Optional value-deduplication rule.
    pub bucket: Option<BucketRule>,
    /// Whether the domain is enumerable (discrete) or dense (continuous).
    pub discrete: bool,
}

impl Param {
    /// Creates an equality parameter whose wire key matches the property.
    ///
    /// Text parameters are discrete; number and datetime parameters default
    /// to continuous.
    #[must_use]
    pub fn new(property: &str, kind: ValueKind) -> Self {
        Self {
            property: property.to_string(),
            parameter: property.to_string(),
            kind,
            comparator: Comparator::Eq,
            bucket: None,
            discrete: matches!(kind, ValueKind::Text),
        }
    }

    /// Overrides the wire parameter key.
    #[must_use]
    pub fn with_parameter(mut self, parameter: &str) -> Self {
        self.parameter = parameter.to_string();
        self
    }

    /// Overrides the verification comparator.
    #[must_use]
    pub const fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Attaches a bucketing rule.
    #[must_use]
    pub const fn with_bucket(mut self, bucket: BucketRule) -> Self {
        self.bucket = Some(bucket);
        self
    }

    /// Marks the domain as discrete or continuous.
    #[must_use]
    pub const fn with_discrete(mut self, discrete: bool) -> Self {
        self.discrete = discrete;
        self
    }

    /// Decodes this parameter's value from a single item.
    ///
    /// Returns `None` when the item lacks the property or the property does
    /// not decode as the parameter's kind.
    #[must_use]
    pub fn value_from(&self, item: &Value) -> Option<ParamValue> {
        let raw = item.get(&self.property)?;
        self.kind.decode_json(raw).ok()
    }

    /// Collects the distinct property values observed across baseline items.
    ///
    /// Items missing the property are silently skipped. Distinctness is
    /// keyed on the wire encoding.
    #[must_use]
    pub fn values_from(&self, items: &[Value]) -> Vec<ParamValue> {
        let mut distinct: BTreeMap<String, ParamValue> = BTreeMap::new();
        for item in items {
            if let Some(value) = self.value_from(item) {
                distinct.insert(value.to_wire(), value);
            }
        }
        distinct.into_values().collect()
    }

    /// Applies the bucketing rule, keeping one representative per key.
    #[must_use]
    pub fn embucket(&self, values: Vec<ParamValue>) -> Vec<ParamValue> {
        let Some(bucket) = self.bucket else {
            return values;
        };
        let mut buckets: BTreeMap<String, ParamValue> = BTreeMap::new();
        for value in values {
            buckets.insert(bucket.key(&value), value);
        }
        buckets.into_values().collect()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.parameter, self.property, self.comparator)
    }
}
