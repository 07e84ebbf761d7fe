// crates/listgate-core/src/value.rs
// ============================================================================
// Module: Parameter Values
// Description: Typed parameter values and their wire codec.
// Purpose: Decode item properties into comparable values and encode them
//          back into query-string form without loss.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! A queryable parameter carries values of one of three kinds: text, number,
//! or datetime. Values are decoded from baseline items, compared against
//! live responses, and encoded into query strings. The wire codec is
//! lossless: `parse_wire(to_wire(v))` returns `v` for every value in a
//! parameter's domain. Non-finite numbers and timestamps outside the RFC 3339
//! formatting range are rejected at decode time so the round-trip law holds
//! everywhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Value Kind
// ============================================================================

/// Kind of value a parameter carries.
///
/// # Invariants
/// - Variants are stable for suite-definition deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Plain string values, compared lexicographically.
    Text,
    /// Finite floating-point numbers; numeric strings are accepted on decode.
    Number,
    /// RFC 3339 timestamps.
    Datetime,
}

impl ValueKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Datetime => "datetime",
        }
    }

    /// Decodes a raw query-string value into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when the raw string does not parse as this kind.
    pub fn parse_wire(self, raw: &str) -> Result<ParamValue, ValueError> {
        match self {
            Self::Text => Ok(ParamValue::Text(raw.to_string())),
            Self::Number => parse_number(raw),
            Self::Datetime => {
                let stamp =
                    OffsetDateTime::parse(raw, &Rfc3339).map_err(|err| ValueError::Decode {
                        kind: self,
                        detail: err.to_string(),
                    })?;
                // A held timestamp must encode back to RFC 3339.
                if stamp.format(&Rfc3339).is_err() {
                    return Err(ValueError::Decode {
                        kind: self,
                        detail: format!("timestamp is not representable in RFC 3339: {raw}"),
                    });
                }
                Ok(ParamValue::Datetime(stamp))
            }
        }
    }

    /// Decodes an item property into a typed value.
    ///
    /// Number decoding also accepts numeric strings because real endpoints
    /// frequently serialize numbers that way.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when the JSON value does not match this kind.
    pub fn decode_json(self, value: &Value) -> Result<ParamValue, ValueError> {
        match (self, value) {
            (Self::Text, Value::String(text)) => Ok(ParamValue::Text(text.clone())),
            (Self::Number, Value::Number(number)) => {
                let raw = number.as_f64().ok_or_else(|| ValueError::Decode {
                    kind: self,
                    detail: "number out of f64 range".to_string(),
                })?;
                finite(raw).map(ParamValue::Number).ok_or_else(|| ValueError::Decode {
                    kind: self,
                    detail: "non-finite number".to_string(),
                })
            }
            (Self::Number | Self::Datetime, Value::String(text)) => self.parse_wire(text),
            (kind, other) => Err(ValueError::Decode {
                kind,
                detail: format!("unexpected JSON value for {} kind: {other}", kind.label()),
            }),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a numeric wire value, rejecting non-finite results.
fn parse_number(raw: &str) -> Result<ParamValue, ValueError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(finite)
        .map(ParamValue::Number)
        .ok_or_else(|| ValueError::Decode {
            kind: ValueKind::Number,
            detail: format!("not a finite number: {raw}"),
        })
}

/// Returns the input when finite, `None` otherwise.
const fn finite(raw: f64) -> Option<f64> {
    if raw.is_finite() { Some(raw) } else { None }
}

// ============================================================================
// SECTION: Value
// ============================================================================

/// A typed parameter value drawn from or compared against item properties.
///
/// # Invariants
/// - `Number` values are always finite.
/// - `to_wire` output parses back to an equal value via
///   [`ValueKind::parse_wire`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text value.
    Text(String),
    /// Finite numeric value.
    Number(f64),
    /// Timestamp value.
    Datetime(OffsetDateTime),
}

impl ParamValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Datetime(_) => ValueKind::Datetime,
        }
    }

    /// Encodes this value for use in a query string.
    ///
    /// Numbers use Rust's shortest round-trip formatting; timestamps use
    /// RFC 3339. Wire encoding doubles as the deduplication key for domains.
    /// Decoding rejects timestamps the RFC 3339 formatter cannot reproduce,
    /// so the formatting fallback never fires for a held value.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => format!("{number}"),
            Self::Datetime(stamp) => {
                stamp.format(&Rfc3339).unwrap_or_else(|_| stamp.to_string())
            }
        }
    }

    /// Compares two values of the same kind.
    ///
    /// Returns `None` for kind mismatches; callers treat that as a failed
    /// comparison rather than an ordering.
    #[must_use]
    pub fn partial_cmp_value(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => Some(left.cmp(right)),
            (Self::Number(left), Self::Number(right)) => left.partial_cmp(right),
            (Self::Datetime(left), Self::Datetime(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while decoding parameter values.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ValueError {
    /// A raw wire or JSON value did not decode as the expected kind.
    #[error("failed to decode {kind} value: {detail}")]
    Decode {
        /// Expected value kind.
        kind: ValueKind,
        /// Human-readable decode failure detail.
        detail: String,
    },
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

    use serde_json::json;

    use super::*;

    #[test]
    fn number_decode_accepts_numeric_strings() {
        let value = ValueKind::Number.decode_json(&json!("12.5")).unwrap();
        assert_eq!(value, ParamValue::Number(12.5));
    }

    #[test]
    fn number_decode_rejects_non_finite() {
        assert!(ValueKind::Number.parse_wire("NaN").is_err());
        assert!(ValueKind::Number.parse_wire("inf").is_err());
    }

    #[test]
    fn datetime_decode_rejects_years_beyond_rfc3339() {
        assert!(ValueKind::Datetime.parse_wire("+10000-01-01T00:00:00Z").is_err());
        assert!(ValueKind::Datetime.parse_wire("10000-01-01T00:00:00Z").is_err());
    }

    #[test]
    fn datetime_round_trip() {
        let value = ValueKind::Datetime.parse_wire("2025-04-01T12:30:00Z").unwrap();
        assert_eq!(value.to_wire(), "2025-04-01T12:30:00Z");
        let again = ValueKind::Datetime.parse_wire(&value.to_wire()).unwrap();
        assert_eq!(value, again);
    }

    #[test]
    fn kind_mismatch_has_no_ordering() {
        let text = ParamValue::Text("1".to_string());
        let number = ParamValue::Number(1.0);
        assert!(text.partial_cmp_value(&number).is_none());
    }
}
