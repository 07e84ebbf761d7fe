// crates/listgate-core/src/errors.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Check-level error records and suite-fatal errors.
// Purpose: Describe what went wrong without aborting the remaining plan.
// Dependencies: crate::check, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Check-level problems are plain data records collected per check and
//! returned as values, never raised: a parameter mismatch, too few results,
//! a schema violation, or any other wrapped failure. The single suite-fatal
//! condition is an empty baseline, reported before any plan exists;
//! [`SuiteError`] covers it together with construction-time failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::check::CheckId;
use crate::transport::PeelError;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Check Error Records
// ============================================================================

/// Classification of a check-level error.
///
/// # Invariants
/// - Variants are stable for reporting and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckErrorKind {
    /// An item's live value violates the comparator relation against the
    /// value used to filter it.
    ParameterMismatch,
    /// A query expected to match at least one (or N) items returned fewer.
    InsufficientResults,
    /// An item fails schema conformance.
    SchemaViolation,
    /// Any other failure raised during check execution.
    WrappedFailure,
}

impl CheckErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ParameterMismatch => "parameter_mismatch",
            Self::InsufficientResults => "insufficient_results",
            Self::SchemaViolation => "schema_violation",
            Self::WrappedFailure => "wrapped_failure",
        }
    }
}

/// One check-level error record.
///
/// # Invariants
/// - `check_id` names the originating check.
/// - `item` carries the offending item for mismatch and schema kinds.
/// - `underlying` carries the rendered source failure for wrapped kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckError {
    /// Originating check.
    pub check_id: CheckId,
    /// Error classification.
    pub kind: CheckErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Offending item, when one exists.
    pub item: Option<Value>,
    /// Rendered underlying failure, when one exists.
    pub underlying: Option<String>,
}

impl CheckError {
    /// Builds a parameter-mismatch record for one offending item.
    #[must_use]
    pub fn mismatch(check_id: CheckId, message: String, item: Value) -> Self {
        Self {
            check_id,
            kind: CheckErrorKind::ParameterMismatch,
            message,
            item: Some(item),
            underlying: None,
        }
    }

    /// Builds an insufficient-results record.
    #[must_use]
    pub const fn insufficient(check_id: CheckId, message: String) -> Self {
        Self {
            check_id,
            kind: CheckErrorKind::InsufficientResults,
            message,
            item: None,
            underlying: None,
        }
    }

    /// Builds a schema-violation record carrying the offending item.
    #[must_use]
    pub fn schema_violation(check_id: CheckId, message: String, item: Value) -> Self {
        Self {
            check_id,
            kind: CheckErrorKind::SchemaViolation,
            message,
            item: Some(item),
            underlying: None,
        }
    }

    /// Wraps an arbitrary execution failure.
    #[must_use]
    pub fn wrapped(check_id: CheckId, underlying: String) -> Self {
        Self {
            check_id,
            kind: CheckErrorKind::WrappedFailure,
            message: "check execution failed".to_string(),
            item: None,
            underlying: Some(underlying),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] check {}: {}", self.kind.label(), self.check_id, self.message)?;
        if let Some(underlying) = &self.underlying {
            write!(f, " ({underlying})")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Suite Errors
// ============================================================================

/// Suite-fatal errors raised outside check execution.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The baseline fetch returned zero items; nothing to derive parameter
    /// domains or combinations from.
    #[error("baseline returned no items; nothing to derive test values from")]
    EmptyBaseline,
    /// The item schema failed to compile.
    #[error("schema failed to compile: {0}")]
    Schema(String),
    /// The baseline fetch failed at the transport level.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The baseline response body did not peel to an item list.
    #[error(transparent)]
    Peel(#[from] PeelError),
}
