// crates/listgate-core/src/check.rs
// ============================================================================
// Module: Checks
// Description: Check identity, kinds, and the run state machine.
// Purpose: Represent one verifiable unit that issues zero or one GET,
//          compares expectations, and yields zero or more errors.
// Dependencies: crate::{errors, param, value}, serde
// ============================================================================

//! ## Overview
//! A [`Check`] is built once by the plan builder and run at most once. Its
//! identity (parameter/value bindings) is immutable after construction; the
//! state machine is `Unrun -> Completed { errors, duration }` and terminal.
//! Re-running a completed check is a no-op that returns the stored outcome.
//! Execution itself lives on the suite, which owns the transport and the
//! compiled validator; the check kinds form a closed set rather than an
//! overridable base.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::errors::CheckError;
use crate::param::Param;
use crate::value::ParamValue;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Unique check identifier within one suite plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CheckId(u64);

impl CheckId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One parameter/value pair a check filters on.
///
/// # Invariants
/// - Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBinding {
    /// Parameter definition.
    pub param: Param,
    /// Filter value drawn from the parameter's derived domain.
    pub value: ParamValue,
}

impl ParamBinding {
    /// Returns the wire-encoded query pair for this binding.
    #[must_use]
    pub fn wire_pair(&self) -> (String, String) {
        (self.param.parameter.clone(), self.value.to_wire())
    }
}

// ============================================================================
// SECTION: Check Kinds
// ============================================================================

/// Closed set of check contracts.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    /// Schema-validates the baseline item collection; no network call.
    BaselineSchema,
    /// One GET filtered by a single parameter/value pair.
    SingleParam(ParamBinding),
    /// One GET filtered by the conjunction of several bindings.
    MultiParam {
        /// Bindings, no two of which share a source property.
        bindings: Vec<ParamBinding>,
        /// Optional minimum accepted result count.
        min_results: Option<usize>,
    },
}

impl CheckKind {
    /// Returns the wire-encoded query this check adds to the base
    /// parameters. Empty for the baseline check.
    #[must_use]
    pub fn query(&self) -> BTreeMap<String, String> {
        match self {
            Self::BaselineSchema => BTreeMap::new(),
            Self::SingleParam(binding) => BTreeMap::from([binding.wire_pair()]),
            Self::MultiParam {
                bindings, ..
            } => bindings.iter().map(ParamBinding::wire_pair).collect(),
        }
    }
}

// ============================================================================
// SECTION: Check State Machine
// ============================================================================

/// Result of one completed check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// Errors collected during execution; empty means the check passed.
    pub errors: Vec<CheckError>,
    /// Wall-clock execution time.
    pub duration: Duration,
}

/// One verifiable unit with a terminal run state.
///
/// # Invariants
/// - `kind` is immutable after construction.
/// - `outcome` transitions from `None` to `Some` exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    /// Unique identifier within the plan.
    id: CheckId,
    /// Immutable check contract.
    kind: CheckKind,
    /// Stored outcome; `None` until the check has run.
    outcome: Option<CheckOutcome>,
}

impl Check {
    /// Creates an unrun check.
    #[must_use]
    pub const fn new(id: CheckId, kind: CheckKind) -> Self {
        Self {
            id,
            kind,
            outcome: None,
        }
    }

    /// Returns the check identifier.
    #[must_use]
    pub const fn id(&self) -> CheckId {
        self.id
    }

    /// Returns the check contract.
    #[must_use]
    pub const fn kind(&self) -> &CheckKind {
        &self.kind
    }

    /// Returns true once the check has run.
    #[must_use]
    pub const fn has_run(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the stored pass/fail outcome, `None` until run.
    #[must_use]
    pub fn passed(&self) -> Option<bool> {
        self.outcome.as_ref().map(|outcome| outcome.errors.is_empty())
    }

    /// Returns collected errors, `None` until run.
    #[must_use]
    pub fn errors(&self) -> Option<&[CheckError]> {
        self.outcome.as_ref().map(|outcome| outcome.errors.as_slice())
    }

    /// Returns the execution duration, `None` until run.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.outcome.as_ref().map(|outcome| outcome.duration)
    }

    /// Stores the outcome of a completed run.
    ///
    /// The first stored outcome wins; later calls are ignored, which keeps
    /// `run` idempotent at the suite level.
    pub(crate) fn complete(&mut self, outcome: CheckOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub fn name(&self) -> String {
        match &self.kind {
            CheckKind::BaselineSchema => "baseline schema".to_string(),
            CheckKind::SingleParam(binding) => format!(
                "{}={} ({} {} {})",
                binding.param.parameter,
                binding.value,
                binding.param.property,
                binding.param.comparator,
                binding.value
            ),
            CheckKind::MultiParam {
                bindings, ..
            } => {
                let mut pairs: Vec<String> = bindings
                    .iter()
                    .map(|binding| format!("{}={}", binding.param.parameter, binding.value))
                    .collect();
                pairs.sort();
                pairs.join(",")
            }
        }
    }

    /// Returns a longer human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        match &self.kind {
            CheckKind::BaselineSchema => {
                "validate every baseline item against the item schema".to_string()
            }
            CheckKind::SingleParam(binding) => format!(
                "filter by {}={} and verify {} {} {} on every returned item",
                binding.param.parameter,
                binding.value,
                binding.param.property,
                binding.param.comparator,
                binding.value
            ),
            CheckKind::MultiParam {
                bindings,
                min_results,
            } => {
                let threshold = min_results
                    .map_or_else(String::new, |n| format!(" expecting at least {n} items"));
                format!("filter by {} parameters conjointly{threshold}", bindings.len())
            }
        }
    }

    /// Returns the key/value detail map exposed to reporting.
    #[must_use]
    pub fn details(&self) -> BTreeMap<String, String> {
        let mut details = self.kind.query();
        match &self.kind {
            CheckKind::BaselineSchema => {
                details.insert("check".to_string(), "baseline_schema".to_string());
            }
            CheckKind::SingleParam(_) => {
                details.insert("check".to_string(), "single_param".to_string());
            }
            CheckKind::MultiParam {
                min_results, ..
            } => {
                details.insert("check".to_string(), "multi_param".to_string());
                if let Some(threshold) = min_results {
                    details.insert("min_results".to_string(), threshold.to_string());
                }
            }
        }
        details
    }
}

// ============================================================================
// SECTION: Check Reports
// ============================================================================

/// Reporting view of one check, consumed by the reporting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    /// Check identifier.
    pub id: CheckId,
    /// Short name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Resolved request URL, `None` for network-free checks.
    pub url: Option<String>,
    /// Execution duration in milliseconds, `None` until run.
    pub duration_ms: Option<f64>,
    /// Collected errors; empty means passed.
    pub errors: Vec<CheckError>,
    /// Key/value detail map.
    pub details: BTreeMap<String, String>,
}
