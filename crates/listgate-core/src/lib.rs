// crates/listgate-core/src/lib.rs
// ============================================================================
// Module: Listgate Core
// Description: Contract-testing engine for paginated list endpoints.
// Purpose: Derive parameter value domains from a baseline, build a bounded
//          check plan, execute it sequentially, and aggregate results.
// Dependencies: jsonschema, rand, serde, serde_json, thiserror, time, url
// ============================================================================

//! ## Overview
//! Listgate verifies list/search endpoints against their own behavior:
//! given an endpoint, a Draft-4 JSON Schema for one item, and a set of
//! queryable parameters, it fetches an unfiltered baseline, derives
//! realistic parameter values from it, generates budgeted single- and
//! multi-parameter checks, and verifies that filtering constrains results
//! correctly and that every returned item conforms to the schema.
//!
//! The core is single-threaded and fully synchronous; the HTTP boundary is
//! the [`Transport`] trait so unit tests never touch the network.
//! Invariants:
//! - Generated values are always drawn from or bounded by the observed
//!   baseline domain.
//! - Checks run at most once; completed outcomes are terminal.
//! - An empty baseline is the single suite-fatal error.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod check;
pub mod domain;
pub mod errors;
pub mod limits;
pub mod param;
pub mod plan;
pub mod stats;
pub mod suite;
pub mod transport;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use check::Check;
pub use check::CheckId;
pub use check::CheckKind;
pub use check::CheckOutcome;
pub use check::CheckReport;
pub use check::ParamBinding;
pub use domain::ParamDomain;
pub use domain::ValueDomain;
pub use errors::CheckError;
pub use errors::CheckErrorKind;
pub use errors::SuiteError;
pub use limits::Limits;
pub use param::BucketRule;
pub use param::Comparator;
pub use param::Param;
pub use plan::build_plan;
pub use stats::DurationStats;
pub use stats::apdex;
pub use suite::NullProgress;
pub use suite::ProgressSink;
pub use suite::RunSummary;
pub use suite::Suite;
pub use suite::SuiteConfig;
pub use suite::SuiteReport;
pub use transport::Envelope;
pub use transport::PeelError;
pub use transport::Transport;
pub use transport::TransportError;
pub use transport::resolve_url;
pub use value::ParamValue;
pub use value::ValueError;
pub use value::ValueKind;
