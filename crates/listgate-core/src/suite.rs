// crates/listgate-core/src/suite.rs
// ============================================================================
// Module: Suite Orchestrator
// Description: Baseline fetch, domain derivation, plan execution, aggregates.
// Purpose: Own the transport and validator, run the plan strictly in order,
//          and expose aggregate views to the reporting collaborator.
// Dependencies: crate::{check, domain, errors, limits, param, plan, stats,
//               transport}, jsonschema, rand, serde_json
// ============================================================================

//! ## Overview
//! A [`Suite`] is constructed from fixed inputs (endpoint, item schema,
//! ordered parameter list, limits) and one injected [`Transport`].
//! [`Suite::prepare`] performs the explicit one-time initialization: fetch
//! the baseline once, derive per-parameter value domains, build the bounded
//! check plan. An empty baseline is the single suite-fatal error and is
//! reported before any plan exists. [`Suite::run`] executes checks strictly
//! in plan order; each check's failures are captured as error records, so
//! one check never aborts the rest. A returned item that lacks the filtered
//! property is recorded as a parameter mismatch, not a wrapped failure: the
//! endpoint claimed to filter on a property the item does not carry. There
//! is no cache invalidation: a fresh baseline requires a fresh suite
//! instance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use jsonschema::Draft;
use jsonschema::Validator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::Value;

use crate::check::Check;
use crate::check::CheckId;
use crate::check::CheckKind;
use crate::check::CheckOutcome;
use crate::check::CheckReport;
use crate::check::ParamBinding;
use crate::domain::ParamDomain;
use crate::domain::ValueDomain;
use crate::errors::CheckError;
use crate::errors::SuiteError;
use crate::limits::Limits;
use crate::param::Param;
use crate::plan::build_plan;
use crate::stats::DurationStats;
use crate::stats::apdex;
use crate::transport::Envelope;
use crate::transport::Transport;
use crate::transport::resolve_url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum characters kept from a single schema-violation diagnostic.
const MAX_DIAGNOSTIC_CHARS: usize = 240;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Fixed construction-time configuration for a suite.
///
/// # Invariants
/// - Immutable after construction; there is no runtime mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    /// Suite name used in reports and progress output.
    pub name: String,
    /// Endpoint URL every check issues its GET against.
    pub endpoint: String,
    /// Base query parameters merged into every GET; check-specific
    /// parameters override these on conflict.
    pub base_params: BTreeMap<String, String>,
    /// How the item array is packaged in response bodies.
    pub envelope: Envelope,
    /// Optional minimum result count for multi-parameter checks.
    pub min_multi_results: Option<usize>,
    /// Optional Apdex threshold in milliseconds.
    pub apdex_threshold_ms: Option<u64>,
    /// Optional RNG seed for reproducible plans.
    pub seed: Option<u64>,
}

impl SuiteConfig {
    /// Creates a configuration with defaults for everything but name and
    /// endpoint.
    #[must_use]
    pub fn new(name: &str, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            base_params: BTreeMap::new(),
            envelope: Envelope::Bare,
            min_multi_results: None,
            apdex_threshold_ms: None,
            seed: None,
        }
    }
}

// ============================================================================
// SECTION: Progress Sink
// ============================================================================

/// Observer notified as each check starts and completes.
///
/// Deliberately dependency-light so callers can plug in terminal output or
/// structured telemetry without the core growing an output dependency.
pub trait ProgressSink {
    /// Called before a check executes. `index` is 1-based.
    fn check_started(&mut self, index: usize, total: usize, check: &Check);
    /// Called after a check's outcome is stored.
    fn check_completed(&mut self, check: &Check);
}

/// Progress sink that discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn check_started(&mut self, _index: usize, _total: usize, _check: &Check) {}

    fn check_completed(&mut self, _check: &Check) {}
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Prepared state computed once by [`Suite::prepare`].
#[derive(Debug)]
struct Prepared {
    /// Baseline item list fetched once from the endpoint.
    baseline: Vec<Value>,
    /// Derived domains keyed by wire parameter name.
    domains: BTreeMap<String, ParamDomain>,
    /// Ordered check plan.
    checks: Vec<Check>,
}

/// Summary returned by [`Suite::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Checks executed during this call (already-run checks are skipped).
    pub checks_run: usize,
    /// Total errors collected across the whole plan.
    pub error_count: usize,
}

/// Contract-test suite for one paginated list endpoint.
///
/// # Invariants
/// - Transport, validator, parameter list, and limits are read-only across
///   all checks.
/// - Baseline and domains are computed once and held for the suite's
///   lifetime.
pub struct Suite<T: Transport> {
    /// Fixed configuration.
    config: SuiteConfig,
    /// Compiled Draft-4 validator for one item.
    validator: Validator,
    /// Ordered parameter list.
    params: Vec<Param>,
    /// Plan budgets and fairness caps.
    limits: Limits,
    /// Injected transport.
    transport: T,
    /// One-time initialized state; `None` until [`Suite::prepare`].
    prepared: Option<Prepared>,
}

impl<T: Transport> Suite<T> {
    /// Creates a suite, compiling the item schema.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Schema`] when the schema does not compile.
    pub fn new(
        config: SuiteConfig,
        schema: &Value,
        params: Vec<Param>,
        limits: Limits,
        transport: T,
    ) -> Result<Self, SuiteError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft4)
            .build(schema)
            .map_err(|err| SuiteError::Schema(err.to_string()))?;
        Ok(Self {
            config,
            validator,
            params,
            limits,
            transport,
            prepared: None,
        })
    }

    /// Returns the suite name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the suite configuration.
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Returns the plan limits.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the injected transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs the explicit one-time initialization: baseline fetch,
    /// domain derivation, plan construction. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::EmptyBaseline`] when the baseline holds no
    /// items, and transport or envelope errors when the fetch itself fails.
    pub fn prepare(&mut self) -> Result<(), SuiteError> {
        if self.prepared.is_some() {
            return Ok(());
        }
        let body = self.transport.get(&self.config.endpoint, &self.config.base_params)?;
        let baseline = self.config.envelope.peel(body)?;
        if baseline.is_empty() {
            return Err(SuiteError::EmptyBaseline);
        }
        let domains = derive_domains(&self.params, &baseline);
        let mut rng = self
            .config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let checks = build_plan(
            &self.params,
            &domains,
            &self.limits,
            self.config.min_multi_results,
            &mut rng,
        );
        self.prepared = Some(Prepared {
            baseline,
            domains,
            checks,
        });
        Ok(())
    }

    /// Runs the plan strictly in order, preparing first when needed.
    ///
    /// Already-completed checks are skipped, so re-invoking `run` returns
    /// previously computed outcomes without re-executing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] only for preparation failures; check-level
    /// problems are collected as error records.
    pub fn run(&mut self, progress: &mut dyn ProgressSink) -> Result<RunSummary, SuiteError> {
        self.prepare()?;
        let total = self.prepared.as_ref().map_or(0, |state| state.checks.len());
        let mut checks_run = 0_usize;
        for index in 0..total {
            let pending = {
                let Some(state) = self.prepared.as_ref() else { break };
                let check = &state.checks[index];
                if check.has_run() {
                    None
                } else {
                    Some((check.id(), check.kind().clone()))
                }
            };
            let Some((id, kind)) = pending else {
                continue;
            };
            if let Some(state) = self.prepared.as_ref() {
                progress.check_started(index + 1, total, &state.checks[index]);
            }
            let started = Instant::now();
            let errors = self.execute_kind(id, &kind);
            let outcome = CheckOutcome {
                errors,
                duration: started.elapsed(),
            };
            if let Some(state) = self.prepared.as_mut() {
                state.checks[index].complete(outcome);
                checks_run += 1;
                progress.check_completed(&state.checks[index]);
            }
        }
        Ok(RunSummary {
            checks_run,
            error_count: self.error_count(),
        })
    }

    /// Returns the ordered check plan once prepared.
    #[must_use]
    pub fn checks(&self) -> Option<&[Check]> {
        self.prepared.as_ref().map(|state| state.checks.as_slice())
    }

    /// Returns the derived domain for a wire parameter name, once prepared.
    #[must_use]
    pub fn domain(&self, parameter: &str) -> Option<&ParamDomain> {
        self.prepared.as_ref().and_then(|state| state.domains.get(parameter))
    }

    /// Returns the baseline item count, once prepared.
    #[must_use]
    pub fn baseline_len(&self) -> Option<usize> {
        self.prepared.as_ref().map(|state| state.baseline.len())
    }

    /// Flattens errors across all completed checks, in plan order.
    #[must_use]
    pub fn errors(&self) -> Vec<&CheckError> {
        self.prepared
            .as_ref()
            .map(|state| {
                state
                    .checks
                    .iter()
                    .filter_map(Check::errors)
                    .flatten()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total error count across all completed checks.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().len()
    }

    /// Timing statistics over completed check durations.
    #[must_use]
    pub fn stats(&self) -> Option<DurationStats> {
        DurationStats::from_durations(&self.completed_durations())
    }

    /// Apdex score for the configured threshold.
    #[must_use]
    pub fn apdex_score(&self) -> Option<f64> {
        let threshold = Duration::from_millis(self.config.apdex_threshold_ms?);
        apdex(&self.completed_durations(), threshold)
    }

    /// Builds the reporting view consumed by the reporting collaborator.
    #[must_use]
    pub fn report(&self) -> SuiteReport {
        let checks = self
            .prepared
            .as_ref()
            .map(|state| state.checks.iter().map(|check| self.check_report(check)).collect())
            .unwrap_or_default();
        let mut details = BTreeMap::new();
        details.insert("endpoint".to_string(), self.config.endpoint.clone());
        if let Some(count) = self.baseline_len() {
            details.insert("baseline_items".to_string(), count.to_string());
        }
        details.insert("parameters".to_string(), self.params.len().to_string());
        SuiteReport {
            name: self.config.name.clone(),
            endpoint: self.config.endpoint.clone(),
            details,
            checks,
            stats: self.stats(),
            apdex: self.apdex_score(),
            error_count: self.error_count(),
        }
    }

    /// Collects durations of completed checks in plan order.
    fn completed_durations(&self) -> Vec<Duration> {
        self.prepared
            .as_ref()
            .map(|state| state.checks.iter().filter_map(Check::duration).collect())
            .unwrap_or_default()
    }

    /// Builds the reporting view of one check.
    fn check_report(&self, check: &Check) -> CheckReport {
        let url = match check.kind() {
            CheckKind::BaselineSchema => None,
            _ => Some(resolve_url(&self.config.endpoint, &self.merged_query(check.kind()))),
        };
        CheckReport {
            id: check.id(),
            name: check.name(),
            description: check.description(),
            url,
            duration_ms: check.duration().map(|d| d.as_secs_f64() * 1_000.0),
            errors: check.errors().map(<[CheckError]>::to_vec).unwrap_or_default(),
            details: check.details(),
        }
    }

    /// Merges the base parameters with a check's own query; the check
    /// overrides the base set on conflict.
    fn merged_query(&self, kind: &CheckKind) -> BTreeMap<String, String> {
        let mut merged = self.config.base_params.clone();
        merged.extend(kind.query());
        merged
    }

    // ------------------------------------------------------------------
    // Check execution
    // ------------------------------------------------------------------

    /// Executes one check kind, capturing every failure as error records.
    fn execute_kind(&self, id: CheckId, kind: &CheckKind) -> Vec<CheckError> {
        match kind {
            CheckKind::BaselineSchema => self
                .prepared
                .as_ref()
                .map(|state| self.validate_items(id, &state.baseline))
                .unwrap_or_default(),
            CheckKind::SingleParam(binding) => {
                self.execute_filtered(id, std::slice::from_ref(binding), None)
            }
            CheckKind::MultiParam {
                bindings,
                min_results,
            } => self.execute_filtered(id, bindings, *min_results),
        }
    }

    /// Shared execution contract for filtered checks: one GET, result-count
    /// expectations, per-item comparator verification, per-item schema
    /// validation.
    fn execute_filtered(
        &self,
        id: CheckId,
        bindings: &[ParamBinding],
        min_results: Option<usize>,
    ) -> Vec<CheckError> {
        let kind_query: BTreeMap<String, String> =
            bindings.iter().map(ParamBinding::wire_pair).collect();
        let mut query = self.config.base_params.clone();
        query.extend(kind_query);

        let items = match self.fetch_items(&query) {
            Ok(items) => items,
            // A transport failure is hard inside the check but must never
            // abort the remaining plan.
            Err(failure) => return vec![CheckError::wrapped(id, failure)],
        };

        let mut errors = Vec::new();
        if let Some(threshold) = min_results {
            if items.len() < threshold {
                errors.push(CheckError::insufficient(
                    id,
                    format!("expected at least {threshold} items, got {}", items.len()),
                ));
            }
        } else if items.is_empty() {
            errors.push(CheckError::insufficient(
                id,
                "expected to receive items but got none".to_string(),
            ));
        }

        for item in &items {
            for binding in bindings {
                if let Some(error) = verify_binding(id, binding, item) {
                    errors.push(error);
                }
            }
        }
        errors.extend(self.validate_items(id, &items));
        errors
    }

    /// Issues one GET and peels the item list.
    fn fetch_items(&self, query: &BTreeMap<String, String>) -> Result<Vec<Value>, String> {
        let body = self
            .transport
            .get(&self.config.endpoint, query)
            .map_err(|err| err.to_string())?;
        self.config.envelope.peel(body).map_err(|err| err.to_string())
    }

    /// Validates every item against the schema, reporting all violations.
    fn validate_items(&self, id: CheckId, items: &[Value]) -> Vec<CheckError> {
        let mut errors = Vec::new();
        for item in items {
            for violation in self.validator.iter_errors(item) {
                let message = truncate_diagnostic(&format!(
                    "item does not conform to schema at {}: {violation}",
                    violation.instance_path()
                ));
                errors.push(CheckError::schema_violation(id, message, item.clone()));
            }
        }
        errors
    }
}

/// Verifies one binding against one returned item.
///
/// A missing or undecodable property is a parameter mismatch like any other
/// failed comparison.
fn verify_binding(id: CheckId, binding: &ParamBinding, item: &Value) -> Option<CheckError> {
    let param = &binding.param;
    match param.value_from(item) {
        Some(item_value) => {
            if param.comparator.evaluate(&item_value, &binding.value) {
                None
            } else {
                Some(CheckError::mismatch(
                    id,
                    format!(
                        "{}'s value {item_value} was not {} {}",
                        param.property, param.comparator, binding.value
                    ),
                    item.clone(),
                ))
            }
        }
        None => Some(CheckError::mismatch(
            id,
            format!("item is missing a comparable {} property", param.property),
            item.clone(),
        )),
    }
}

/// Derives value domains; parameters without observed values are omitted.
fn derive_domains(params: &[Param], baseline: &[Value]) -> BTreeMap<String, ParamDomain> {
    let mut domains = BTreeMap::new();
    for param in params {
        let raw = param.values_from(baseline);
        if raw.is_empty() {
            continue;
        }
        let bucketed = param.embucket(raw.clone());
        domains.insert(
            param.parameter.clone(),
            ParamDomain {
                raw: ValueDomain::new(raw),
                bucketed: ValueDomain::new(bucketed),
            },
        );
    }
    domains
}

/// Truncates a schema diagnostic to a bounded length.
fn truncate_diagnostic(message: &str) -> String {
    if message.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        return message.to_string();
    }
    let truncated: String = message.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
    format!("{truncated}…")
}

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Reporting view of a whole suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    /// Suite name.
    pub name: String,
    /// Endpoint under test.
    pub endpoint: String,
    /// Suite-level key/value details.
    pub details: BTreeMap<String, String>,
    /// Ordered check reports.
    pub checks: Vec<CheckReport>,
    /// Timing statistics over completed checks.
    pub stats: Option<DurationStats>,
    /// Apdex score, when a threshold is configured.
    pub apdex: Option<f64>,
    /// Total error count.
    pub error_count: usize,
}
