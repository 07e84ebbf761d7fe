// crates/listgate-cli/src/config.rs
// ============================================================================
// Module: Suite Definitions
// Description: TOML model for declarative suite configuration.
// Purpose: Describe suites as data so new endpoints need no code changes.
// Dependencies: listgate-core, serde, thiserror, toml.
// ============================================================================

//! ## Overview
//! A definitions file declares named suites under a `[suites.<name>]` table:
//! the endpoint, the response item schema (a path resolved against the
//! definitions file), the filterable parameters, and the generation limits.
//! Parsing is strict: unknown keys are rejected so typos surface at load
//! time instead of silently producing an empty plan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use listgate_core::BucketRule;
use listgate_core::Comparator;
use listgate_core::Envelope;
use listgate_core::Limits;
use listgate_core::Param;
use listgate_core::SuiteConfig;
use listgate_core::ValueKind;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a definitions document does not parse.
#[derive(Debug, Error)]
#[error("invalid suite definitions: {0}")]
pub struct DefinitionsError(#[from] toml::de::Error);

// ============================================================================
// SECTION: Definitions Document
// ============================================================================

/// Root of a suite-definitions document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    /// Declared suites keyed by registry name.
    pub suites: BTreeMap<String, SuiteDefinition>,
}

impl Definitions {
    /// Parses a TOML definitions document.
    ///
    /// # Errors
    /// Returns [`DefinitionsError`] when the document is not valid TOML or
    /// contains unknown keys.
    pub fn parse(text: &str) -> Result<Self, DefinitionsError> {
        Ok(toml::from_str(text)?)
    }
}

/// One declared suite.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDefinition {
    /// Endpoint URL every check issues its GET against.
    pub endpoint: String,
    /// Path to the item JSON Schema, resolved against the definitions file.
    pub schema: PathBuf,
    /// Base query parameters merged into every GET.
    #[serde(default)]
    pub base_params: BTreeMap<String, String>,
    /// How the item array is packaged in response bodies.
    #[serde(default)]
    pub envelope: Envelope,
    /// Minimum result count expected from multi-parameter checks.
    #[serde(default)]
    pub min_multi_results: Option<usize>,
    /// Apdex satisfaction threshold in milliseconds.
    #[serde(default)]
    pub apdex_threshold_ms: Option<u64>,
    /// RNG seed for reproducible plans.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Budget and fairness caps for plan construction.
    #[serde(default)]
    pub limits: Limits,
    /// Filterable parameters to derive domains for.
    #[serde(default)]
    pub params: Vec<ParamDefinition>,
}

impl SuiteDefinition {
    /// Builds the runtime suite configuration for this definition.
    #[must_use]
    pub fn suite_config(&self, name: &str) -> SuiteConfig {
        let mut config = SuiteConfig::new(name, &self.endpoint);
        config.base_params = self.base_params.clone();
        config.envelope = self.envelope.clone();
        config.min_multi_results = self.min_multi_results;
        config.apdex_threshold_ms = self.apdex_threshold_ms;
        config.seed = self.seed;
        config
    }

    /// Builds the runtime parameter set for this definition.
    #[must_use]
    pub fn runtime_params(&self) -> Vec<Param> {
        self.params.iter().map(ParamDefinition::to_param).collect()
    }
}

// ============================================================================
// SECTION: Parameter Definition
// ============================================================================

/// One declared filterable parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDefinition {
    /// Item property the parameter filters on.
    pub property: String,
    /// Kind of values the parameter carries.
    pub kind: ValueKind,
    /// Wire query key; defaults to the property name.
    #[serde(default)]
    pub parameter: Option<String>,
    /// Verification comparator; defaults to equality.
    #[serde(default)]
    pub comparator: Option<Comparator>,
    /// Optional value-deduplication rule.
    #[serde(default)]
    pub bucket: Option<BucketRule>,
    /// Discrete/continuous override; defaults by kind.
    #[serde(default)]
    pub discrete: Option<bool>,
}

impl ParamDefinition {
    /// Builds the runtime parameter, applying defaults for absent fields.
    #[must_use]
    pub fn to_param(&self) -> Param {
        let mut param = Param::new(&self.property, self.kind);
        if let Some(parameter) = &self.parameter {
            param = param.with_parameter(parameter);
        }
        if let Some(comparator) = self.comparator {
            param = param.with_comparator(comparator);
        }
        if let Some(bucket) = self.bucket {
            param = param.with_bucket(bucket);
        }
        if let Some(discrete) = self.discrete {
            param = param.with_discrete(discrete);
        }
        param
    }
}
