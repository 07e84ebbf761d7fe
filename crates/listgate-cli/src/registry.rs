// crates/listgate-cli/src/registry.rs
// ============================================================================
// Module: Suite Registry
// Description: Explicit name-to-suite lookup built from a definitions file.
// Purpose: Resolve suite names to runnable suites without reflective lookup.
// Dependencies: listgate-core, listgate-http, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The registry loads a definitions file once, resolves schema paths against
//! the file's directory, and constructs [`Suite`] instances on demand. Every
//! suite a command can name is listed here explicitly; an unknown name is an
//! error that reports the available names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use listgate_core::Suite;
use listgate_core::SuiteError;
use listgate_core::TransportError;
use listgate_http::HttpTransport;
use serde_json::Value;
use thiserror::Error;

use crate::config::Definitions;
use crate::config::DefinitionsError;
use crate::config::SuiteDefinition;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a suite-definitions file.
const MAX_DEFINITIONS_BYTES: usize = 1024 * 1024;
/// Maximum size of an item schema file.
const MAX_SCHEMA_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading definitions or building suites.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A file could not be read or exceeded its size limit.
    #[error("cannot read {path}: {detail}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying failure detail.
        detail: String,
    },
    /// The definitions document did not parse.
    #[error(transparent)]
    Definitions(#[from] DefinitionsError),
    /// A schema file did not parse as JSON.
    #[error("invalid schema {path}: {detail}")]
    Schema {
        /// Offending schema path.
        path: String,
        /// Parser detail.
        detail: String,
    },
    /// The requested suite name is not declared.
    #[error("unknown suite {name}; available: {available}")]
    UnknownSuite {
        /// Requested name.
        name: String,
        /// Comma-separated declared names.
        available: String,
    },
    /// Suite construction or preparation failed.
    #[error(transparent)]
    Suite(#[from] SuiteError),
    /// The HTTP transport could not be constructed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Command-line overrides applied on top of a declared definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteOverrides {
    /// Replacement endpoint URL.
    pub endpoint: Option<String>,
    /// Replacement single-parameter budget.
    pub max_single_checks_per_param: Option<usize>,
    /// Replacement multi-parameter budget.
    pub max_multi_checks: Option<usize>,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Explicit registry of declared suites.
#[derive(Debug)]
pub struct SuiteRegistry {
    /// Directory schema paths resolve against.
    base_dir: PathBuf,
    /// Declared suites keyed by name.
    suites: BTreeMap<String, SuiteDefinition>,
}

impl SuiteRegistry {
    /// Loads a registry from a definitions file.
    ///
    /// # Errors
    /// Returns [`RegistryError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = read_limited(path, MAX_DEFINITIONS_BYTES)?;
        let definitions = Definitions::parse(&text)?;
        let base_dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self::from_definitions(definitions, base_dir))
    }

    /// Builds a registry from parsed definitions with an explicit base
    /// directory for schema resolution.
    #[must_use]
    pub fn from_definitions(definitions: Definitions, base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            suites: definitions.suites,
        }
    }

    /// Declared suite names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.suites.keys().map(String::as_str).collect()
    }

    /// Looks up a declared suite definition.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownSuite`] for undeclared names.
    pub fn definition(&self, name: &str) -> Result<&SuiteDefinition, RegistryError> {
        self.suites.get(name).ok_or_else(|| RegistryError::UnknownSuite {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    /// Builds a runnable suite over the default HTTP transport.
    ///
    /// The endpoint override replaces the declared endpoint, which is how a
    /// definitions file written against production is pointed at a staging
    /// deployment; budget overrides replace the declared limits for quick
    /// smoke runs.
    ///
    /// # Errors
    /// Returns [`RegistryError`] when the name is undeclared, the schema
    /// file is unreadable or invalid, or suite construction fails.
    pub fn build(
        &self,
        name: &str,
        overrides: &SuiteOverrides,
    ) -> Result<Suite<HttpTransport>, RegistryError> {
        let definition = self.definition(name)?;
        let schema = self.load_schema(&definition.schema)?;
        let mut config = definition.suite_config(name);
        if let Some(endpoint) = &overrides.endpoint {
            config.endpoint = endpoint.clone();
        }
        let mut limits = definition.limits;
        if let Some(budget) = overrides.max_single_checks_per_param {
            limits.max_single_checks_per_param = budget;
        }
        if let Some(budget) = overrides.max_multi_checks {
            limits.max_multi_checks = budget;
        }
        let transport = HttpTransport::with_defaults()?;
        let suite =
            Suite::new(config, &schema, definition.runtime_params(), limits, transport)?;
        Ok(suite)
    }

    /// Reads and parses an item schema, resolving relative paths against
    /// the definitions directory.
    fn load_schema(&self, schema_path: &Path) -> Result<Value, RegistryError> {
        let resolved = if schema_path.is_absolute() {
            schema_path.to_path_buf()
        } else {
            self.base_dir.join(schema_path)
        };
        let text = read_limited(&resolved, MAX_SCHEMA_BYTES)?;
        serde_json::from_str(&text).map_err(|err| RegistryError::Schema {
            path: resolved.display().to_string(),
            detail: err.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a UTF-8 file enforcing a byte ceiling.
fn read_limited(path: &Path, limit: usize) -> Result<String, RegistryError> {
    let text = fs::read_to_string(path).map_err(|err| RegistryError::Io {
        path: path.display().to_string(),
        detail: err.to_string(),
    })?;
    if text.len() > limit {
        return Err(RegistryError::Io {
            path: path.display().to_string(),
            detail: format!("file exceeds {limit} bytes"),
        });
    }
    Ok(text)
}
