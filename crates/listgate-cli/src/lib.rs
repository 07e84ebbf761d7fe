// crates/listgate-cli/src/lib.rs
// ============================================================================
// Module: Listgate CLI Library
// Description: Suite definition parsing and registry construction for the CLI.
// Purpose: Keep the declarative configuration layer testable apart from the
//          command dispatcher.
// Dependencies: listgate-core, listgate-http, serde, serde_json, thiserror, toml.
// ============================================================================

//! ## Overview
//! The `listgate` binary is driven by a TOML definitions file that declares
//! named suites: endpoint, response schema, filterable parameters, and
//! generation limits. This library holds the definition model and the
//! registry that turns definitions into runnable suites.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::Definitions;
pub use config::DefinitionsError;
pub use config::ParamDefinition;
pub use config::SuiteDefinition;
pub use registry::RegistryError;
pub use registry::SuiteOverrides;
pub use registry::SuiteRegistry;
