// crates/listgate-report/src/lib.rs
// ============================================================================
// Module: Listgate Report
// Description: Text and HTML rendering over the suite report surface.
// Purpose: Turn suite results into shareable artifacts without the core
//          growing an output dependency.
// Dependencies: listgate-core
// ============================================================================

//! ## Overview
//! Renders [`listgate_core::SuiteReport`] values deterministically: the
//! same report always produces byte-identical output. Documents are built
//! by plain string generation; suites are sorted by name so multi-suite
//! artifacts are stable regardless of run order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod html;
pub mod text;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use html::render_html;
pub use text::render_text;
