// crates/listgate-http/src/lib.rs
// ============================================================================
// Module: Listgate HTTP
// Description: Blocking HTTP transport for live suite runs.
// Purpose: Implement the core transport seam over a reused reqwest session.
// Dependencies: listgate-core, reqwest
// ============================================================================

//! ## Overview
//! This crate ships the one production implementation of the core
//! [`listgate_core::Transport`] trait: a blocking, redirect-free, size- and
//! time-limited GET client. The core never links reqwest; everything
//! network-shaped lives here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::HttpTransport;
pub use client::HttpTransportConfig;
