//! Common types and utilities for the gvy verifier.
//!
//! This crate provides foundational types used across all gvy crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message table)
//! - Source spans (`Span`, `Spanned`)
//! - Verifier limits and thresholds

// Diagnostics - message table and diagnostic records
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, diagnostic_codes,
    diagnostic_messages, format_message, render_message,
};

// Span - Source location tracking (line/column)
pub mod span;
pub use span::{Span, Spanned};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
