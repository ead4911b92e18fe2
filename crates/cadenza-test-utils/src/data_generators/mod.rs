//! Test data generators for Cadenza.
//!
//! This module provides functions for generating workflow documents in the
//! Cadenza DSL, so tests can exercise the parser and the interpreter together.

mod dsl;

// Re-export all data generators for easy access
pub use dsl::*;
