//! Assertion utilities for validating workflow runs.
//!
//! This module provides helper functions for checking bindings and node states
//! after a run, returning descriptive errors instead of bare booleans.

mod bindings;

// Re-export all assertion helpers for easy access
pub use bindings::*;
