//! Testing utilities for Cadenza.
//!
//! This crate provides the shared testing toolkit for the Cadenza workspace:
//! a mockall mock of the activity dispatch boundary, a scripted recording
//! dispatcher, a concurrency probe for batch tests, workflow builders, DSL
//! generators, binding assertions and fixture loading.

pub mod assertions;
pub mod builders;
pub mod data_generators;
pub mod error;
pub mod fixtures;
pub mod implementations;
pub mod mocks;
pub mod util;

/// Re-export commonly used types for convenience
pub use mockall;

pub use error::TestError;
pub use implementations::{ConcurrencyProbe, DispatchCall, ProbeGuard, RecordingDispatcher};
pub use mocks::{create_mock_dispatcher, mock_dispatcher_with_results, MockActivityDispatcher};
pub use util::init_test_tracing;
