//!
//! Cadenza Core - orchestration kernels for Cadenza workflows
//!
//! This crate runs workflows written in the Cadenza DSL. It provides the
//! statement interpreter, the bounded-concurrency batch executor, the activity
//! dispatch boundary and registry, and the worker that ties them together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - bindings, activities and execution events
pub mod domain;

/// Application services - interpreter, batch executor and worker
pub mod application;

/// Worker configuration
pub mod config;

/// Error types
pub mod error;

/// Tracing setup
pub mod logging;

// Re-export key types
pub use error::{CoreError, TaskFailure, TaskFailures};

pub use domain::activity::{
    Activity, ActivityBase, ActivityDispatcher, ActivityOptions, ActivityRegistry, FnActivity,
};
pub use domain::bindings::Bindings;
pub use domain::events::{
    EventLog, ExecutionEvent, ExecutionEventHandler, NodeState, NoopEventHandler, RunId,
};

pub use application::batch::{run_batch, BatchExecutor, BatchInput, BatchReport, TaskState};
pub use application::interpreter::{Interpreter, WorkflowRun};
pub use application::worker::Worker;
pub use config::WorkerConfig;

// Re-export the DSL model so callers need only this crate
pub use cadenza_dsl::{ActivityInvocation, Parallel, Sequence, Statement, Variables, Workflow};

/// Returns a version string for the Cadenza core crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
