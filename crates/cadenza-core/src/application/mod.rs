/// Statement tree interpreter
pub mod interpreter;

/// Bounded-concurrency batch executor
pub mod batch;

/// Worker hosting activities and workflows
pub mod worker;
