//! # Cadenza DSL
//!
//! The Cadenza DSL describes a workflow as a tree of statements evaluated against a
//! shared set of string variables. This crate provides the statement model, parsing
//! from YAML or JSON, and static validation of workflow documents.
//!
//! ## Features
//!
//! * Activity invocations bound through named variables
//! * Sequential (fail-fast) and parallel (wait-all) composition
//! * Exactly-one-variant statement nodes, enforced while parsing
//! * Static checks for unbound arguments and conflicting parallel writes
//!
//! ## Example
//!
//! ```
//! use cadenza_dsl::parse_and_validate_workflow;
//!
//! let yaml = r#"
//! variables:
//!   arg1: value1
//!   arg2: value2
//! root:
//!   sequence:
//!     elements:
//!       - activity:
//!           name: sampleActivity1
//!           arguments: [arg1]
//!           result: result1
//!       - parallel:
//!           branches:
//!             - activity:
//!                 name: sampleActivity2
//!                 arguments: [result1]
//!                 result: result2
//!             - activity:
//!                 name: sampleActivity3
//!                 arguments: [arg2]
//!                 result: result3
//! "#;
//!
//! let workflow = parse_and_validate_workflow(yaml).unwrap();
//! assert_eq!(workflow.root.count_activities(), 3);
//! ```

mod error;
mod parser;

pub mod validation;
pub mod workflow;

pub use error::DslError;
pub use parser::{load_workflow_file, parse_workflow_json, parse_workflow_yaml};
pub use validation::{validate_workflow, ValidationError};
pub use workflow::{
    ActivityInvocation, AmbiguousStatement, Parallel, Sequence, Statement, Variables, Workflow,
};

/// Parse and validate a Cadenza workflow YAML string.
///
/// This function performs both parsing and validation of a workflow document:
/// 1. Parses the YAML into a statement tree, rejecting ambiguous nodes
/// 2. Runs the structure, binding and conflict validators
/// 3. Returns the validated `Workflow` or detailed errors
///
/// # Errors
///
/// * Invalid YAML syntax or unknown keys
/// * A statement node with zero or several variants
/// * Validation errors (unbound arguments, conflicting parallel results, bad names)
///
/// # Examples
///
/// ```
/// use cadenza_dsl::parse_and_validate_workflow;
///
/// let invalid_yaml = r#"
/// root:
///   activity:
///     name: sampleActivity
///     arguments: [missing]
///     result: out
/// "#;
///
/// let err = parse_and_validate_workflow(invalid_yaml).unwrap_err();
/// assert!(err.error_code().contains("UNBOUND_VARIABLE"));
/// ```
pub fn parse_and_validate_workflow(yaml_str: &str) -> Result<Workflow, DslError> {
    let workflow = parser::parse_workflow_yaml(yaml_str)?;

    validation::validate_workflow(&workflow)?;

    Ok(workflow)
}

/// Returns a version string for the Cadenza DSL crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
