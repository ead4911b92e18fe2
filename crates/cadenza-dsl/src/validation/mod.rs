use std::fmt;
use std::error::Error;
use crate::workflow::{Statement, Workflow};
use crate::error::DslError;

mod binding;
mod conflict;
mod structure;

/// Represents a validation error that occurred during DSL processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code (should be a constant identifier)
    pub code: &'static str,

    /// Human-readable error message
    pub message: String,

    /// Optional path to the location of the error (e.g., "root.elements[2]")
    pub path: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl Error for ValidationError {}

/// Validation error codes
pub mod error_codes {
    /// Activity name or result key is empty
    pub const EMPTY_NAME: &str = "ERR_DSL_VALIDATION_EMPTY_NAME";

    /// Variable, argument or result name is not a valid identifier
    pub const INVALID_IDENTIFIER: &str = "ERR_DSL_VALIDATION_INVALID_IDENTIFIER";

    /// Argument refers to a variable that is not bound when the activity runs
    pub const UNBOUND_VARIABLE: &str = "ERR_DSL_VALIDATION_UNBOUND_VARIABLE";

    /// Sibling parallel branches write the same result key
    pub const CONFLICTING_RESULT: &str = "ERR_DSL_VALIDATION_CONFLICTING_RESULT";
}

/// A trait for validators that check specific aspects of a workflow
pub trait Validator {
    /// Validate the workflow and return a list of validation errors (if any)
    fn validate(&self, workflow: &Workflow) -> Vec<ValidationError>;
}

/// Location of the `index`-th child of a node, matching the paths used by the parser
pub(crate) fn child_path(path: &str, parent: &Statement, index: usize) -> String {
    match parent {
        Statement::Parallel(_) => format!("{}.branches[{}]", path, index),
        _ => format!("{}.elements[{}]", path, index),
    }
}

/// Validate a parsed workflow
pub fn validate_workflow(workflow: &Workflow) -> Result<(), DslError> {
    let validators: Vec<Box<dyn Validator>> = vec![
        Box::new(structure::StructureValidator::new()),
        Box::new(binding::BindingValidator::new()),
        Box::new(conflict::ConflictValidator::new()),
    ];

    // Run all validators and collect errors
    let mut errors = Vec::new();

    for validator in validators {
        let validator_errors = validator.validate(workflow);
        errors.extend(validator_errors);
    }

    if !errors.is_empty() {
        return Err(DslError::from_validation_errors(errors));
    }

    Ok(())
}
