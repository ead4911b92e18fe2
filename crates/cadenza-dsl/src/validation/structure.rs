use lazy_static::lazy_static;
use regex::Regex;

use crate::validation::{child_path, error_codes, ValidationError, Validator};
use crate::workflow::{Statement, Workflow};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap();
}

/// Validates names used by the workflow: non-empty activity names and result keys,
/// and well-formed variable identifiers
pub struct StructureValidator {
    // Could hold configuration if needed
}

impl StructureValidator {
    /// Create a new structure validator
    pub fn new() -> Self {
        StructureValidator {}
    }

    fn check_identifier(
        &self,
        name: &str,
        role: &str,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if !IDENTIFIER.is_match(name) {
            errors.push(ValidationError {
                code: error_codes::INVALID_IDENTIFIER,
                message: format!("Invalid {} name: '{}'", role, name),
                path: Some(path.to_string()),
            });
        }
    }

    fn validate_statement(
        &self,
        statement: &Statement,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        match statement {
            Statement::Activity(activity) => {
                if activity.name.trim().is_empty() {
                    errors.push(ValidationError {
                        code: error_codes::EMPTY_NAME,
                        message: "Activity name must not be empty".to_string(),
                        path: Some(path.to_string()),
                    });
                }

                if activity.result.is_empty() {
                    errors.push(ValidationError {
                        code: error_codes::EMPTY_NAME,
                        message: format!("Activity '{}' has an empty result key", activity.name),
                        path: Some(path.to_string()),
                    });
                } else {
                    self.check_identifier(&activity.result, "result", path, errors);
                }

                for argument in &activity.arguments {
                    self.check_identifier(argument, "argument", path, errors);
                }
            }
            Statement::Sequence(_) | Statement::Parallel(_) => {
                for (index, child) in statement.children().iter().enumerate() {
                    self.validate_statement(child, &child_path(path, statement, index), errors);
                }
            }
        }
    }
}

impl Validator for StructureValidator {
    fn validate(&self, workflow: &Workflow) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // Sort for a stable error order
        let mut names: Vec<&String> = workflow.variables.keys().collect();
        names.sort();
        for name in names {
            self.check_identifier(name, "variable", "variables", &mut errors);
        }

        self.validate_statement(&workflow.root, "root", &mut errors);
        errors
    }
}
