use std::collections::{BTreeMap, BTreeSet};

use crate::validation::{child_path, error_codes, ValidationError, Validator};
use crate::workflow::{Statement, Workflow};

/// Reports parallel branches that write the same result key.
///
/// Concurrent writes to one key have no defined winner at run time.
pub struct ConflictValidator {}

impl ConflictValidator {
    /// Create a new conflict validator
    pub fn new() -> Self {
        ConflictValidator {}
    }

    fn written_keys(statement: &Statement) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        statement.walk(&mut |node| {
            if let Statement::Activity(activity) = node {
                keys.insert(activity.result.as_str());
            }
        });
        keys
    }

    fn check(&self, statement: &Statement, path: &str, errors: &mut Vec<ValidationError>) {
        if let Statement::Parallel(parallel) = statement {
            // key -> branch indexes writing it
            let mut writers: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
            for (index, branch) in parallel.branches.iter().enumerate() {
                for key in Self::written_keys(branch) {
                    writers.entry(key).or_default().push(index);
                }
            }

            for (key, branches) in writers {
                if branches.len() > 1 {
                    errors.push(ValidationError {
                        code: error_codes::CONFLICTING_RESULT,
                        message: format!(
                            "Result '{}' is written by parallel branches {:?}",
                            key, branches
                        ),
                        path: Some(path.to_string()),
                    });
                }
            }
        }

        for (index, child) in statement.children().iter().enumerate() {
            self.check(child, &child_path(path, statement, index), errors);
        }
    }
}

impl Validator for ConflictValidator {
    fn validate(&self, workflow: &Workflow) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.check(&workflow.root, "root", &mut errors);
        errors
    }
}
