use std::collections::HashSet;

use crate::validation::{child_path, error_codes, ValidationError, Validator};
use crate::workflow::{Statement, Workflow};

/// Checks that every activity argument is bound before the activity can run.
///
/// A name counts as bound if it is an initial variable or the result of an
/// activity that completes earlier in an enclosing sequence. Results produced by
/// a sibling parallel branch are not visible to the other branches.
pub struct BindingValidator {}

impl BindingValidator {
    /// Create a new binding validator
    pub fn new() -> Self {
        BindingValidator {}
    }

    /// Returns the names guaranteed to be bound once `statement` succeeds
    fn bound_after(
        &self,
        statement: &Statement,
        bound: &HashSet<String>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> HashSet<String> {
        match statement {
            Statement::Activity(activity) => {
                for argument in &activity.arguments {
                    if !bound.contains(argument) {
                        errors.push(ValidationError {
                            code: error_codes::UNBOUND_VARIABLE,
                            message: format!(
                                "Activity '{}' reads '{}' which is not bound at this point",
                                activity.name, argument
                            ),
                            path: Some(path.to_string()),
                        });
                    }
                }

                let mut after = bound.clone();
                after.insert(activity.result.clone());
                after
            }
            Statement::Sequence(sequence) => {
                let mut current = bound.clone();
                for (index, element) in sequence.elements.iter().enumerate() {
                    let element_path = child_path(path, statement, index);
                    current = self.bound_after(element, &current, &element_path, errors);
                }
                current
            }
            Statement::Parallel(parallel) => {
                let mut after = bound.clone();
                for (index, branch) in parallel.branches.iter().enumerate() {
                    // Every branch starts from the same view
                    let branch_path = child_path(path, statement, index);
                    let branch_bound = self.bound_after(branch, bound, &branch_path, errors);
                    after.extend(branch_bound);
                }
                after
            }
        }
    }
}

impl Validator for BindingValidator {
    fn validate(&self, workflow: &Workflow) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let initial: HashSet<String> = workflow.variables.keys().cloned().collect();
        self.bound_after(&workflow.root, &initial, "root", &mut errors);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_results_flow_forward() {
        let workflow = Workflow::from_root(Statement::sequence(vec![
            Statement::activity("first", &["input"], "r1"),
            Statement::activity("second", &["r1"], "r2"),
        ]))
        .with_variable("input", "x");

        assert!(BindingValidator::new().validate(&workflow).is_empty());
    }

    #[test]
    fn test_use_before_definition_is_reported() {
        let workflow = Workflow::from_root(Statement::sequence(vec![
            Statement::activity("second", &["r1"], "r2"),
            Statement::activity::<&str>("first", &[], "r1"),
        ]));

        let errors = BindingValidator::new().validate(&workflow);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, error_codes::UNBOUND_VARIABLE);
        assert_eq!(errors[0].path.as_deref(), Some("root.elements[0]"));
    }

    #[test]
    fn test_sibling_branch_results_are_not_visible() {
        let workflow = Workflow::from_root(Statement::sequence(vec![
            Statement::parallel(vec![
                Statement::activity::<&str>("producer", &[], "shared"),
                Statement::activity("consumer", &["shared"], "out"),
            ]),
            Statement::activity("after", &["shared", "out"], "final"),
        ]));

        let errors = BindingValidator::new().validate(&workflow);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.as_deref(), Some("root.elements[0].branches[1]"));
    }
}
