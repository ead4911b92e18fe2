//! Builders for workflows used in tests.
//!
//! The free functions keep nested statement trees short enough to read at a
//! glance; [`WorkflowBuilder`] attaches initial variables.

use cadenza_dsl::{Statement, Variables, Workflow};

/// Activity invocation node
pub fn act(name: &str, arguments: &[&str], result: &str) -> Statement {
    Statement::activity(name, arguments, result)
}

/// Sequence node
pub fn seq(elements: Vec<Statement>) -> Statement {
    Statement::sequence(elements)
}

/// Parallel node
pub fn par(branches: Vec<Statement>) -> Statement {
    Statement::parallel(branches)
}

/// Builder for [`Workflow`] values
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    variables: Variables,
    root: Statement,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self {
            variables: Variables::new(),
            root: Statement::sequence(Vec::new()),
        }
    }
}

impl WorkflowBuilder {
    /// Start from no variables and an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `var1 = value1` and `var2 = value2`
    pub fn with_sample_variables() -> Self {
        Self::new()
            .variable("var1", "value1")
            .variable("var2", "value2")
    }

    /// Add an initial variable
    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the root statement
    pub fn root(mut self, root: Statement) -> Self {
        self.root = root;
        self
    }

    /// Finish the workflow
    pub fn build(self) -> Workflow {
        Workflow {
            variables: self.variables,
            root: self.root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let workflow = WorkflowBuilder::with_sample_variables()
            .root(seq(vec![act("a", &["var1"], "r1"), par(vec![act("b", &["r1"], "r2")])]))
            .build();

        assert_eq!(workflow.variables.len(), 2);
        assert_eq!(workflow.root.count_activities(), 2);
    }
}
