mod activity;
mod composite;
mod raw;
mod statement;

pub use activity::ActivityInvocation;
pub use composite::{Parallel, Sequence};
pub use raw::AmbiguousStatement;
pub use statement::Statement;

pub(crate) use raw::RawWorkflow;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Initial variable bindings of a workflow, keyed by variable name
pub type Variables = HashMap<String, String>;

/// A complete workflow program.
///
/// The variables seed the bindings store of a run and the root statement is
/// evaluated against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workflow {
    /// Initial bindings
    #[serde(default)]
    pub variables: Variables,

    /// Root of the statement tree
    pub root: Statement,
}

impl Workflow {
    /// Create a workflow from its initial variables and root statement
    pub fn new(variables: Variables, root: Statement) -> Self {
        Self { variables, root }
    }

    /// Create a workflow without initial variables
    pub fn from_root(root: Statement) -> Self {
        Self {
            variables: HashMap::new(),
            root,
        }
    }

    /// Add an initial variable
    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }
}
