//! Wire shape of statements before the variant is resolved.
//!
//! A document node carries up to three optional keys; exactly one of them must
//! be present. Resolution happens recursively so the error can point at the
//! offending node.

use serde::Deserialize;
use std::fmt;

use super::{ActivityInvocation, Parallel, Sequence, Statement, Variables, Workflow};

/// A statement node that populated zero or several variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousStatement {
    /// Location of the node (e.g. "root.elements[1]")
    pub path: String,

    /// The variant keys that were populated
    pub populated: Vec<&'static str>,
}

impl fmt::Display for AmbiguousStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.populated.is_empty() {
            write!(
                f,
                "statement at {} sets none of 'activity', 'sequence', 'parallel'",
                self.path
            )
        } else {
            write!(
                f,
                "statement at {} sets more than one variant: {}",
                self.path,
                self.populated.join(", ")
            )
        }
    }
}

impl std::error::Error for AmbiguousStatement {}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawWorkflow {
    #[serde(default)]
    variables: Variables,
    root: RawStatement,
}

impl RawWorkflow {
    pub(crate) fn into_workflow(self) -> Result<Workflow, AmbiguousStatement> {
        Ok(Workflow {
            variables: self.variables,
            root: self.root.into_statement("root")?,
        })
    }
}

#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStatement {
    #[serde(default)]
    activity: Option<ActivityInvocation>,
    #[serde(default)]
    sequence: Option<RawSequence>,
    #[serde(default)]
    parallel: Option<RawParallel>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSequence {
    #[serde(default)]
    elements: Vec<RawStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParallel {
    #[serde(default)]
    branches: Vec<RawStatement>,
}

impl RawStatement {
    fn populated(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.activity.is_some() {
            keys.push("activity");
        }
        if self.sequence.is_some() {
            keys.push("sequence");
        }
        if self.parallel.is_some() {
            keys.push("parallel");
        }
        keys
    }

    pub(crate) fn into_statement(self, path: &str) -> Result<Statement, AmbiguousStatement> {
        let populated = self.populated();
        if populated.len() != 1 {
            return Err(AmbiguousStatement {
                path: path.to_string(),
                populated,
            });
        }

        match self {
            RawStatement {
                activity: Some(activity),
                ..
            } => Ok(Statement::Activity(activity)),
            RawStatement {
                sequence: Some(sequence),
                ..
            } => {
                let elements = sequence
                    .elements
                    .into_iter()
                    .enumerate()
                    .map(|(i, raw)| raw.into_statement(&format!("{}.elements[{}]", path, i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Statement::Sequence(Sequence { elements }))
            }
            RawStatement {
                parallel: Some(parallel),
                ..
            } => {
                let branches = parallel
                    .branches
                    .into_iter()
                    .enumerate()
                    .map(|(i, raw)| raw.into_statement(&format!("{}.branches[{}]", path, i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Statement::Parallel(Parallel { branches }))
            }
            // populated() guarantees exactly one key
            _ => Err(AmbiguousStatement {
                path: path.to_string(),
                populated: Vec::new(),
            }),
        }
    }
}

impl TryFrom<RawStatement> for Statement {
    type Error = AmbiguousStatement;

    fn try_from(raw: RawStatement) -> Result<Self, Self::Error> {
        raw.into_statement("root")
    }
}
