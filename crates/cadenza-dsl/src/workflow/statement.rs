use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

use super::raw::RawStatement;
use super::{ActivityInvocation, Parallel, Sequence};

/// One node of the workflow program.
///
/// Serialized as a single-key map: `{"activity": {...}}`, `{"sequence": {...}}`
/// or `{"parallel": {...}}`. A node that sets none or several of these keys is
/// rejected while deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawStatement")]
pub enum Statement {
    /// Dispatch one activity and bind its result
    Activity(ActivityInvocation),
    /// Evaluate children in order, fail fast
    Sequence(Sequence),
    /// Evaluate children concurrently, wait for all
    Parallel(Parallel),
}

impl Statement {
    /// Shorthand for an activity invocation node
    pub fn activity<S: AsRef<str>>(name: &str, arguments: &[S], result: &str) -> Self {
        Statement::Activity(ActivityInvocation::new(name, arguments, result))
    }

    /// Shorthand for a sequence node
    pub fn sequence(elements: Vec<Statement>) -> Self {
        Statement::Sequence(Sequence { elements })
    }

    /// Shorthand for a parallel node
    pub fn parallel(branches: Vec<Statement>) -> Self {
        Statement::Parallel(Parallel { branches })
    }

    /// The wire key of this node's variant
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Activity(_) => "activity",
            Statement::Sequence(_) => "sequence",
            Statement::Parallel(_) => "parallel",
        }
    }

    /// Direct children of this node, in declaration order
    pub fn children(&self) -> &[Statement] {
        match self {
            Statement::Activity(_) => &[],
            Statement::Sequence(sequence) => &sequence.elements,
            Statement::Parallel(parallel) => &parallel.branches,
        }
    }

    /// Visit this node and all descendants depth-first, parents before children
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Statement),
    {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every activity name referenced in the tree, first occurrence order, without duplicates
    pub fn activity_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        self.walk(&mut |statement| {
            if let Statement::Activity(activity) = statement {
                if seen.insert(activity.name.as_str()) {
                    names.push(activity.name.as_str());
                }
            }
        });
        names
    }

    /// Number of activity invocation nodes in the tree
    pub fn count_activities(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |statement| {
            if matches!(statement, Statement::Activity(_)) {
                count += 1;
            }
        });
        count
    }
}

// Written by hand so YAML output uses the same single-key map as JSON
// instead of serde_yaml's tagged enum form.
impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Statement::Activity(activity) => map.serialize_entry(self.kind(), activity)?,
            Statement::Sequence(sequence) => map.serialize_entry(self.kind(), sequence)?,
            Statement::Parallel(parallel) => map.serialize_entry(self.kind(), parallel)?,
        }
        map.end()
    }
}

impl From<ActivityInvocation> for Statement {
    fn from(activity: ActivityInvocation) -> Self {
        Statement::Activity(activity)
    }
}

impl From<Sequence> for Statement {
    fn from(sequence: Sequence) -> Self {
        Statement::Sequence(sequence)
    }
}

impl From<Parallel> for Statement {
    fn from(parallel: Parallel) -> Self {
        Statement::Parallel(parallel)
    }
}
