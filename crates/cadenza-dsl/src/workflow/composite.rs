use serde::{Deserialize, Serialize};

use super::Statement;

/// Statements evaluated strictly in order, stopping at the first failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Child statements in program order
    #[serde(default)]
    pub elements: Vec<Statement>,
}

/// Statements evaluated concurrently; every branch runs to completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parallel {
    /// Child statements in declaration order
    #[serde(default)]
    pub branches: Vec<Statement>,
}
