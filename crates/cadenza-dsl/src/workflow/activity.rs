use serde::{Deserialize, Serialize};

/// Invocation of a named activity.
///
/// `arguments` are variable names resolved against the bindings at run time;
/// the activity result is stored under `result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInvocation {
    /// Registered name of the activity to dispatch
    pub name: String,

    /// Variable names whose values become the activity arguments, in order
    #[serde(default)]
    pub arguments: Vec<String>,

    /// Binding key that receives the stringified result
    pub result: String,
}

impl ActivityInvocation {
    /// Create a new activity invocation
    pub fn new<S: AsRef<str>>(name: &str, arguments: &[S], result: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: arguments.iter().map(|a| a.as_ref().to_string()).collect(),
            result: result.to_string(),
        }
    }
}
