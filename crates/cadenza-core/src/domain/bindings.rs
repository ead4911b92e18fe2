use crate::CoreError;
use cadenza_dsl::Variables;
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Variable store shared by every statement of one workflow run.
///
/// Parallel branches receive the same store by reference and see each other's
/// completed writes. Branches are expected to write disjoint keys; when two
/// branches write the same key the last write to complete wins; the order
/// is unspecified.
#[derive(Debug, Default)]
pub struct Bindings {
    values: DashMap<String, String>,
}

impl Bindings {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a working copy of the initial variables
    pub fn from_variables(variables: &Variables) -> Self {
        let values = DashMap::with_capacity(variables.len());
        for (name, value) in variables {
            values.insert(name.clone(), value.clone());
        }
        Self { values }
    }

    /// Current value of a variable
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).map(|entry| entry.value().clone())
    }

    /// Whether the variable is bound
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Look up every argument in order.
    ///
    /// Fails with `UnboundVariable` naming the first argument that is not bound.
    pub fn resolve(&self, arguments: &[String]) -> Result<Vec<String>, CoreError> {
        arguments
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| CoreError::UnboundVariable(name.clone()))
            })
            .collect()
    }

    /// Bind a value, replacing any previous one
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted copy of the current contents
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Consume the store, returning its contents
    pub fn into_variables(self) -> Variables {
        self.values.into_iter().collect()
    }
}

impl From<Variables> for Bindings {
    fn from(variables: Variables) -> Self {
        Self {
            values: variables.into_iter().collect(),
        }
    }
}
