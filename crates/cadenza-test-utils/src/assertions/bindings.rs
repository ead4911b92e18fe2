//! Assertion utilities for validating bindings and node states.

use crate::TestError;
use cadenza_core::{Bindings, EventLog, NodeState};

const UNBOUND: &str = "<unbound>";

/// Asserts that `key` is bound to `expected`.
///
/// # Returns
///
/// * `Ok(())` - If the binding holds the expected value
/// * `Err(TestError::BindingMismatch)` - Otherwise
pub fn assert_binding(bindings: &Bindings, key: &str, expected: &str) -> Result<(), TestError> {
    match bindings.get(key) {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(TestError::BindingMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual: actual.unwrap_or_else(|| UNBOUND.to_string()),
        }),
    }
}

/// Asserts that `key` is not bound.
pub fn assert_unbound(bindings: &Bindings, key: &str) -> Result<(), TestError> {
    match bindings.get(key) {
        None => Ok(()),
        Some(actual) => Err(TestError::BindingMismatch {
            key: key.to_string(),
            expected: UNBOUND.to_string(),
            actual,
        }),
    }
}

/// Asserts the final state of each listed node path.
///
/// Paths that never ran are `NotStarted`.
pub fn assert_node_states(log: &EventLog, expected: &[(&str, NodeState)]) -> Result<(), TestError> {
    for (path, state) in expected {
        let actual = log.final_state(path);
        if actual != *state {
            return Err(TestError::NodeStateMismatch {
                path: path.to_string(),
                expected: format!("{:?}", state),
                actual: format!("{:?}", actual),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_assertions() {
        let bindings = Bindings::new();
        bindings.insert("present", "yes");

        assert!(assert_binding(&bindings, "present", "yes").is_ok());
        assert!(assert_unbound(&bindings, "absent").is_ok());

        let err = assert_binding(&bindings, "absent", "yes").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Binding 'absent': expected yes, got <unbound>"
        );
        assert!(assert_unbound(&bindings, "present").is_err());
    }

    #[test]
    fn test_node_state_assertions() {
        let log = EventLog::new();
        assert!(assert_node_states(&log, &[("root", NodeState::NotStarted)]).is_ok());
        assert!(assert_node_states(&log, &[("root", NodeState::Succeeded)]).is_err());
    }
}
