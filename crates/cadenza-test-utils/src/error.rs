use thiserror::Error;

/// Error types for the test utilities
#[derive(Debug, Error)]
pub enum TestError {
    /// A binding did not hold the expected value
    #[error("Binding '{key}': expected {expected}, got {actual}")]
    BindingMismatch {
        /// Variable name
        key: String,
        /// Expected value, or `<unbound>`
        expected: String,
        /// Actual value, or `<unbound>`
        actual: String,
    },

    /// A node did not end in the expected state
    #[error("Node '{path}': expected {expected}, got {actual}")]
    NodeStateMismatch {
        /// Node path
        path: String,
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },
}
