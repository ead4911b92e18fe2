use cadenza_dsl::DslError;
use std::fmt;
use thiserror::Error;

/// Core error type for the Cadenza runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An activity argument names a variable missing from the bindings
    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    /// No activity is registered under the requested name
    #[error("Activity not found: {0}")]
    ActivityNotFound(String),

    /// The activity implementation returned an error
    #[error("Activity '{activity}' failed: {message}")]
    ActivityExecution {
        /// Name the activity was dispatched under
        activity: String,
        /// Failure reported by the implementation
        message: String,
    },

    /// The activity did not finish within its start-to-close timeout
    #[error("Activity '{activity}' timed out after {timeout_ms} ms")]
    ActivityTimeout {
        /// Name the activity was dispatched under
        activity: String,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Work was canceled by the host
    #[error("Canceled: {0}")]
    Canceled(String),

    /// Two activities were registered under one name
    #[error("Activity already registered: {0}")]
    DuplicateActivity(String),

    /// Batch parameters are unusable (zero concurrency, size mismatch)
    #[error("Invalid batch configuration: {0}")]
    InvalidBatchConfiguration(String),

    /// One or more batch tasks failed
    #[error("{0}")]
    AggregatedTaskFailure(TaskFailures),

    /// No workflow is registered under the requested name
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// Two workflows were registered under one name
    #[error("Workflow already registered: {0}")]
    DuplicateWorkflow(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Workflow document failed to parse or validate
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Input/output error
    #[error("Input/output error: {0}")]
    IOError(String),
}

impl CoreError {
    /// Shorthand for an activity implementation failure
    pub fn activity_failed(activity: &str, message: impl Into<String>) -> Self {
        CoreError::ActivityExecution {
            activity: activity.to_string(),
            message: message.into(),
        }
    }

    /// True for a cancellation, including one buried in an aggregated batch failure
    pub fn is_canceled(&self) -> bool {
        match self {
            CoreError::Canceled(_) => true,
            CoreError::AggregatedTaskFailure(failures) => {
                failures.iter().any(|failure| failure.error.is_canceled())
            }
            _ => false,
        }
    }

    /// The individual task failures of an aggregated batch error
    pub fn task_failures(&self) -> Option<&[TaskFailure]> {
        match self {
            CoreError::AggregatedTaskFailure(failures) => Some(failures.as_slice()),
            _ => None,
        }
    }
}

/// Failure of a single batch task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Index of the task in the batch
    pub index: usize,

    /// Error the task returned
    pub error: CoreError,
}

/// Every failure of a batch run, ordered by task index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFailures(Vec<TaskFailure>);

impl TaskFailures {
    /// Collect failures; they are sorted by task index
    pub fn new(mut failures: Vec<TaskFailure>) -> Self {
        failures.sort_by_key(|failure| failure.index);
        Self(failures)
    }

    /// Number of failed tasks
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no task failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failures as a slice
    pub fn as_slice(&self) -> &[TaskFailure] {
        &self.0
    }

    /// Iterate over the failures
    pub fn iter(&self) -> std::slice::Iter<'_, TaskFailure> {
        self.0.iter()
    }

    /// Indexes of the failed tasks
    pub fn indexes(&self) -> Vec<usize> {
        self.0.iter().map(|failure| failure.index).collect()
    }
}

impl fmt::Display for TaskFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} batch task(s) failed:", self.0.len())?;
        for failure in &self.0 {
            write!(f, "\n  task {}: {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

impl From<DslError> for CoreError {
    fn from(err: DslError) -> Self {
        match err {
            DslError::Io(io) => CoreError::IOError(io.to_string()),
            other => CoreError::ValidationError(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::IOError(err.to_string())
    }
}
