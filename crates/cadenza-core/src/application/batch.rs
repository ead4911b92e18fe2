use crate::error::{TaskFailure, TaskFailures};
use crate::CoreError;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

/// Default number of batch tasks allowed to run at once
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Default number of tasks in a batch
pub const DEFAULT_TOTAL_SIZE: usize = 10;

/// Shape of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchInput {
    /// Maximum number of tasks running at once
    pub concurrency: usize,

    /// Number of tasks in the batch
    pub total_size: usize,
}

impl Default for BatchInput {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            total_size: DEFAULT_TOTAL_SIZE,
        }
    }
}

impl BatchInput {
    /// Create a batch shape
    pub fn new(concurrency: usize, total_size: usize) -> Self {
        Self {
            concurrency,
            total_size,
        }
    }

    /// Check the concurrency cap on its own
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.concurrency == 0 {
            return Err(CoreError::InvalidBatchConfiguration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the shape against the number of task factories supplied
    pub fn validate_for(&self, factory_count: usize) -> Result<(), CoreError> {
        self.validate()?;
        if factory_count != self.total_size {
            return Err(CoreError::InvalidBatchConfiguration(format!(
                "total_size is {} but {} task factories were supplied",
                self.total_size, factory_count
            )));
        }
        Ok(())
    }
}

/// Lifecycle of one batch task. A task is started as soon as it is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Waiting for a free slot; its factory has not been invoked
    Pending,
    /// Admitted and running
    Running,
    /// Done without error
    Succeeded,
    /// Done with an error
    Failed,
}

impl TaskState {
    /// True for `Succeeded` and `Failed`
    pub fn is_done(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

/// Outcome of a finished batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of tasks in the batch
    pub total: usize,

    /// Number of tasks that succeeded
    pub succeeded: usize,

    /// Every failed task, ordered by index
    pub failures: TaskFailures,

    /// Final state of every task, by index
    pub states: Vec<TaskState>,

    /// Highest number of tasks observed running at once
    pub peak_running: usize,
}

impl BatchReport {
    /// True when every task succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok` when every task succeeded, `AggregatedTaskFailure` listing every failure otherwise
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(CoreError::AggregatedTaskFailure(self.failures))
        }
    }
}

/// Runs homogeneous tasks with at most `concurrency` of them running at once.
///
/// Each factory is invoked only when its task is admitted, so unstarted tasks hold
/// no resources. All tasks run on the caller's task; nothing is spawned. The batch
/// waits for every task and never stops early on failure.
pub struct BatchExecutor<F> {
    input: BatchInput,
    factories: Vec<F>,
}

impl<F, Fut> BatchExecutor<F>
where
    F: FnOnce(usize) -> Fut,
    Fut: Future<Output = Result<(), CoreError>>,
{
    /// Create an executor; fails when the input does not match the factories
    pub fn new(input: BatchInput, factories: Vec<F>) -> Result<Self, CoreError> {
        input.validate_for(factories.len())?;
        Ok(Self { input, factories })
    }

    /// Create an executor that uses a clone of `factory` for every index
    pub fn from_fn(input: BatchInput, factory: F) -> Result<Self, CoreError>
    where
        F: Clone,
    {
        input.validate()?;
        let factories = vec![factory; input.total_size];
        Self::new(input, factories)
    }

    /// Run every task to completion
    pub async fn run(self) -> BatchReport {
        let concurrency = self.input.concurrency;
        let total = self.factories.len();

        let mut states = vec![TaskState::Pending; total];
        let mut pending = self.factories.into_iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut failures = Vec::new();
        let mut succeeded = 0;
        let mut peak_running = 0;

        debug!(total, concurrency, "Starting batch");

        loop {
            while in_flight.len() < concurrency {
                let Some((index, factory)) = pending.next() else {
                    break;
                };
                let task = factory(index);
                states[index] = TaskState::Running;
                in_flight.push(async move { (index, task.await) });
                peak_running = peak_running.max(in_flight.len());
                debug!(task = index, running = in_flight.len(), "Admitted batch task");
            }

            match in_flight.next().await {
                Some((index, Ok(()))) => {
                    states[index] = TaskState::Succeeded;
                    succeeded += 1;
                    debug!(task = index, "Batch task succeeded");
                }
                Some((index, Err(error))) => {
                    states[index] = TaskState::Failed;
                    warn!(task = index, error = %error, "Batch task failed");
                    failures.push(TaskFailure { index, error });
                }
                None => break,
            }
        }

        info!(
            total,
            succeeded,
            failed = failures.len(),
            peak_running,
            "Batch completed"
        );

        BatchReport {
            total,
            succeeded,
            failures: TaskFailures::new(failures),
            states,
            peak_running,
        }
    }
}

impl<F> std::fmt::Debug for BatchExecutor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchExecutor")
            .field("input", &self.input)
            .field("factories", &self.factories.len())
            .finish()
    }
}

/// Run a batch and reduce it to a single outcome
pub async fn run_batch<F, Fut>(input: BatchInput, factories: Vec<F>) -> Result<(), CoreError>
where
    F: FnOnce(usize) -> Fut,
    Fut: Future<Output = Result<(), CoreError>>,
{
    BatchExecutor::new(input, factories)?.run().await.into_result()
}
