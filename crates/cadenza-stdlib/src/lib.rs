//!
//! Standard library of activities for Cadenza
//!
//! Ready-made activities for sample workflows, the factory that builds them by
//! name, and the batch sample workflow.

use cadenza_core::{
    run_batch, ActivityDispatcher, ActivityRegistry, BatchInput, CoreError, Worker, WorkerConfig,
};
use std::sync::Arc;
use tracing::info;

pub mod activities;

pub use activities::{
    BatchActivity, ConcatActivity, SampleActivity, SleepActivity, BATCH_ACTIVITY,
    CONCAT_ACTIVITY, SAMPLE_ACTIVITY, SLEEP_ACTIVITY,
};

/// Activity factory
pub mod factory {
    use super::*;
    use cadenza_core::Activity;

    /// Every activity name the factory knows, in registration order
    pub const ACTIVITY_NAMES: [&str; 4] =
        [SAMPLE_ACTIVITY, CONCAT_ACTIVITY, BATCH_ACTIVITY, SLEEP_ACTIVITY];

    /// Create an activity by name
    pub fn create_activity(name: &str) -> Result<Arc<dyn Activity>, CoreError> {
        match name {
            SAMPLE_ACTIVITY => Ok(Arc::new(SampleActivity::new())),
            CONCAT_ACTIVITY => Ok(Arc::new(ConcatActivity::new())),
            BATCH_ACTIVITY => Ok(Arc::new(BatchActivity::new())),
            SLEEP_ACTIVITY => Ok(Arc::new(SleepActivity::new())),
            _ => Err(CoreError::ActivityNotFound(name.to_string())),
        }
    }
}

/// Register every standard activity
pub fn register_stdlib(registry: &mut ActivityRegistry) -> Result<(), CoreError> {
    for name in factory::ACTIVITY_NAMES {
        registry.register(factory::create_activity(name)?)?;
    }
    Ok(())
}

/// Create a worker with every standard activity registered
pub fn create_worker(config: WorkerConfig) -> Result<Worker, CoreError> {
    let mut registry = ActivityRegistry::new();
    register_stdlib(&mut registry)?;
    Worker::new(config, registry)
}

/// Batch sample workflow.
///
/// Runs `total_size` invocations of `batchActivity`, task `i` receiving `i` as
/// its argument, with at most `concurrency` running at once. Waits for every task
/// and reports every failure.
pub async fn batch_workflow(
    dispatcher: Arc<dyn ActivityDispatcher>,
    input: BatchInput,
) -> Result<(), CoreError> {
    let factories: Vec<_> = (0..input.total_size)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            move |task_id: usize| async move {
                dispatcher
                    .dispatch(BATCH_ACTIVITY, vec![task_id.to_string()])
                    .await
                    .map(|_| ())
            }
        })
        .collect();

    info!(
        concurrency = input.concurrency,
        total_size = input.total_size,
        "Starting batch workflow"
    );
    run_batch(input, factories).await
}
