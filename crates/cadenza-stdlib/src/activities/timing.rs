use async_trait::async_trait;
use cadenza_core::{Activity, ActivityBase, CoreError};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Name `BatchActivity` registers under
pub const BATCH_ACTIVITY: &str = "batchActivity";

/// Name `SleepActivity` registers under
pub const SLEEP_ACTIVITY: &str = "sleepActivity";

/// Base duration of one batch task
pub const BATCH_BASE_DELAY_MS: u64 = 900;

/// Exclusive upper bound of the per-task jitter
pub const BATCH_JITTER_MS: u64 = 100;

fn parse_number(activity: &str, arguments: &[String]) -> Result<u64, CoreError> {
    let raw = arguments
        .first()
        .ok_or_else(|| CoreError::activity_failed(activity, "missing argument"))?;
    raw.trim().parse().map_err(|_| {
        CoreError::activity_failed(activity, format!("'{}' is not a non-negative integer", raw))
    })
}

/// One task of the batch sample workflow.
///
/// Takes the task id as its only argument and sleeps for 900 ms plus a jitter
/// below 100 ms derived from the id, so runs are repeatable.
#[derive(Debug, Default, Clone)]
pub struct BatchActivity;

impl BatchActivity {
    /// Create a new batch activity
    pub fn new() -> Self {
        Self
    }

    /// How long task `task_id` runs
    pub fn duration_for(task_id: u64) -> Duration {
        Duration::from_millis(BATCH_BASE_DELAY_MS + task_id.wrapping_mul(37) % BATCH_JITTER_MS)
    }
}

impl ActivityBase for BatchActivity {
    fn activity_type(&self) -> &str {
        BATCH_ACTIVITY
    }
}

#[async_trait]
impl Activity for BatchActivity {
    async fn execute(&self, arguments: Vec<String>) -> Result<Value, CoreError> {
        let task_id = parse_number(BATCH_ACTIVITY, &arguments)?;
        let duration = Self::duration_for(task_id);
        debug!(task_id, duration_ms = duration.as_millis() as u64, "Batch task running");
        tokio::time::sleep(duration).await;
        Ok(Value::Null)
    }
}

/// Sleeps for the number of milliseconds given as its only argument
#[derive(Debug, Default, Clone)]
pub struct SleepActivity;

impl SleepActivity {
    /// Create a new sleep activity
    pub fn new() -> Self {
        Self
    }
}

impl ActivityBase for SleepActivity {
    fn activity_type(&self) -> &str {
        SLEEP_ACTIVITY
    }
}

#[async_trait]
impl Activity for SleepActivity {
    async fn execute(&self, arguments: Vec<String>) -> Result<Value, CoreError> {
        let millis = parse_number(SLEEP_ACTIVITY, &arguments)?;
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(json!(format!("slept {} ms", millis)))
    }
}
