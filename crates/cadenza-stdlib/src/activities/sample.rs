use async_trait::async_trait;
use cadenza_core::{Activity, ActivityBase, CoreError};
use serde_json::Value;
use tracing::info;

/// Name `SampleActivity` registers under
pub const SAMPLE_ACTIVITY: &str = "sampleActivity";

/// Sample activity used by the DSL workflows.
///
/// Logs its input and returns `Result_<name>` regardless of the arguments.
#[derive(Debug, Clone)]
pub struct SampleActivity {
    name: String,
}

impl SampleActivity {
    /// Create the activity under its default name
    pub fn new() -> Self {
        Self::named(SAMPLE_ACTIVITY)
    }

    /// Create the activity under another name, e.g. `sampleActivity2`
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Default for SampleActivity {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityBase for SampleActivity {
    fn activity_type(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Activity for SampleActivity {
    async fn execute(&self, arguments: Vec<String>) -> Result<Value, CoreError> {
        info!(activity = %self.name, input = ?arguments, "Running sample activity");
        Ok(Value::String(format!("Result_{}", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_result() {
        let activity = SampleActivity::new();
        let result = activity
            .execute(vec!["value1".to_string(), "value2".to_string()])
            .await;
        assert_eq!(result, Ok(Value::String("Result_sampleActivity".to_string())));
    }

    #[tokio::test]
    async fn test_named_sample() {
        let activity = SampleActivity::named("sampleActivity3");
        assert_eq!(activity.activity_type(), "sampleActivity3");
        assert_eq!(
            activity.execute(vec![]).await,
            Ok(Value::String("Result_sampleActivity3".to_string()))
        );
    }
}
