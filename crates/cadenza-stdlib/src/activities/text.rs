use async_trait::async_trait;
use cadenza_core::{Activity, ActivityBase, CoreError};
use serde_json::Value;

/// Name `ConcatActivity` registers under
pub const CONCAT_ACTIVITY: &str = "concat";

/// Joins its arguments with `-`
#[derive(Debug, Default, Clone)]
pub struct ConcatActivity;

impl ConcatActivity {
    /// Create a new concat activity
    pub fn new() -> Self {
        Self
    }
}

impl ActivityBase for ConcatActivity {
    fn activity_type(&self) -> &str {
        CONCAT_ACTIVITY
    }
}

#[async_trait]
impl Activity for ConcatActivity {
    async fn execute(&self, arguments: Vec<String>) -> Result<Value, CoreError> {
        if arguments.is_empty() {
            return Err(CoreError::activity_failed(
                CONCAT_ACTIVITY,
                "at least one argument is required",
            ));
        }
        Ok(Value::String(arguments.join("-")))
    }
}
