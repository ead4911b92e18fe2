use crate::CoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Boundary the interpreter dispatches activities through.
///
/// Implementations run the named activity with already-resolved argument values
/// and return its stringified result. They never retry.
#[async_trait]
pub trait ActivityDispatcher: Send + Sync {
    /// Run the activity registered under `name`
    async fn dispatch(&self, name: &str, arguments: Vec<String>) -> Result<String, CoreError>;
}

/// Non-async base trait for activities
/// This trait is object-safe and used as a marker trait
pub trait ActivityBase: Send + Sync {
    /// Name the activity is registered under by default
    fn activity_type(&self) -> &str;
}

/// A unit of external work invoked by name
#[async_trait]
pub trait Activity: ActivityBase {
    /// Run the activity with resolved argument values
    async fn execute(&self, arguments: Vec<String>) -> Result<Value, CoreError>;
}

/// Adapts an async closure into an [`Activity`]
pub struct FnActivity<F> {
    name: String,
    func: F,
}

impl<F, Fut> FnActivity<F>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, CoreError>> + Send,
{
    /// Wrap `func` as an activity called `name`
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnActivity<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnActivity").field("name", &self.name).finish()
    }
}

impl<F, Fut> ActivityBase for FnActivity<F>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, CoreError>> + Send,
{
    fn activity_type(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<F, Fut> Activity for FnActivity<F>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, CoreError>> + Send,
{
    async fn execute(&self, arguments: Vec<String>) -> Result<Value, CoreError> {
        (self.func)(arguments).await
    }
}

/// Per-dispatch options applied by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityOptions {
    /// Upper bound on a single activity execution, in milliseconds
    pub start_to_close_timeout_ms: Option<u64>,
}

impl ActivityOptions {
    /// Start-to-close timeout as a duration
    pub fn start_to_close_timeout(&self) -> Option<Duration> {
        self.start_to_close_timeout_ms.map(Duration::from_millis)
    }
}

/// Render an activity result as a binding value
pub fn stringify_result(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Name to activity table, used as the worker's dispatcher
#[derive(Default)]
pub struct ActivityRegistry {
    activities: HashMap<String, Arc<dyn Activity>>,
    options: ActivityOptions,
}

impl ActivityRegistry {
    /// Create an empty registry with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry applying `options` to every dispatch
    pub fn with_options(options: ActivityOptions) -> Self {
        Self {
            activities: HashMap::new(),
            options,
        }
    }

    /// Options applied to every dispatch
    pub fn options(&self) -> &ActivityOptions {
        &self.options
    }

    /// Replace the dispatch options
    pub fn set_options(&mut self, options: ActivityOptions) {
        self.options = options;
    }

    /// Register an activity under its own `activity_type`
    pub fn register(&mut self, activity: Arc<dyn Activity>) -> Result<(), CoreError> {
        let name = activity.activity_type().to_string();
        self.register_as(name, activity)
    }

    /// Register an activity under an explicit name
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        activity: Arc<dyn Activity>,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if self.activities.contains_key(&name) {
            return Err(CoreError::DuplicateActivity(name));
        }
        debug!(activity = %name, "Registered activity");
        self.activities.insert(name, activity);
        Ok(())
    }

    /// Whether an activity is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.activities.contains_key(name)
    }

    /// Fail with `ActivityNotFound` for the first name that is not registered
    pub fn ensure_registered<'a, I>(&self, names: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match names.into_iter().find(|name| !self.contains(name)) {
            Some(missing) => Err(CoreError::ActivityNotFound(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.activities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl fmt::Debug for ActivityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityRegistry")
            .field("activities", &self.names())
            .field("options", &self.options)
            .finish()
    }
}

#[async_trait]
impl ActivityDispatcher for ActivityRegistry {
    async fn dispatch(&self, name: &str, arguments: Vec<String>) -> Result<String, CoreError> {
        let activity = self
            .activities
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::ActivityNotFound(name.to_string()))?;

        debug!(activity = %name, args = ?arguments, "Dispatching activity");
        let execution = activity.execute(arguments);
        let value = match self.options.start_to_close_timeout() {
            Some(limit) => tokio::time::timeout(limit, execution).await.map_err(|_| {
                CoreError::ActivityTimeout {
                    activity: name.to_string(),
                    timeout_ms: limit.as_millis() as u64,
                }
            })??,
            None => execution.await?,
        };

        Ok(stringify_result(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo() -> Arc<dyn Activity> {
        Arc::new(FnActivity::new("echo", |args: Vec<String>| async move {
            Ok(Value::String(args.join(",")))
        }))
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let mut registry = ActivityRegistry::new();
        registry.register(echo()).unwrap();

        let result = registry
            .dispatch("echo", vec!["a".to_string(), "b".to_string()])
            .await;
        assert_eq!(result, Ok("a,b".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_activity() {
        let registry = ActivityRegistry::new();
        let result = registry.dispatch("nonExistentActivity", vec![]).await;
        assert_eq!(
            result,
            Err(CoreError::ActivityNotFound("nonExistentActivity".to_string()))
        );
    }

    #[tokio::test]
    async fn test_activity_error_passes_through() {
        let mut registry = ActivityRegistry::new();
        registry
            .register(Arc::new(FnActivity::new("fail", |_args: Vec<String>| async {
                Err(CoreError::activity_failed("fail", "boom"))
            })))
            .unwrap();

        let result = registry.dispatch("fail", vec![]).await;
        assert_eq!(result, Err(CoreError::activity_failed("fail", "boom")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_to_close_timeout() {
        let mut registry = ActivityRegistry::with_options(ActivityOptions {
            start_to_close_timeout_ms: Some(50),
        });
        registry
            .register(Arc::new(FnActivity::new("slow", |_args: Vec<String>| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(json!("late"))
            })))
            .unwrap();

        let result = registry.dispatch("slow", vec![]).await;
        assert_eq!(
            result,
            Err(CoreError::ActivityTimeout {
                activity: "slow".to_string(),
                timeout_ms: 50
            })
        );
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ActivityRegistry::new();
        registry.register(echo()).unwrap();

        assert_eq!(
            registry.register(echo()),
            Err(CoreError::DuplicateActivity("echo".to_string()))
        );
        registry.register_as("echo2", echo()).unwrap();
        assert_eq!(registry.names(), vec!["echo", "echo2"]);
    }

    #[test]
    fn test_ensure_registered() {
        let mut registry = ActivityRegistry::new();
        registry.register(echo()).unwrap();

        assert!(registry.ensure_registered(["echo"]).is_ok());
        assert_eq!(
            registry.ensure_registered(["echo", "missing", "other"]),
            Err(CoreError::ActivityNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_stringify_result() {
        assert_eq!(stringify_result(json!("plain")), "plain");
        assert_eq!(stringify_result(json!(42)), "42");
        assert_eq!(stringify_result(json!({"k": [1, 2]})), r#"{"k":[1,2]}"#);
    }
}
