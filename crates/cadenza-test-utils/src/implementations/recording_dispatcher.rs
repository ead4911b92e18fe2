use super::ConcurrencyProbe;
use async_trait::async_trait;
use cadenza_core::{ActivityDispatcher, CoreError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// One recorded call to [`RecordingDispatcher::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchCall {
    /// Activity name
    pub name: String,
    /// Resolved argument values
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone)]
enum Response {
    Value(String),
    Echo,
    Fail(CoreError),
}

#[derive(Debug, Clone)]
struct Script {
    response: Response,
    delay: Option<Duration>,
}

/// Deterministic dispatcher answering from a script.
///
/// Every call is recorded, including calls to unscripted names, which fail with
/// `ActivityNotFound`. Optional per-activity delays use `tokio::time::sleep`, so
/// tests can run them under paused virtual time.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<DispatchCall>>,
    probe: ConcurrencyProbe,
}

impl RecordingDispatcher {
    /// Create a dispatcher that knows no activities
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `name` with `Result_<name>` for every listed name
    pub fn with_sample_results(names: &[&str]) -> Self {
        names.iter().fold(Self::new(), |dispatcher, name| {
            dispatcher.with_result(name, &format!("Result_{}", name))
        })
    }

    /// Answer `name` with a fixed value
    pub fn with_result(self, name: &str, value: &str) -> Self {
        self.script(name, Response::Value(value.to_string()))
    }

    /// Answer `name` with `name(arg1,arg2,...)`
    pub fn with_echo(self, name: &str) -> Self {
        self.script(name, Response::Echo)
    }

    /// Fail every call to `name` with `error`
    pub fn with_failure(self, name: &str, error: CoreError) -> Self {
        self.script(name, Response::Fail(error))
    }

    /// Sleep before answering `name`; the activity must already be scripted
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        if let Some(script) = self.scripts.get_mut(name) {
            script.delay = Some(delay);
        }
        self
    }

    fn script(mut self, name: &str, response: Response) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                response,
                delay: None,
            },
        );
        self
    }

    /// Every call so far, in call order
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().clone()
    }

    /// Names of every call so far, in call order
    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().iter().map(|call| call.name.clone()).collect()
    }

    /// Number of calls made to `name`
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|call| call.name == name).count()
    }

    /// Probe measuring how many dispatches were in flight at once
    pub fn probe(&self) -> &ConcurrencyProbe {
        &self.probe
    }
}

#[async_trait]
impl ActivityDispatcher for RecordingDispatcher {
    async fn dispatch(&self, name: &str, arguments: Vec<String>) -> Result<String, CoreError> {
        self.calls.lock().push(DispatchCall {
            name: name.to_string(),
            arguments: arguments.clone(),
        });

        let script = self
            .scripts
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::ActivityNotFound(name.to_string()))?;

        let _running = self.probe.enter();
        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }

        match script.response {
            Response::Value(value) => Ok(value),
            Response::Echo => Ok(format!("{}({})", name, arguments.join(","))),
            Response::Fail(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_responses_are_recorded() {
        let dispatcher = RecordingDispatcher::with_sample_results(&["sampleActivity"])
            .with_echo("echo")
            .with_failure("broken", CoreError::activity_failed("broken", "boom"));

        assert_eq!(
            dispatcher.dispatch("sampleActivity", vec![]).await,
            Ok("Result_sampleActivity".to_string())
        );
        assert_eq!(
            dispatcher.dispatch("echo", vec!["a".to_string(), "b".to_string()]).await,
            Ok("echo(a,b)".to_string())
        );
        assert!(dispatcher.dispatch("broken", vec![]).await.is_err());
        assert_eq!(
            dispatcher.dispatch("unknown", vec![]).await,
            Err(CoreError::ActivityNotFound("unknown".to_string()))
        );

        assert_eq!(
            dispatcher.call_names(),
            vec!["sampleActivity", "echo", "broken", "unknown"]
        );
        assert_eq!(dispatcher.call_count("echo"), 1);
        assert_eq!(dispatcher.probe().entered(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_uses_virtual_time() {
        let dispatcher = RecordingDispatcher::new()
            .with_result("slow", "done")
            .with_delay("slow", Duration::from_secs(30));

        let started = tokio::time::Instant::now();
        assert_eq!(dispatcher.dispatch("slow", vec![]).await, Ok("done".to_string()));
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert_eq!(dispatcher.probe().current(), 0);
    }
}
