use crate::application::batch::{run_batch, BatchInput};
use crate::application::interpreter::{Interpreter, WorkflowRun};
use crate::config::WorkerConfig;
use crate::domain::activity::ActivityRegistry;
use crate::domain::events::{ExecutionEventHandler, NoopEventHandler};
use crate::CoreError;
use cadenza_dsl::Workflow;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Hosts registered activities and workflows and runs them on request
pub struct Worker {
    config: WorkerConfig,
    registry: Arc<ActivityRegistry>,
    workflows: DashMap<String, Arc<Workflow>>,
    events: Arc<dyn ExecutionEventHandler>,
}

impl Worker {
    /// Create a worker; the config's activity options are applied to the registry
    pub fn new(config: WorkerConfig, mut registry: ActivityRegistry) -> Result<Self, CoreError> {
        config.validate()?;
        registry.set_options(config.activity.clone());
        info!(
            task_list = %config.task_list,
            activities = registry.len(),
            "Worker started"
        );
        Ok(Self {
            config,
            registry: Arc::new(registry),
            workflows: DashMap::new(),
            events: Arc::new(NoopEventHandler),
        })
    }

    /// Report execution events of every run to `handler`
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutionEventHandler>) -> Self {
        self.events = handler;
        self
    }

    /// Worker configuration
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Activity registry shared with every interpreter
    pub fn registry(&self) -> Arc<ActivityRegistry> {
        self.registry.clone()
    }

    /// Register a workflow under `name`.
    ///
    /// Every activity the workflow references must already be registered, so a
    /// misspelled activity fails here with `ActivityNotFound` instead of mid-run.
    pub fn register_workflow(
        &self,
        name: impl Into<String>,
        workflow: Workflow,
    ) -> Result<(), CoreError> {
        let name = name.into();
        self.registry
            .ensure_registered(workflow.root.activity_names())?;

        match self.workflows.entry(name) {
            Entry::Occupied(entry) => Err(CoreError::DuplicateWorkflow(entry.key().clone())),
            Entry::Vacant(entry) => {
                info!(
                    task_list = %self.config.task_list,
                    workflow = %entry.key(),
                    "Registered workflow"
                );
                entry.insert(Arc::new(workflow));
                Ok(())
            }
        }
    }

    /// Load a YAML or JSON workflow document and register it under `name`
    pub fn register_workflow_file(
        &self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), CoreError> {
        let workflow = cadenza_dsl::load_workflow_file(path)?;
        self.register_workflow(name, workflow)
    }

    /// Names of the registered workflows, sorted
    pub fn workflow_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.workflows.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Interpreter dispatching through this worker's registry
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.registry.clone()).with_event_handler(self.events.clone())
    }

    /// Run a registered workflow
    pub async fn run_workflow(&self, name: &str) -> Result<WorkflowRun, CoreError> {
        let workflow = self
            .workflows
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CoreError::WorkflowNotFound(name.to_string()))?;

        info!(task_list = %self.config.task_list, workflow = %name, "Running workflow");
        Ok(self.interpreter().run_workflow(&workflow).await)
    }

    /// Run a registered workflow and keep only its terminal outcome
    pub async fn execute_workflow(&self, name: &str) -> Result<(), CoreError> {
        self.run_workflow(name).await?.result
    }

    /// Batch shape used by [`Worker::run_batch`]
    pub fn batch_input(&self) -> BatchInput {
        self.config.batch
    }

    /// Run a batch with the configured concurrency cap
    pub async fn run_batch<F, Fut>(&self, factories: Vec<F>) -> Result<(), CoreError>
    where
        F: FnOnce(usize) -> Fut,
        Fut: Future<Output = Result<(), CoreError>>,
    {
        run_batch(self.config.batch, factories).await
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("workflows", &self.workflow_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::FnActivity;
    use cadenza_dsl::Statement;
    use serde_json::json;

    fn registry() -> ActivityRegistry {
        let mut registry = ActivityRegistry::new();
        registry
            .register(Arc::new(FnActivity::new("sampleActivity", |_args: Vec<String>| async {
                Ok(json!("Result_sampleActivity"))
            })))
            .unwrap();
        registry
    }

    fn workflow(activity: &str) -> Workflow {
        Workflow::from_root(Statement::activity(activity, &["var1"], "out"))
            .with_variable("var1", "value1")
    }

    #[tokio::test]
    async fn test_register_and_run() {
        let worker = Worker::new(WorkerConfig::default(), registry()).unwrap();
        worker.register_workflow("sample", workflow("sampleActivity")).unwrap();

        let run = worker.run_workflow("sample").await.unwrap();
        assert_eq!(run.bindings.get("out").as_deref(), Some("Result_sampleActivity"));
        assert_eq!(worker.workflow_names(), vec!["sample"]);
    }

    #[test]
    fn test_unknown_activity_fails_at_registration() {
        let worker = Worker::new(WorkerConfig::default(), registry()).unwrap();
        let err = worker
            .register_workflow("broken", workflow("nonExistentActivity"))
            .unwrap_err();

        assert_eq!(err, CoreError::ActivityNotFound("nonExistentActivity".to_string()));
        assert!(worker.workflow_names().is_empty());
    }

    #[test]
    fn test_duplicate_workflow_name() {
        let worker = Worker::new(WorkerConfig::default(), registry()).unwrap();
        worker.register_workflow("sample", workflow("sampleActivity")).unwrap();

        assert_eq!(
            worker.register_workflow("sample", workflow("sampleActivity")),
            Err(CoreError::DuplicateWorkflow("sample".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_workflow() {
        let worker = Worker::new(WorkerConfig::default(), registry()).unwrap();
        assert_eq!(
            worker.execute_workflow("missing").await,
            Err(CoreError::WorkflowNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WorkerConfig {
            task_list: String::new(),
            ..WorkerConfig::default()
        };
        assert!(matches!(
            Worker::new(config, registry()),
            Err(CoreError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_activity_options_come_from_config() {
        let mut config = WorkerConfig::default();
        config.activity.start_to_close_timeout_ms = Some(1500);

        let worker = Worker::new(config, registry()).unwrap();
        assert_eq!(
            worker.registry().options().start_to_close_timeout_ms,
            Some(1500)
        );
    }
}
