use crate::domain::activity::ActivityDispatcher;
use crate::domain::bindings::Bindings;
use crate::domain::events::{
    ExecutionEvent, ExecutionEventHandler, NodeState, NoopEventHandler, RunId,
};
use crate::CoreError;
use cadenza_dsl::{ActivityInvocation, Parallel, Sequence, Statement, Workflow};
use chrono::Utc;
use futures::future::{join_all, BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Path of the root statement in events and logs
pub const ROOT_PATH: &str = "root";

/// Outcome of one workflow run
#[derive(Debug)]
pub struct WorkflowRun {
    /// Run identifier
    pub run_id: RunId,

    /// Bindings as the run left them, including partial writes of a failed run
    pub bindings: Bindings,

    /// Terminal outcome of the root statement
    pub result: Result<(), CoreError>,
}

impl WorkflowRun {
    /// True when the root statement succeeded
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Final bindings on success, the terminal error otherwise
    pub fn into_result(self) -> Result<Bindings, CoreError> {
        self.result.map(|()| self.bindings)
    }
}

/// Recursive evaluator for workflow statement trees
#[derive(Clone)]
pub struct Interpreter {
    dispatcher: Arc<dyn ActivityDispatcher>,
    events: Arc<dyn ExecutionEventHandler>,
}

impl Interpreter {
    /// Create an interpreter dispatching activities through `dispatcher`
    pub fn new(dispatcher: Arc<dyn ActivityDispatcher>) -> Self {
        Self {
            dispatcher,
            events: Arc::new(NoopEventHandler),
        }
    }

    /// Report execution events to `handler`
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutionEventHandler>) -> Self {
        self.events = handler;
        self
    }

    /// Evaluate `statement` against `bindings`.
    ///
    /// * Activity: arguments are resolved first; an unbound name fails with
    ///   `UnboundVariable` and nothing is dispatched. The result is bound only on success.
    /// * Sequence: elements run in order and the first failure stops the sequence.
    /// * Parallel: branches run concurrently on the calling task. Every branch runs to
    ///   completion, then the first failure in declaration order is returned.
    ///   Exception: when any branch was canceled, that cancellation is returned
    ///   instead, even if an earlier-declared branch failed for another reason.
    pub async fn execute(
        &self,
        statement: &Statement,
        bindings: &Bindings,
    ) -> Result<(), CoreError> {
        let run_id = RunId::new();
        self.evaluate(&run_id, statement, bindings, ROOT_PATH.to_string())
            .await
    }

    /// Run a whole workflow on a working copy of its variables
    pub async fn run_workflow(&self, workflow: &Workflow) -> WorkflowRun {
        let run_id = RunId::new();
        let bindings = Bindings::from_variables(&workflow.variables);

        info!(
            run_id = %run_id,
            activities = workflow.root.count_activities(),
            "Starting workflow run"
        );
        self.events.handle(&ExecutionEvent::WorkflowStarted {
            run_id: run_id.clone(),
            timestamp: Utc::now(),
        });

        let result = self
            .evaluate(&run_id, &workflow.root, &bindings, ROOT_PATH.to_string())
            .await;

        match &result {
            Ok(()) => {
                info!(run_id = %run_id, bindings = bindings.len(), "Workflow run completed");
                self.events.handle(&ExecutionEvent::WorkflowCompleted {
                    run_id: run_id.clone(),
                    timestamp: Utc::now(),
                });
            }
            Err(error) => {
                warn!(run_id = %run_id, error = %error, "Workflow run failed");
                self.events.handle(&ExecutionEvent::WorkflowFailed {
                    run_id: run_id.clone(),
                    error: error.clone(),
                    timestamp: Utc::now(),
                });
            }
        }

        WorkflowRun {
            run_id,
            bindings,
            result,
        }
    }

    /// Run a workflow and keep only its terminal outcome
    pub async fn execute_workflow(&self, workflow: &Workflow) -> Result<(), CoreError> {
        self.run_workflow(workflow).await.result
    }

    fn evaluate<'a>(
        &'a self,
        run_id: &'a RunId,
        statement: &'a Statement,
        bindings: &'a Bindings,
        path: String,
    ) -> BoxFuture<'a, Result<(), CoreError>> {
        async move {
            self.transition(run_id, &path, statement.kind(), NodeState::Running, None);

            let outcome = match statement {
                Statement::Activity(activity) => self.invoke(activity, bindings, &path).await,
                Statement::Sequence(sequence) => {
                    self.run_sequence(run_id, sequence, bindings, &path).await
                }
                Statement::Parallel(parallel) => {
                    self.run_parallel(run_id, parallel, bindings, &path).await
                }
            };

            match &outcome {
                Ok(()) => {
                    self.transition(run_id, &path, statement.kind(), NodeState::Succeeded, None)
                }
                Err(error) => self.transition(
                    run_id,
                    &path,
                    statement.kind(),
                    NodeState::Failed,
                    Some(error.clone()),
                ),
            }

            outcome
        }
        .boxed()
    }

    async fn invoke(
        &self,
        activity: &ActivityInvocation,
        bindings: &Bindings,
        path: &str,
    ) -> Result<(), CoreError> {
        let arguments = bindings.resolve(&activity.arguments).map_err(|error| {
            warn!(
                path = %path,
                activity = %activity.name,
                error = %error,
                "Activity not dispatched"
            );
            error
        })?;

        let value = self
            .dispatcher
            .dispatch(&activity.name, arguments)
            .await
            .map_err(|error| {
                warn!(path = %path, activity = %activity.name, error = %error, "Activity failed");
                error
            })?;

        debug!(
            path = %path,
            activity = %activity.name,
            result = %activity.result,
            "Binding activity result"
        );
        bindings.insert(activity.result.clone(), value);
        Ok(())
    }

    async fn run_sequence(
        &self,
        run_id: &RunId,
        sequence: &Sequence,
        bindings: &Bindings,
        path: &str,
    ) -> Result<(), CoreError> {
        for (index, element) in sequence.elements.iter().enumerate() {
            self.evaluate(run_id, element, bindings, format!("{}.elements[{}]", path, index))
                .await?;
        }
        Ok(())
    }

    async fn run_parallel(
        &self,
        run_id: &RunId,
        parallel: &Parallel,
        bindings: &Bindings,
        path: &str,
    ) -> Result<(), CoreError> {
        let branches = parallel
            .branches
            .iter()
            .enumerate()
            .map(|(index, branch)| {
                self.evaluate(run_id, branch, bindings, format!("{}.branches[{}]", path, index))
            });

        let mut failures: Vec<CoreError> = join_all(branches)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        debug!(
            path = %path,
            failed = failures.len(),
            branches = parallel.branches.len(),
            "Parallel branches finished with failures"
        );

        // A cancellation outranks declaration order.
        let chosen = failures.iter().position(CoreError::is_canceled).unwrap_or(0);
        Err(failures.swap_remove(chosen))
    }

    fn transition(
        &self,
        run_id: &RunId,
        path: &str,
        kind: &'static str,
        state: NodeState,
        error: Option<CoreError>,
    ) {
        debug!(run_id = %run_id, path = %path, kind, state = ?state, "Node transition");
        self.events.handle(&ExecutionEvent::NodeTransitioned {
            run_id: run_id.clone(),
            path: path.to_string(),
            kind,
            state,
            error,
            timestamp: Utc::now(),
        });
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter").finish_non_exhaustive()
    }
}
