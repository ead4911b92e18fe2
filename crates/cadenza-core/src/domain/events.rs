use crate::CoreError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of one workflow run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a fresh random run id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of one statement node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Not reached yet, or skipped by a failing sequence
    NotStarted,
    /// Evaluating, or waiting on children
    Running,
    /// Finished without error
    Succeeded,
    /// Finished with an error
    Failed,
}

impl NodeState {
    /// True for `Succeeded` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeState::Succeeded | NodeState::Failed)
    }
}

/// Something observable that happened during a workflow run
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// A run began
    WorkflowStarted {
        /// Run identifier
        run_id: RunId,
        /// When it happened
        timestamp: DateTime<Utc>,
    },

    /// A statement node changed state
    NodeTransitioned {
        /// Run identifier
        run_id: RunId,
        /// Node path, e.g. `root.elements[1].branches[0]`
        path: String,
        /// `activity`, `sequence` or `parallel`
        kind: &'static str,
        /// State entered
        state: NodeState,
        /// Failure, when `state` is `Failed`
        error: Option<CoreError>,
        /// When it happened
        timestamp: DateTime<Utc>,
    },

    /// The root statement succeeded
    WorkflowCompleted {
        /// Run identifier
        run_id: RunId,
        /// When it happened
        timestamp: DateTime<Utc>,
    },

    /// The root statement failed
    WorkflowFailed {
        /// Run identifier
        run_id: RunId,
        /// Terminal error
        error: CoreError,
        /// When it happened
        timestamp: DateTime<Utc>,
    },
}

impl ExecutionEvent {
    /// Returns the type of the event as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            ExecutionEvent::WorkflowStarted { .. } => "workflow.started",
            ExecutionEvent::NodeTransitioned { .. } => "node.transitioned",
            ExecutionEvent::WorkflowCompleted { .. } => "workflow.completed",
            ExecutionEvent::WorkflowFailed { .. } => "workflow.failed",
        }
    }

    /// Run this event belongs to
    pub fn run_id(&self) -> &RunId {
        match self {
            ExecutionEvent::WorkflowStarted { run_id, .. }
            | ExecutionEvent::NodeTransitioned { run_id, .. }
            | ExecutionEvent::WorkflowCompleted { run_id, .. }
            | ExecutionEvent::WorkflowFailed { run_id, .. } => run_id,
        }
    }

    /// Returns the timestamp when the event occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ExecutionEvent::WorkflowStarted { timestamp, .. }
            | ExecutionEvent::NodeTransitioned { timestamp, .. }
            | ExecutionEvent::WorkflowCompleted { timestamp, .. }
            | ExecutionEvent::WorkflowFailed { timestamp, .. } => *timestamp,
        }
    }
}

/// Receives execution events as they happen
pub trait ExecutionEventHandler: Send + Sync {
    /// Handle one event
    fn handle(&self, event: &ExecutionEvent);
}

/// Handler that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventHandler;

impl ExecutionEventHandler for NoopEventHandler {
    fn handle(&self, _event: &ExecutionEvent) {}
}

/// Handler that keeps every event in memory
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ExecutionEvent>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events.lock().clone()
    }

    /// Node transitions as `(path, state)` pairs, in arrival order
    pub fn transitions(&self) -> Vec<(String, NodeState)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ExecutionEvent::NodeTransitioned { path, state, .. } => {
                    Some((path.clone(), *state))
                }
                _ => None,
            })
            .collect()
    }

    /// Last state recorded for a node path; `NotStarted` when the node never ran
    pub fn final_state(&self, path: &str) -> NodeState {
        self.transitions()
            .into_iter()
            .rev()
            .find(|(node, _)| node == path)
            .map(|(_, state)| state)
            .unwrap_or(NodeState::NotStarted)
    }

    /// Remove every recorded event
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ExecutionEventHandler for EventLog {
    fn handle(&self, event: &ExecutionEvent) {
        self.events.lock().push(event.clone());
    }
}
