//! TaskRun resource

use crate::meta::{Condition, ObjectMeta, Param};
use pipemon_path::{Reflect, Value};
use pipemon_primitives::Time;
use serde::{Deserialize, Serialize};

/// One execution of a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRun {
    /// API group and version
    pub api_version: String,
    /// Always `TaskRun`
    pub kind: String,
    /// Object metadata
    pub metadata: ObjectMeta,
    /// Desired state
    pub spec: TaskRunSpec,
    /// Observed state
    pub status: TaskRunStatus,
}

/// Reference to the task being run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRef {
    /// Task name
    pub name: String,
    /// `Task` or `ClusterTask`
    pub kind: String,
}

/// TaskRun spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRunSpec {
    /// Referenced task, unset for inline task specs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<TaskRef>,
    /// Service account the pod runs as
    pub service_account_name: String,
    /// Parameters
    pub params: Vec<Param>,
}

/// TaskRun status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRunStatus {
    /// Conditions, `Succeeded` marks completion
    pub conditions: Vec<Condition>,
    /// Pod executing the steps
    pub pod_name: String,
    /// When the run started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    /// When the run finished, unset while running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<Time>,
    /// Per-step container states
    pub steps: Vec<StepState>,
}

/// State of one step container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepState {
    /// Step name
    pub name: String,
    /// Container name
    pub container: String,
    /// Set once the container exited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated: Option<TerminatedState>,
}

/// Terminated container state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerminatedState {
    /// Container exit code
    pub exit_code: i32,
    /// Termination reason
    pub reason: String,
    /// Container start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Time>,
    /// Container finish time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Time>,
}

impl Reflect for TaskRun {
    fn reflect(&self) -> Value {
        Value::record([
            ("apiVersion", self.api_version.reflect()),
            ("kind", self.kind.reflect()),
            ("metadata", self.metadata.reflect()),
            ("spec", self.spec.reflect()),
            ("status", self.status.reflect()),
        ])
    }
}

impl Reflect for TaskRef {
    fn reflect(&self) -> Value {
        Value::record([("name", self.name.reflect()), ("kind", self.kind.reflect())])
    }
}

impl Reflect for TaskRunSpec {
    fn reflect(&self) -> Value {
        Value::record([
            ("taskRef", self.task_ref.reflect()),
            ("serviceAccountName", self.service_account_name.reflect()),
            ("params", self.params.reflect()),
        ])
    }
}

impl Reflect for TaskRunStatus {
    fn reflect(&self) -> Value {
        Value::record([
            ("conditions", self.conditions.reflect()),
            ("podName", self.pod_name.reflect()),
            ("startTime", self.start_time.reflect()),
            ("completionTime", self.completion_time.reflect()),
            ("steps", self.steps.reflect()),
        ])
    }
}

impl Reflect for StepState {
    fn reflect(&self) -> Value {
        Value::record([
            ("name", self.name.reflect()),
            ("container", self.container.reflect()),
            ("terminated", self.terminated.reflect()),
        ])
    }
}

impl Reflect for TerminatedState {
    fn reflect(&self) -> Value {
        Value::record([
            ("exitCode", self.exit_code.reflect()),
            ("reason", self.reason.reflect()),
            ("startedAt", self.started_at.reflect()),
            ("finishedAt", self.finished_at.reflect()),
        ])
    }
}
