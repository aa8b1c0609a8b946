//! PipelineRun resource

use crate::meta::{Condition, ObjectMeta, Param};
use pipemon_path::{Reflect, Value};
use pipemon_primitives::Time;
use serde::{Deserialize, Serialize};

/// One execution of a pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineRun {
    /// API group and version
    pub api_version: String,
    /// Always `PipelineRun`
    pub kind: String,
    /// Object metadata
    pub metadata: ObjectMeta,
    /// Desired state
    pub spec: PipelineRunSpec,
    /// Observed state
    pub status: PipelineRunStatus,
}

/// Reference to the pipeline being run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRef {
    /// Pipeline name
    pub name: String,
}

/// PipelineRun spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineRunSpec {
    /// Referenced pipeline, unset for inline pipeline specs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_ref: Option<PipelineRef>,
    /// Service account the task runs use
    pub service_account_name: String,
    /// Parameters
    pub params: Vec<Param>,
    /// Overall timeout, e.g. `1h0m0s`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Pointer from a PipelineRun to one of its child runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildStatusReference {
    /// Child run name
    pub name: String,
    /// Task name inside the pipeline
    pub pipeline_task_name: String,
    /// Child kind, usually `TaskRun`
    pub kind: String,
}

/// PipelineRun status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineRunStatus {
    /// Conditions, `Succeeded` marks completion
    pub conditions: Vec<Condition>,
    /// When the run started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    /// When the run finished, unset while running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<Time>,
    /// Child runs
    pub child_references: Vec<ChildStatusReference>,
}

impl Reflect for PipelineRun {
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

impl Reflect for PipelineRef {
    fn reflect(&self) -> Value {
        Value::record([("name", self.name.reflect())])
    }
}

impl Reflect for PipelineRunSpec {
    fn reflect(&self) -> Value {
        Value::record([
            ("pipelineRef", self.pipeline_ref.reflect()),
            ("serviceAccountName", self.service_account_name.reflect()),
            ("params", self.params.reflect()),
            ("timeout", self.timeout.reflect()),
        ])
    }
}

impl Reflect for ChildStatusReference {
    fn reflect(&self) -> Value {
        Value::record([
            ("name", self.name.reflect()),
            ("pipelineTaskName", self.pipeline_task_name.reflect()),
            ("kind", self.kind.reflect()),
        ])
    }
}

impl Reflect for PipelineRunStatus {
    fn reflect(&self) -> Value {
        Value::record([
            ("conditions", self.conditions.reflect()),
            ("startTime", self.start_time.reflect()),
            ("completionTime", self.completion_time.reflect()),
            ("childReferences", self.child_references.reflect()),
        ])
    }
}
