//! Object metadata shared by all run kinds

use pipemon_path::{Reflect, Value};
use pipemon_primitives::Time;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standard object metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    /// Object name
    pub name: String,
    /// Namespace
    pub namespace: String,
    /// Unique id assigned by the API server
    pub uid: String,
    /// Labels
    pub labels: BTreeMap<String, String>,
    /// Annotations
    pub annotations: BTreeMap<String, String>,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Time>,
}

impl ObjectMeta {
    /// `namespace/name`, or just `name` for cluster-scoped objects
    pub fn key(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }
}

impl Reflect for ObjectMeta {
    fn reflect(&self) -> Value {
        Value::record([
            ("name", self.name.reflect()),
            ("namespace", self.namespace.reflect()),
            ("uid", self.uid.reflect()),
            ("labels", self.labels.reflect()),
            ("annotations", self.annotations.reflect()),
            ("creationTimestamp", self.creation_timestamp.reflect()),
        ])
    }
}

/// Status condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    /// Condition type, e.g. `Succeeded`
    #[serde(rename = "type")]
    pub type_: String,
    /// `True`, `False` or `Unknown`
    pub status: String,
    /// Machine-readable reason
    pub reason: String,
    /// Human-readable message
    pub message: String,
    /// Last time the status changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
}

impl Reflect for Condition {
    fn reflect(&self) -> Value {
        Value::record([
            ("type", self.type_.reflect()),
            ("status", self.status.reflect()),
            ("reason", self.reason.reflect()),
            ("message", self.message.reflect()),
            ("lastTransitionTime", self.last_transition_time.reflect()),
        ])
    }
}

/// Run parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// String, array or object value
    pub value: serde_json::Value,
}

impl Reflect for Param {
    fn reflect(&self) -> Value {
        Value::record([("name", self.name.reflect()), ("value", self.value.reflect())])
    }
}
