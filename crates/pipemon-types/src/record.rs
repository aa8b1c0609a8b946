//! Run record envelope

use crate::error::{TypesError, TypesResult};
use crate::pipelinerun::PipelineRun;
use crate::taskrun::TaskRun;
use pipemon_path::{Reflect, Value};

/// A run resource loaded from JSON.
///
/// Known kinds are decoded into their typed form; anything else is kept as
/// raw JSON and still reachable by path templates.
#[derive(Debug, Clone, PartialEq)]
pub enum RunRecord {
    /// `kind: PipelineRun`
    PipelineRun(Box<PipelineRun>),
    /// `kind: TaskRun`
    TaskRun(Box<TaskRun>),
    /// Any other kind
    Other(serde_json::Value),
}

impl RunRecord {
    /// Decode one record from a JSON value
    pub fn from_json_value(value: serde_json::Value) -> TypesResult<Self> {
        if !value.is_object() {
            return Err(TypesError::UnexpectedShape(json_type(&value)));
        }
        let kind = value.get("kind").and_then(|k| k.as_str()).map(str::to_owned);
        match kind.as_deref() {
            Some("PipelineRun") => Ok(RunRecord::PipelineRun(Box::new(serde_json::from_value(value)?))),
            Some("TaskRun") => Ok(RunRecord::TaskRun(Box::new(serde_json::from_value(value)?))),
            _ => Ok(RunRecord::Other(value)),
        }
    }

    /// Decode one record from JSON text
    pub fn from_json(text: &str) -> TypesResult<Self> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    /// Decode a single record or an array of records
    pub fn parse_many(text: &str) -> TypesResult<Vec<Self>> {
        match serde_json::from_str::<serde_json::Value>(text)? {
            serde_json::Value::Array(items) => items.into_iter().map(Self::from_json_value).collect(),
            value => Ok(vec![Self::from_json_value(value)?]),
        }
    }

    /// Resource kind as written in the record
    pub fn kind(&self) -> &str {
        match self {
            RunRecord::PipelineRun(run) => &run.kind,
            RunRecord::TaskRun(run) => &run.kind,
            RunRecord::Other(value) => value.get("kind").and_then(|k| k.as_str()).unwrap_or(""),
        }
    }

    /// Lowercased kind, the name monitors use to select records
    pub fn resource(&self) -> String {
        self.kind().to_ascii_lowercase()
    }

    /// `namespace/name` for logging
    pub fn key(&self) -> String {
        match self {
            RunRecord::PipelineRun(run) => run.metadata.key(),
            RunRecord::TaskRun(run) => run.metadata.key(),
            RunRecord::Other(value) => {
                let field = |name: &str| {
                    value
                        .pointer(&format!("/metadata/{name}"))
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string()
                };
                match (field("namespace"), field("name")) {
                    (ns, name) if ns.is_empty() => name,
                    (ns, name) => format!("{ns}/{name}"),
                }
            }
        }
    }
}

impl Reflect for RunRecord {
    fn reflect(&self) -> Value {
        match self {
            RunRecord::PipelineRun(run) => run.reflect(),
            RunRecord::TaskRun(run) => run.reflect(),
            RunRecord::Other(value) => value.reflect(),
        }
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch() {
        let run = RunRecord::from_json(r#"{"kind":"TaskRun","metadata":{"name":"t","namespace":"ci"}}"#).unwrap();
        assert!(matches!(run, RunRecord::TaskRun(_)));
        assert_eq!(run.resource(), "taskrun");
        assert_eq!(run.key(), "ci/t");

        let other = RunRecord::from_json(r#"{"kind":"CustomRun","metadata":{"name":"c"}}"#).unwrap();
        assert!(matches!(other, RunRecord::Other(_)));
        assert_eq!(other.resource(), "customrun");
        assert_eq!(other.key(), "c");
    }

    #[test]
    fn test_parse_many() {
        let runs = RunRecord::parse_many(r#"[{"kind":"PipelineRun"},{"kind":"TaskRun"}]"#).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].kind(), "PipelineRun");

        let single = RunRecord::parse_many(r#"{"kind":"PipelineRun"}"#).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_rejects_scalars() {
        let err = RunRecord::parse_many("[1]").unwrap_err();
        assert!(matches!(err, TypesError::UnexpectedShape("number")));
    }

    #[test]
    fn test_bad_field_type() {
        let err = RunRecord::from_json(r#"{"kind":"PipelineRun","status":{"startTime":"noon"}}"#).unwrap_err();
        assert!(matches!(err, TypesError::Json(_)));
    }
}
