//! Run identity used to track runs across observations

use crate::error::{RecordError, RecordResult};
use pipemon_path::Value;

/// Identity of a run: `.metadata.uid` when set, else `namespace/name`
pub fn run_identity(input: &Value) -> RecordResult<String> {
    let meta = |field: &str| {
        input
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    if let Some(uid) = meta("uid") {
        return Ok(uid.to_string());
    }
    match (meta("namespace"), meta("name")) {
        (Some(ns), Some(name)) => Ok(format!("{ns}/{name}")),
        (None, Some(name)) => Ok(name.to_string()),
        (_, None) => Err(RecordError::MissingIdentity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(fields: &[(&str, &str)]) -> Value {
        Value::record([(
            "metadata",
            Value::record(fields.iter().map(|(k, v)| (*k, Value::String(v.to_string())))),
        )])
    }

    #[test]
    fn test_uid_wins() {
        let run = meta(&[("uid", "4f1c"), ("name", "run"), ("namespace", "ci")]);
        assert_eq!(run_identity(&run).unwrap(), "4f1c");
    }

    #[test]
    fn test_namespace_and_name() {
        let run = meta(&[("uid", ""), ("name", "run"), ("namespace", "ci")]);
        assert_eq!(run_identity(&run).unwrap(), "ci/run");
        assert_eq!(run_identity(&meta(&[("name", "run")])).unwrap(), "run");
    }

    #[test]
    fn test_anonymous_run() {
        assert_eq!(run_identity(&meta(&[])), Err(RecordError::MissingIdentity));
        assert_eq!(run_identity(&Value::Null), Err(RecordError::MissingIdentity));
    }
}
