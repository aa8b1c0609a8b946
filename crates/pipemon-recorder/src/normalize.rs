//! Timestamp normalization
//!
//! Records carry instants as plain or wrapped timestamps, either of which
//! may be optional. All of them collapse into `Option<Time>`.

use crate::error::{RecordError, RecordResult};
use pipemon_path::{TimeRepr, Value};
use pipemon_primitives::Time;

/// Normalize a resolved value into an optional wrapped timestamp.
///
/// An unset optional timestamp is `Ok(None)`; anything that is not a
/// timestamp is an error naming `field`.
pub fn parse_time(field: &str, value: &Value) -> RecordResult<Option<Time>> {
    match value {
        Value::Time(TimeRepr::WrappedRef(t)) => Ok(*t),
        Value::Time(TimeRepr::Wrapped(t)) => Ok(Some(*t)),
        Value::Time(TimeRepr::Plain(t)) => Ok(Some(Time::new(*t))),
        Value::Time(TimeRepr::PlainRef(t)) => Ok(t.map(Time::new)),
        other => Err(RecordError::WrongType {
            field: field.to_string(),
            found: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipemon_primitives::must_parse_rfc3339;

    #[test]
    fn test_all_representations() {
        let t = must_parse_rfc3339("2024-01-01T00:00:00Z");
        let plain = t.into_inner();

        for repr in [
            TimeRepr::Wrapped(t),
            TimeRepr::WrappedRef(Some(t)),
            TimeRepr::Plain(plain),
            TimeRepr::PlainRef(Some(plain)),
        ] {
            assert_eq!(parse_time("from", &Value::Time(repr)).unwrap(), Some(t));
        }
    }

    #[test]
    fn test_unset_is_absent() {
        assert_eq!(parse_time("to", &Value::Time(TimeRepr::WrappedRef(None))).unwrap(), None);
        assert_eq!(parse_time("to", &Value::Time(TimeRepr::PlainRef(None))).unwrap(), None);
    }

    #[test]
    fn test_wrong_type() {
        let err = parse_time("to", &Value::String("2024-01-01T00:00:00Z".into())).unwrap_err();
        assert_eq!(
            err,
            RecordError::WrongType {
                field: "to".into(),
                found: "string"
            }
        );
        assert!(parse_time("from", &Value::Null).is_err());
    }
}
