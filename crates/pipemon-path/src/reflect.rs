//! Structural introspection

use crate::value::{TimeRepr, Value};
use chrono::{DateTime, Utc};
use pipemon_primitives::Time;
use std::collections::{BTreeMap, HashMap};

/// Types that can be inspected by path templates.
///
/// Record types implement this by hand, listing their fields under the
/// same names they use on the wire.
pub trait Reflect {
    /// Reflect into a dynamic value
    fn reflect(&self) -> Value;

    /// Reflect an optional field.
    ///
    /// Defaults to `Null` for `None`. Timestamp types override this so an
    /// unset optional timestamp stays recognizable as a timestamp.
    fn reflect_optional(value: Option<&Self>) -> Value
    where
        Self: Sized,
    {
        value.map_or(Value::Null, Reflect::reflect)
    }
}

impl Reflect for Value {
    fn reflect(&self) -> Value {
        self.clone()
    }
}

impl Reflect for bool {
    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! reflect_int {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Value {
                    Value::$variant(*self as $target)
                }
            }
        )*
    };
}

reflect_int!(Int as i64: i8, i16, i32, i64, isize);
reflect_int!(Uint as u64: u8, u16, u32, u64, usize);
reflect_int!(Float as f64: f32, f64);

impl Reflect for str {
    fn reflect(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Reflect for String {
    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Reflect for Time {
    fn reflect(&self) -> Value {
        Value::Time(TimeRepr::Wrapped(*self))
    }

    fn reflect_optional(value: Option<&Self>) -> Value {
        Value::Time(TimeRepr::WrappedRef(value.copied()))
    }
}

impl Reflect for DateTime<Utc> {
    fn reflect(&self) -> Value {
        Value::Time(TimeRepr::Plain(*self))
    }

    fn reflect_optional(value: Option<&Self>) -> Value {
        Value::Time(TimeRepr::PlainRef(value.copied()))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Value {
        T::reflect_optional(self.as_ref())
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Value {
        Value::List(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Value {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for BTreeMap<String, T> {
    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.reflect())).collect())
    }
}

impl<T: Reflect, S> Reflect for HashMap<String, T, S> {
    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.reflect())).collect())
    }
}

impl Reflect for serde_json::Value {
    fn reflect(&self) -> Value {
        use serde_json::Value as Json;
        match self {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Reflect::reflect).collect()),
            Json::Object(fields) => {
                Value::Map(fields.iter().map(|(k, v)| (k.clone(), v.reflect())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipemon_primitives::must_parse_rfc3339;
    use serde_json::json;

    #[test]
    fn test_optional_time_keeps_type() {
        let unset: Option<Time> = None;
        assert_eq!(unset.reflect(), Value::Time(TimeRepr::WrappedRef(None)));

        let t = must_parse_rfc3339("2024-01-01T00:00:00Z");
        assert_eq!(Some(t).reflect(), Value::Time(TimeRepr::WrappedRef(Some(t))));
        assert_eq!(t.reflect(), Value::Time(TimeRepr::Wrapped(t)));
    }

    #[test]
    fn test_optional_plain_time() {
        let unset: Option<DateTime<Utc>> = None;
        assert_eq!(unset.reflect(), Value::Time(TimeRepr::PlainRef(None)));
    }

    #[test]
    fn test_optional_other_is_null() {
        let unset: Option<String> = None;
        assert_eq!(unset.reflect(), Value::Null);
        assert_eq!(Some("x".to_string()).reflect(), Value::String("x".into()));
    }

    #[test]
    fn test_json_reflect() {
        let v = json!({"status": {"podName": "p-1", "retries": 2, "ratio": 0.5, "tags": ["a"]}});
        let r = v.reflect();
        let status = r.get("status").unwrap();
        assert_eq!(status.get("podName"), Some(&Value::String("p-1".into())));
        assert_eq!(status.get("retries"), Some(&Value::Int(2)));
        assert_eq!(status.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(status.get("tags"), Some(&Value::List(vec![Value::String("a".into())])));
    }

    #[test]
    fn test_json_timestamps_stay_strings() {
        let v = json!({"startTime": "2024-01-01T00:00:00Z"});
        assert_eq!(
            v.reflect().get("startTime"),
            Some(&Value::String("2024-01-01T00:00:00Z".into()))
        );
    }
}
