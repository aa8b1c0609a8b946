//! Dynamic value tree

use chrono::{DateTime, SecondsFormat, Utc};
use pipemon_primitives::Time;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// The ways a record can carry a point in time.
///
/// Plain timestamps are bare `DateTime<Utc>` fields, wrapped ones are
/// [`Time`] fields. The `*Ref` variants are the optional (nullable) forms;
/// `None` means the field exists but has no value yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRepr {
    /// `DateTime<Utc>`
    Plain(DateTime<Utc>),
    /// `Option<DateTime<Utc>>`
    PlainRef(Option<DateTime<Utc>>),
    /// `Time`
    Wrapped(Time),
    /// `Option<Time>`
    WrappedRef(Option<Time>),
}

impl TimeRepr {
    /// The instant carried, if any
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeRepr::Plain(t) => Some(*t),
            TimeRepr::PlainRef(t) => *t,
            TimeRepr::Wrapped(t) => Some(t.into_inner()),
            TimeRepr::WrappedRef(t) => t.map(Time::into_inner),
        }
    }

    /// Whether this is a nullable representation holding nothing
    pub fn is_nil(&self) -> bool {
        matches!(self, TimeRepr::PlainRef(None) | TimeRepr::WrappedRef(None))
    }

    /// Name of the representation, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            TimeRepr::Plain(_) => "timestamp",
            TimeRepr::PlainRef(_) => "optional timestamp",
            TimeRepr::Wrapped(_) => "time",
            TimeRepr::WrappedRef(_) => "optional time",
        }
    }
}

/// Reflected value of a record or one of its fields
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Point in time
    Time(TimeRepr),
    /// Ordered sequence
    List(Vec<Value>),
    /// Named fields or map entries
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Build a map value from named fields
    pub fn record<I, K>(fields: I) -> Value
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Name of the dynamic type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Time(repr) => repr.type_name(),
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Uint(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Look up a map entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Text form used for labels.
    ///
    /// Strings are returned verbatim, scalars through `Display`, absent
    /// values as the empty string, instants as RFC 3339 and lists or maps
    /// as compact JSON.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Uint(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Time(repr) => repr.instant().map(format_instant).unwrap_or_default(),
            Value::List(_) | Value::Map(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Uint(n) => serializer.serialize_u64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Time(repr) => match repr.instant() {
                Some(t) => serializer.serialize_str(&format_instant(t)),
                None => serializer.serialize_unit(),
            },
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(fields) => serializer.collect_map(fields),
        }
    }
}
