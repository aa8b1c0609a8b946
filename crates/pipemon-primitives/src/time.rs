//! Wrapped timestamp type

use crate::error::TimeError;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Point in time as carried by run resources.
///
/// Always stored in UTC. Serializes as an RFC 3339 string with a `Z`
/// suffix and only as many fractional digits as needed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(DateTime<Utc>);

impl Time {
    /// Wrap a plain timestamp
    pub const fn new(inner: DateTime<Utc>) -> Self {
        Time(inner)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Time(Utc::now())
    }

    /// Create from seconds and nanoseconds since the unix epoch
    pub fn from_unix(secs: i64, nanos: u32) -> Result<Self, TimeError> {
        Utc.timestamp_opt(secs, nanos)
            .single()
            .map(Time)
            .ok_or(TimeError::OutOfRange { secs, nanos })
    }

    /// Get the plain timestamp
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unwrap into the plain timestamp
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Fractional seconds elapsed since `earlier`, negative if `earlier` is later
    pub fn seconds_since(&self, earlier: &Time) -> f64 {
        let delta = self.0.signed_duration_since(earlier.0);
        match delta.num_nanoseconds() {
            Some(nanos) => nanos as f64 / 1e9,
            // i64 nanoseconds overflow after ~292 years
            None => delta.num_milliseconds() as f64 / 1e3,
        }
    }

    /// Format as RFC 3339
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(inner: DateTime<Utc>) -> Self {
        Time(inner)
    }
}

impl From<Time> for DateTime<Utc> {
    fn from(time: Time) -> Self {
        time.0
    }
}

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rfc3339(s)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({})", self.to_rfc3339())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Time {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Time {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        parse_rfc3339(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse an RFC 3339 timestamp, normalizing the offset to UTC
pub fn parse_rfc3339(s: &str) -> Result<Time, TimeError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| Time(t.with_timezone(&Utc)))
        .map_err(|e| TimeError::InvalidRfc3339 {
            input: s.to_string(),
            reason: e.to_string(),
        })
}

/// Parse an RFC 3339 timestamp known to be valid.
///
/// Only meant for constants and test fixtures.
///
/// # Panics
///
/// Panics if `s` is not a valid RFC 3339 timestamp.
pub fn must_parse_rfc3339(s: &str) -> Time {
    match parse_rfc3339(s) {
        Ok(time) => time,
        Err(e) => panic!("{e}"),
    }
}
