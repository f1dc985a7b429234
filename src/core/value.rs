//! Attribute values
//!
//! `Value` is the payload half of an [`Attr`](super::Attr). Most variants are
//! plain scalars. `Group` nests further attributes under a namespace and
//! `Lazy` defers computing the value until a handler actually needs it.
//! `List` and `Map` are produced by the append policy when several
//! occurrences of a key are accumulated.

use super::attr::Attr;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on lazy values resolving to further lazy values
const MAX_LAZY_DEPTH: usize = 100;

/// A value that is computed only when a record is actually handled
///
/// # Example
///
/// ```
/// use log_dedup::{LogValuer, Value};
///
/// #[derive(Debug)]
/// struct Password;
///
/// impl LogValuer for Password {
///     fn log_value(&self) -> Value {
///         Value::from("[redacted]")
///     }
/// }
/// ```
pub trait LogValuer: Send + Sync + fmt::Debug {
    fn log_value(&self) -> Value;
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Arbitrary JSON payload passed through as-is
    Any(serde_json::Value),
    /// Accumulated occurrences of one key
    List(Vec<Value>),
    /// Group converted into plain key/value pairs, order preserved
    Map(Vec<(String, Value)>),
    Group(Vec<Attr>),
    Lazy(Arc<dyn LogValuer>),
}

impl Value {
    /// Force lazy values until a concrete one is reached
    ///
    /// A valuer that keeps returning lazy values is cut off after a fixed
    /// number of rounds and replaced by an error string.
    #[must_use]
    pub fn resolve(self) -> Value {
        let mut value = self;
        for _ in 0..MAX_LAZY_DEPTH {
            match value {
                Value::Lazy(valuer) => value = valuer.log_value(),
                other => return other,
            }
        }
        match value {
            Value::Lazy(valuer) => Value::String(format!(
                "LogValuer {:?} exceeded {} resolution rounds",
                valuer, MAX_LAZY_DEPTH
            )),
            other => other,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            Value::Group(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Convert into a JSON value
    ///
    /// Durations become integer nanoseconds and times RFC 3339 strings.
    /// Groups become objects: empty sentinels and empty groups are skipped
    /// and groups with an empty key are inlined into their parent.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::String(s) => Json::String(s.clone()),
            Value::Int(i) => Json::from(*i),
            Value::Uint(u) => Json::from(*u),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Bool(b) => Json::Bool(*b),
            Value::Duration(d) => Json::from(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
            Value::Time(t) => Json::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Any(v) => v.clone(),
            Value::List(values) => Json::Array(values.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Group(attrs) => {
                let mut object = serde_json::Map::new();
                write_group(&mut object, attrs);
                Json::Object(object)
            }
            Value::Lazy(_) => self.clone().resolve().to_json(),
        }
    }
}

/// Write group members into a JSON object
pub(crate) fn write_group(object: &mut serde_json::Map<String, serde_json::Value>, attrs: &[Attr]) {
    for attr in attrs {
        if attr.is_empty() {
            continue;
        }
        let value = attr.value.clone().resolve();
        match &value {
            Value::Group(members) if attr.key.is_empty() => write_group(object, members),
            Value::Group(members) if members.is_empty() => {}
            _ => {
                object.insert(attr.key.clone(), value.to_json());
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Any(a), Value::Any(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Lazy(_) => write!(f, "{}", self.clone().resolve()),
            _ => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u64::from(u))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Any(v)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}
