//! The dynamic value type system.
//!
//! Feature values arrive loosely typed: a threshold authored as `30` must compare
//! against a feature delivered as `"35"`. [`Value`] carries the native
//! representation, [`classify`] assigns it a [`SemanticType`], and the `convert`
//! functions move between representations once two types are known to match.

use ahash::AHashMap;
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Deserializer};
use std::fmt;

mod convert;
mod operator;
mod semantic;

pub use convert::*;
pub use operator::*;
pub use semantic::*;

/// The long textual date form, also used when displaying dates.
pub const DATE_FORMAT_DETAIL: &str = "%Y-%m-%d %H:%M:%S";
/// The short textual date form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A runtime value flowing through feature bags and comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    String(String),
    Array(Vec<Value>),
    Map(AHashMap<String, Value>),
    /// A value with no usable native kind, e.g. a JSON `null`.
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT_DETAIL)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Map(map) => write!(
                f,
                "{{{}}}",
                map.iter()
                    .sorted_by(|a, b| a.0.cmp(b.0))
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .join(", ")
            ),
            Value::Null => write!(f, "null"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(n as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Float(n as f64),
        }
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<AHashMap<String, Value>> for Value {
    fn from(map: AHashMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// The per-request mapping from feature key to loosely typed value.
pub type FeatureBag = AHashMap<String, Value>;
