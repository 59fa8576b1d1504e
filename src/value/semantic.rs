use super::Value;
use crate::error::ValueError;
use regex::Regex;
use serde::Serialize;
use std::fmt;

lazy_static::lazy_static! {
    static ref INT_PATTERN: Regex = Regex::new(r"^\d+$").unwrap();
    static ref FLOAT_PATTERN: Regex = Regex::new(r"^\d+\.\d+$").unwrap();
    pub(super) static ref SHORT_DATE_PATTERN: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    pub(super) static ref LONG_DATE_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
}

/// Lower bound (inclusive) of floats that may be read as an `i64`.
const I64_FLOAT_MIN: f64 = -9_223_372_036_854_775_808.0;
/// Upper bound (exclusive) of floats that may be read as an `i64`.
const I64_FLOAT_MAX: f64 = 9_223_372_036_854_775_808.0;

/// The semantic classification of a runtime value, independent of how it was represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SemanticType {
    Int,
    Float,
    Bool,
    Date,
    String,
    Array,
    Map,
    Unknown,
}

impl SemanticType {
    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Int | SemanticType::Float)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Int => "INT",
            SemanticType::Float => "FLOAT",
            SemanticType::Bool => "BOOL",
            SemanticType::Date => "DATE",
            SemanticType::String => "STRING",
            SemanticType::Array => "ARRAY",
            SemanticType::Map => "MAP",
            SemanticType::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Returns true if the float holds an exact integer that an `i64` can represent.
pub fn is_integral_float(n: f64) -> bool {
    n.is_finite() && n.trunc() == n && (I64_FLOAT_MIN..I64_FLOAT_MAX).contains(&n)
}

/// Classifies a value. Text is reclassified by pattern, in the order
/// INT, FLOAT, BOOL, DATE, falling back to STRING.
pub fn classify(value: &Value) -> Result<SemanticType, ValueError> {
    let kind = match value {
        Value::Int(_) => SemanticType::Int,
        Value::Float(n) if is_integral_float(*n) => SemanticType::Int,
        Value::Float(_) => SemanticType::Float,
        Value::Bool(_) => SemanticType::Bool,
        Value::Date(_) => SemanticType::Date,
        Value::Array(_) => SemanticType::Array,
        Value::Map(_) => SemanticType::Map,
        Value::String(s) => classify_text(s),
        Value::Null => return Err(ValueError::FeatureTypeUnknown(value.to_string())),
    };
    Ok(kind)
}

fn classify_text(s: &str) -> SemanticType {
    if INT_PATTERN.is_match(s) {
        SemanticType::Int
    } else if FLOAT_PATTERN.is_match(s) {
        SemanticType::Float
    } else if s == "true" || s == "false" {
        SemanticType::Bool
    } else if SHORT_DATE_PATTERN.is_match(s) || LONG_DATE_PATTERN.is_match(s) {
        SemanticType::Date
    } else {
        SemanticType::String
    }
}

/// Two semantic types are comparable when equal, or when both are numeric.
pub fn types_match(a: SemanticType, b: SemanticType) -> bool {
    a == b || (a.is_numeric() && b.is_numeric())
}
