use super::semantic::{LONG_DATE_PATTERN, SHORT_DATE_PATTERN, is_integral_float};
use super::{DATE_FORMAT, DATE_FORMAT_DETAIL, Value};
use crate::error::ValueError;
use chrono::{NaiveDate, NaiveDateTime};

fn convert_error(value: &Value, target: &'static str) -> ValueError {
    ValueError::TypeConvert {
        value: value.to_string(),
        target,
    }
}

/// Parses a date, trying `YYYY-MM-DD` first and `YYYY-MM-DD HH:MM:SS` second.
pub fn parse_date(s: &str) -> Result<NaiveDateTime, ValueError> {
    let err = || ValueError::TypeConvert {
        value: s.to_string(),
        target: "DATE",
    };
    if SHORT_DATE_PATTERN.is_match(s) {
        return NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| err());
    }
    if LONG_DATE_PATTERN.is_match(s) {
        return NaiveDateTime::parse_from_str(s, DATE_FORMAT_DETAIL).map_err(|_| err());
    }
    Err(err())
}

/// Renders a scalar as text. Collections, dates and nulls have no textual conversion.
pub fn to_string(value: &Value) -> Result<String, ValueError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(convert_error(value, "STRING")),
    }
}

/// Converts to `i64`, truncating floats toward zero.
///
/// Floats outside the `i64` range (or non-finite) fail rather than saturate.
pub fn to_i64(value: &Value) -> Result<i64, ValueError> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(n) => {
            let truncated = n.trunc();
            if is_integral_float(truncated) {
                Ok(truncated as i64)
            } else {
                Err(convert_error(value, "INT"))
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s.parse::<i64>().map_err(|_| convert_error(value, "INT")),
        _ => Err(convert_error(value, "INT")),
    }
}

/// Converts to a platform `i32`, failing when the value does not fit.
pub fn to_int(value: &Value) -> Result<i32, ValueError> {
    let wide = to_i64(value)?;
    i32::try_from(wide).map_err(|_| convert_error(value, "INT"))
}

pub fn to_f64(value: &Value) -> Result<f64, ValueError> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.parse::<f64>().map_err(|_| convert_error(value, "FLOAT")),
        _ => Err(convert_error(value, "FLOAT")),
    }
}

pub fn to_bool(value: &Value) -> Result<bool, ValueError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        Value::Int(0) => Ok(false),
        Value::Int(1) => Ok(true),
        _ => Err(convert_error(value, "BOOL")),
    }
}

pub fn to_date(value: &Value) -> Result<NaiveDateTime, ValueError> {
    match value {
        Value::Date(d) => Ok(*d),
        Value::String(s) => parse_date(s),
        _ => Err(convert_error(value, "DATE")),
    }
}
