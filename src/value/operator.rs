use super::{SemanticType, Value, classify, to_bool, to_date, to_f64, to_i64, to_string, types_match};
use crate::error::CompareError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Defines the operator set together with the textual forms each operator accepts.
macro_rules! define_operators {
    ( $( ($variant:ident, $symbol:expr, [$($form:literal),+]) ),* $(,)? ) => {
        /// A comparison a condition applies between a feature value and its threshold.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Operator {
            $( $variant, )*
        }

        impl Operator {
            pub fn symbol(self) -> &'static str {
                match self {
                    $( Operator::$variant => $symbol, )*
                }
            }

            /// Resolves an operator from its symbolic or mnemonic form, ignoring case.
            pub fn parse(text: &str) -> Option<Self> {
                let upper = text.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $( $($form)|+ => Some(Operator::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_operators! {
    (Gt, ">", [">", "GT"]),
    (Ge, ">=", [">=", "GE"]),
    (Lt, "<", ["<", "LT"]),
    (Le, "<=", ["<=", "LE"]),
    (Eq, "==", ["==", "=", "EQ"]),
    (Neq, "!=", ["!=", "NEQ"]),
    (Between, "BETWEEN", ["BETWEEN"]),
    (In, "IN", ["IN"]),
    (NotIn, "NOT_IN", ["NOT_IN", "NOTIN"]),
    (Contain, "CONTAIN", ["CONTAIN", "CONTAINS"]),
    (Like, "LIKE", ["LIKE"]),
    (Before, "BEFORE", ["BEFORE"]),
    (After, "AFTER", ["AFTER"]),
    (KeyExist, "KEY_EXIST", ["KEY_EXIST", "KEYEXIST"]),
    (ValueExist, "VALUE_EXIST", ["VALUE_EXIST", "VALUEEXIST"]),
}

impl TryFrom<String> for Operator {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Operator::parse(&text).ok_or_else(|| format!("unknown operator '{}'", text))
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Operator {
    /// Checks a threshold's shape once, when the owning node is built.
    pub fn validate_threshold(self, threshold: &Value) -> Result<(), String> {
        match (self, threshold) {
            (Operator::Between, Value::Array(items)) if items.len() == 2 => Ok(()),
            (Operator::Between, _) => Err("BETWEEN expects a [low, high] array".to_string()),
            (Operator::In | Operator::NotIn, Value::Array(_)) => Ok(()),
            (Operator::In | Operator::NotIn, _) => {
                Err(format!("{} expects an array threshold", self))
            }
            (_, Value::Null) => Err(format!("{} needs a threshold value", self)),
            _ => Ok(()),
        }
    }

    /// Applies the operator with `feature` on the left and `threshold` on the right.
    pub fn apply(self, feature: &Value, threshold: &Value) -> Result<bool, CompareError> {
        self.apply_prepared(feature, threshold, None)
    }

    /// Like [`Operator::apply`], reusing a `LIKE` pattern built by [`compile_like`].
    pub fn apply_prepared(
        self,
        feature: &Value,
        threshold: &Value,
        like: Option<&Regex>,
    ) -> Result<bool, CompareError> {
        let left = classify(feature)?;
        let right = classify(threshold)?;

        match self {
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
                require_match(left, right)?;
                let ord = order(self, feature, left, threshold, right)?;
                Ok(match self {
                    Operator::Gt => ord == Ordering::Greater,
                    Operator::Ge => ord != Ordering::Less,
                    Operator::Lt => ord == Ordering::Less,
                    _ => ord != Ordering::Greater,
                })
            }
            Operator::Eq | Operator::Neq => {
                require_match(left, right)?;
                let eq = equal(self, feature, left, threshold, right)?;
                Ok(eq == (self == Operator::Eq))
            }
            Operator::Before | Operator::After => {
                require_kind(SemanticType::Date, left)?;
                require_kind(SemanticType::Date, right)?;
                let ord = to_date(feature)?.cmp(&to_date(threshold)?);
                Ok(if self == Operator::Before {
                    ord == Ordering::Less
                } else {
                    ord == Ordering::Greater
                })
            }
            Operator::Between => {
                let bounds = array_items(threshold, right)?;
                let [low, high] = bounds else {
                    return Err(CompareError::InvalidThreshold(
                        "BETWEEN expects a [low, high] array".to_string(),
                    ));
                };
                let (low_kind, high_kind) = (classify(low)?, classify(high)?);
                require_match(left, low_kind)?;
                require_match(left, high_kind)?;
                let above = order(self, feature, left, low, low_kind)? != Ordering::Less;
                let below = order(self, feature, left, high, high_kind)? != Ordering::Greater;
                Ok(above && below)
            }
            Operator::In | Operator::NotIn => {
                let items = array_items(threshold, right)?;
                let mut found = false;
                for item in items {
                    let kind = classify(item)?;
                    require_match(left, kind)?;
                    if equal(self, feature, left, item, kind)? {
                        found = true;
                        break;
                    }
                }
                Ok(found == (self == Operator::In))
            }
            Operator::Contain => match feature {
                Value::Array(items) => {
                    for item in items {
                        let kind = classify(item)?;
                        if types_match(kind, right) && equal(self, item, kind, threshold, right)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                _ => Ok(text_of(self, feature, left)?.contains(&text_of(self, threshold, right)?)),
            },
            Operator::Like => {
                let text = text_of(self, feature, left)?;
                match like {
                    Some(pattern) => Ok(pattern.is_match(&text)),
                    None => Ok(compile_like(threshold)?.is_match(&text)),
                }
            }
            Operator::KeyExist => {
                let Value::Map(map) = feature else {
                    return Err(CompareError::TypeMismatch {
                        expected: SemanticType::Map,
                        found: left,
                    });
                };
                Ok(map.contains_key(&text_of(self, threshold, right)?))
            }
            Operator::ValueExist => {
                let Value::Map(map) = feature else {
                    return Err(CompareError::TypeMismatch {
                        expected: SemanticType::Map,
                        found: left,
                    });
                };
                for item in map.values() {
                    let Ok(kind) = classify(item) else { continue };
                    if types_match(kind, right) && equal(self, item, kind, threshold, right)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

fn require_match(found: SemanticType, expected: SemanticType) -> Result<(), CompareError> {
    if types_match(found, expected) {
        Ok(())
    } else {
        Err(CompareError::TypeMismatch { expected, found })
    }
}

fn require_kind(expected: SemanticType, found: SemanticType) -> Result<(), CompareError> {
    if expected == found {
        Ok(())
    } else {
        Err(CompareError::TypeMismatch { expected, found })
    }
}

fn array_items(value: &Value, kind: SemanticType) -> Result<&[Value], CompareError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CompareError::TypeMismatch {
            expected: SemanticType::Array,
            found: kind,
        }),
    }
}

fn text_of(op: Operator, value: &Value, kind: SemanticType) -> Result<String, CompareError> {
    match kind {
        SemanticType::Array | SemanticType::Map | SemanticType::Date
            if !matches!(value, Value::String(_)) =>
        {
            Err(CompareError::Unsupported {
                operator: op.symbol(),
                kind,
            })
        }
        _ => Ok(to_string(value)?),
    }
}

/// Orders two values whose semantic types already match.
fn order(
    op: Operator,
    a: &Value,
    a_kind: SemanticType,
    b: &Value,
    b_kind: SemanticType,
) -> Result<Ordering, CompareError> {
    match (a_kind, b_kind) {
        (SemanticType::Int, SemanticType::Int) => match (to_i64(a), to_i64(b)) {
            (Ok(x), Ok(y)) => Ok(x.cmp(&y)),
            // Digit strings wider than i64 still classify INT.
            _ => float_order(op, a, b),
        },
        (x, y) if x.is_numeric() && y.is_numeric() => float_order(op, a, b),
        (SemanticType::Date, _) => Ok(to_date(a)?.cmp(&to_date(b)?)),
        (SemanticType::String, _) => Ok(to_string(a)?.cmp(&to_string(b)?)),
        (kind, _) => Err(CompareError::Unsupported {
            operator: op.symbol(),
            kind,
        }),
    }
}

fn float_order(op: Operator, a: &Value, b: &Value) -> Result<Ordering, CompareError> {
    to_f64(a)?
        .partial_cmp(&to_f64(b)?)
        .ok_or(CompareError::Unsupported {
            operator: op.symbol(),
            kind: SemanticType::Float,
        })
}

fn equal(
    op: Operator,
    a: &Value,
    a_kind: SemanticType,
    b: &Value,
    b_kind: SemanticType,
) -> Result<bool, CompareError> {
    match a_kind {
        SemanticType::Bool => Ok(to_bool(a)? == to_bool(b)?),
        SemanticType::Array | SemanticType::Map => Ok(a == b),
        _ => Ok(order(op, a, a_kind, b, b_kind)? == Ordering::Equal),
    }
}

/// Translates a `LIKE` threshold (`%` any run, `_` one character) into an anchored regex.
pub fn compile_like(threshold: &Value) -> Result<Regex, CompareError> {
    let pattern = text_of(Operator::Like, threshold, classify(threshold)?)?;
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    for c in pattern.chars() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source).map_err(|e| CompareError::InvalidThreshold(e.to_string()))
}
