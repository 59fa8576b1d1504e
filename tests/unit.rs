//! Unit tests for the value type system.
use ahash::AHashMap;
use chrono::NaiveDate;
use shinsa::error::{CompareError, ValueError};
use shinsa::prelude::*;
use shinsa::value::{parse_date, to_bool, to_date, to_f64, to_i64, to_int, to_string};

fn kind(value: impl Into<Value>) -> SemanticType {
    classify(&value.into()).unwrap()
}

#[test]
fn test_native_numbers_classify() {
    assert_eq!(kind(7i8), SemanticType::Int);
    assert_eq!(kind(-7i16), SemanticType::Int);
    assert_eq!(kind(7i32), SemanticType::Int);
    assert_eq!(kind(i64::MAX), SemanticType::Int);
    assert_eq!(kind(3.0f64), SemanticType::Int);
    assert_eq!(kind(-2.0f32), SemanticType::Int);
    assert_eq!(kind(3.25f64), SemanticType::Float);
    assert_eq!(kind(f64::NAN), SemanticType::Float);
}

#[test]
fn test_huge_floats_stay_float() {
    // Integral but far beyond the i64 range.
    assert_eq!(kind(1e30f64), SemanticType::Float);
    assert_eq!(kind(f64::INFINITY), SemanticType::Float);
    assert_eq!(kind(-9_223_372_036_854_775_808.0f64), SemanticType::Int);
    assert_eq!(kind(9_223_372_036_854_775_808.0f64), SemanticType::Float);
}

#[test]
fn test_native_kinds_classify() {
    assert_eq!(kind(true), SemanticType::Bool);
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(kind(date), SemanticType::Date);
    assert_eq!(kind(vec![1, 2, 3]), SemanticType::Array);
    assert_eq!(kind(AHashMap::<String, Value>::new()), SemanticType::Map);
}

#[test]
fn test_text_classification_order() {
    assert_eq!(kind("123"), SemanticType::Int);
    assert_eq!(kind("1.5"), SemanticType::Float);
    assert_eq!(kind("true"), SemanticType::Bool);
    assert_eq!(kind("false"), SemanticType::Bool);
    assert_eq!(kind("2024-01-01"), SemanticType::Date);
    assert_eq!(kind("2024-01-01 12:30:00"), SemanticType::Date);
    assert_eq!(kind("abc"), SemanticType::String);
    assert_eq!(kind("True"), SemanticType::String);
    assert_eq!(kind("-5"), SemanticType::String);
    assert_eq!(kind("1.2.3"), SemanticType::String);
    assert_eq!(kind("1..2"), SemanticType::String);
    assert_eq!(kind(""), SemanticType::String);
    assert_eq!(kind("2024-01-01T12:30:00"), SemanticType::String);
}

#[test]
fn test_null_is_unknown() {
    let err = classify(&Value::Null).unwrap_err();
    assert!(matches!(err, ValueError::FeatureTypeUnknown(_)));
}

#[test]
fn test_types_match() {
    use SemanticType::*;
    assert!(types_match(Int, Float));
    assert!(types_match(Float, Int));
    for t in [Int, Float, Bool, Date, String, Array, Map, Unknown] {
        assert!(types_match(t, t));
    }
    assert!(!types_match(String, Int));
    assert!(!types_match(Date, String));
    assert!(!types_match(Bool, Int));
}

#[test]
fn test_conversions() {
    assert_eq!(to_i64(&Value::from("42")).unwrap(), 42);
    assert_eq!(to_i64(&Value::from(-3.9)).unwrap(), -3);
    assert_eq!(to_i64(&Value::from(true)).unwrap(), 1);
    assert!(to_i64(&Value::from(1e30)).is_err());
    assert!(to_i64(&Value::from(vec![1])).is_err());

    assert_eq!(to_int(&Value::from(7i64)).unwrap(), 7);
    assert!(to_int(&Value::from(i64::MAX)).is_err());

    assert_eq!(to_f64(&Value::from("1.5")).unwrap(), 1.5);
    assert_eq!(to_f64(&Value::from(2)).unwrap(), 2.0);

    assert_eq!(to_string(&Value::from(42)).unwrap(), "42");
    assert_eq!(to_string(&Value::from(1.5)).unwrap(), "1.5");
    assert_eq!(to_string(&Value::from(false)).unwrap(), "false");
    let err = to_string(&Value::from(vec!["a"])).unwrap_err();
    assert!(matches!(err, ValueError::TypeConvert { target: "STRING", .. }));

    assert!(to_bool(&Value::from("true")).unwrap());
    assert!(to_bool(&Value::from("yes")).is_err());
}

#[test]
fn test_parse_date() {
    let short = parse_date("2024-03-05").unwrap();
    assert_eq!(short.to_string(), "2024-03-05 00:00:00");
    let long = parse_date("2024-03-05 08:09:10").unwrap();
    assert_eq!(long.to_string(), "2024-03-05 08:09:10");
    assert!(parse_date("2024-13-45").is_err());
    assert!(matches!(
        parse_date("yesterday"),
        Err(ValueError::TypeConvert { target: "DATE", .. })
    ));
    assert_eq!(to_date(&Value::from("2024-03-05")).unwrap(), short);
}

#[test]
fn test_value_display() {
    assert_eq!(Value::from(42).to_string(), "42");
    assert_eq!(Value::from(1.5).to_string(), "1.5");
    assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
    let map: AHashMap<String, Value> =
        [("b".to_string(), Value::from(2)), ("a".to_string(), Value::from(1))]
            .into_iter()
            .collect();
    assert_eq!(Value::from(map).to_string(), "{a: 1, b: 2}");
    assert_eq!(Value::Null.to_string(), "null");
}

#[test]
fn test_json_values() {
    let value = Value::from(serde_json::json!({"n": 3, "f": 2.5, "s": "x", "l": [true]}));
    let Value::Map(map) = value else {
        panic!("expected a map");
    };
    assert_eq!(map["n"], Value::Int(3));
    assert_eq!(map["f"], Value::Float(2.5));
    assert_eq!(map["s"], Value::String("x".to_string()));
    assert_eq!(map["l"], Value::Array(vec![Value::Bool(true)]));
}

#[test]
fn test_operator_parsing() {
    assert_eq!(Operator::parse(">"), Some(Operator::Gt));
    assert_eq!(Operator::parse("gt"), Some(Operator::Gt));
    assert_eq!(Operator::parse(" LE "), Some(Operator::Le));
    assert_eq!(Operator::parse("not_in"), Some(Operator::NotIn));
    assert_eq!(Operator::parse("~"), None);
    let op: Operator = serde_json::from_str("\"between\"").unwrap();
    assert_eq!(op, Operator::Between);
    assert!(serde_json::from_str::<Operator>("\"nope\"").is_err());
}

#[test]
fn test_numeric_comparisons_across_representations() {
    let apply = |op, a: Value, b: Value| op_apply(op, a, b);
    assert!(apply(Operator::Gt, "35".into(), 30.into()));
    assert!(apply(Operator::Eq, "42".into(), 42.into()));
    assert!(apply(Operator::Eq, 42.0.into(), 42.into()));
    assert!(apply(Operator::Lt, "1.5".into(), 2.into()));
    assert!(apply(Operator::Ge, 2.into(), "2".into()));
    assert!(apply(Operator::Neq, 2.into(), 2.5.into()));
    assert!(!apply(Operator::Le, 3.into(), 2.99.into()));
}

#[test]
fn test_collection_and_text_operators() {
    assert!(op_apply(Operator::Between, 5.into(), vec![1, 10].into()));
    assert!(op_apply(Operator::Between, "10".into(), vec![1, 10].into()));
    assert!(!op_apply(Operator::Between, 11.into(), vec![1, 10].into()));
    assert!(op_apply(Operator::In, "b".into(), vec!["a", "b"].into()));
    assert!(op_apply(Operator::NotIn, "c".into(), vec!["a", "b"].into()));
    assert!(op_apply(Operator::Contain, "user123".into(), "123".into()));
    assert!(op_apply(Operator::Contain, vec!["x", "y"].into(), "y".into()));
    assert!(op_apply(Operator::Like, "alice@example.com".into(), "%@example.___".into()));
    assert!(!op_apply(Operator::Like, "alice@example.org".into(), "%@example.com".into()));
    assert!(op_apply(Operator::Before, "2024-01-01".into(), "2024-06-01 00:00:00".into()));
    assert!(op_apply(Operator::After, "2024-06-02".into(), "2024-06-01".into()));

    let map = Value::from(serde_json::json!({"country": "NZ"}));
    assert!(op_apply(Operator::KeyExist, map.clone(), "country".into()));
    assert!(op_apply(Operator::ValueExist, map.clone(), "NZ".into()));
    assert!(!op_apply(Operator::ValueExist, map, "AU".into()));
}

#[test]
fn test_wide_integer_text_compares_numerically() {
    let wide: Value = "99999999999999999999".into();
    assert_eq!(classify(&wide).unwrap(), SemanticType::Int);
    assert!(op_apply(Operator::Gt, wide.clone(), 30.into()));
    assert!(!op_apply(Operator::Lt, wide.clone(), "18446744073709551615".into()));
    assert!(op_apply(Operator::Between, wide, vec![0.0, 1e21].into()));
}

#[test]
fn test_comparison_failures() {
    let err = Operator::Gt.apply(&"1.5".into(), &"abc".into()).unwrap_err();
    assert_eq!(
        err,
        CompareError::TypeMismatch {
            expected: SemanticType::String,
            found: SemanticType::Float,
        }
    );

    let err = Operator::Gt.apply(&true.into(), &false.into()).unwrap_err();
    assert!(matches!(err, CompareError::Unsupported { .. }));

    let err = Operator::Eq.apply(&Value::Null, &1.into()).unwrap_err();
    assert!(matches!(err, CompareError::Value(ValueError::FeatureTypeUnknown(_))));

    let err = Operator::In.apply(&1.into(), &vec!["a"].into()).unwrap_err();
    assert!(matches!(err, CompareError::TypeMismatch { .. }));

    assert!(Operator::Between.validate_threshold(&vec![1].into()).is_err());
    assert!(Operator::In.validate_threshold(&1.into()).is_err());
}

fn op_apply(op: Operator, feature: Value, threshold: Value) -> bool {
    op.apply(&feature, &threshold).unwrap()
}
