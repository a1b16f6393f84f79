//! Conversion of untyped [`Value`] cells into the five scalar kinds a target
//! leaf can have.
//!
//! Every function is total: it returns `None` instead of failing loudly, and
//! the population engine treats `None` like an absent value.

use crate::value::Value;

/// The scalar kinds a target leaf can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Int,
    Uint,
    Float,
    Bool,
}

/// A value already converted to the kind its leaf asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

/// Coerce `value` into `kind`.
pub fn coerce(value: &Value, kind: ScalarKind) -> Option<Scalar> {
    match kind {
        ScalarKind::String => to_string(value).map(Scalar::String),
        ScalarKind::Int => to_i64(value).map(Scalar::Int),
        ScalarKind::Uint => to_u64(value).map(Scalar::Uint),
        ScalarKind::Float => to_f64(value).map(Scalar::Float),
        ScalarKind::Bool => to_bool(value).map(Scalar::Bool),
    }
}

pub fn to_string(value: &Value) -> Option<String> {
    Some(match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Unsigned(u) => u.to_string(),
        Value::Float(_) | Value::Boolean(_) => value.to_string(),
    })
}

pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Unsigned(u) => i64::try_from(*u).ok(),
        Value::Float(x) => float_to_i64(*x),
        Value::Boolean(b) => Some(i64::from(*b)),
        Value::String(s) => match s.parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => float_to_i64(s.parse::<f64>().ok()?),
        },
    }
}

pub fn to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Integer(i) => u64::try_from(*i).ok(),
        Value::Unsigned(u) => Some(*u),
        Value::Float(x) => float_to_u64(*x),
        Value::Boolean(b) => Some(u64::from(*b)),
        Value::String(s) => match s.parse::<u64>() {
            Ok(u) => Some(u),
            Err(_) => float_to_u64(s.parse::<f64>().ok()?),
        },
    }
}

pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Unsigned(u) => Some(*u as f64),
        Value::Float(x) => Some(*x),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.parse::<f64>().ok(),
    }
}

pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::Unsigned(u) => Some(*u != 0),
        Value::Float(x) => Some(*x != 0.0),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
    }
}

// 2^63 and 2^64 are exact in f64; anything at or above them is out of range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

fn float_to_i64(x: f64) -> Option<i64> {
    if !x.is_finite() || x >= I64_BOUND || x < -I64_BOUND {
        return None;
    }
    Some(x.trunc() as i64)
}

fn float_to_u64(x: f64) -> Option<u64> {
    if !x.is_finite() || x < 0.0 || x >= U64_BOUND {
        return None;
    }
    Some(x.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn string_to_int_parses_then_truncates_floats() {
        assert_eq!(to_i64(&s("42")), Some(42));
        assert_eq!(to_i64(&s("-7")), Some(-7));
        assert_eq!(to_i64(&s("42.7")), Some(42));
        assert_eq!(to_i64(&s("-42.7")), Some(-42));
        assert_eq!(to_i64(&s("forty")), None);
        assert_eq!(to_i64(&s("1e30")), None);
        assert_eq!(to_i64(&s("NaN")), None);
    }

    #[test]
    fn numeric_to_int() {
        assert_eq!(to_i64(&Value::Float(42.7)), Some(42));
        assert_eq!(to_i64(&Value::Unsigned(5)), Some(5));
        assert_eq!(to_i64(&Value::Unsigned(u64::MAX)), None);
        assert_eq!(to_i64(&Value::Boolean(true)), Some(1));
        assert_eq!(to_i64(&Value::Boolean(false)), Some(0));
    }

    #[test]
    fn unsigned_rejects_negative_sources() {
        assert_eq!(to_u64(&Value::Integer(-1)), None);
        assert_eq!(to_u64(&Value::Float(-0.5)), None);
        assert_eq!(to_u64(&s("-5")), None);
        assert_eq!(to_u64(&s("-5.5")), None);
    }

    #[test]
    fn unsigned_accepts_in_range() {
        assert_eq!(to_u64(&s("84")), Some(84));
        assert_eq!(to_u64(&Value::Float(84.7)), Some(84));
        assert_eq!(to_u64(&s("18446744073709551615")), Some(u64::MAX));
        assert_eq!(to_u64(&Value::Boolean(true)), Some(1));
        assert_eq!(to_u64(&Value::Float(1e20)), None);
    }

    #[test]
    fn float_conversions() {
        assert_eq!(to_f64(&s("2.25")), Some(2.25));
        assert_eq!(to_f64(&Value::Integer(42)), Some(42.0));
        assert_eq!(to_f64(&Value::Boolean(true)), Some(1.0));
        assert_eq!(to_f64(&Value::Boolean(false)), Some(0.0));
        assert_eq!(to_f64(&s("abc")), None);
    }

    #[test]
    fn bool_from_strings_is_case_insensitive() {
        for truthy in ["true", "T", "Yes", "y", "1"] {
            assert_eq!(to_bool(&s(truthy)), Some(true), "{truthy}");
        }
        for falsy in ["FALSE", "f", "no", "N", "0"] {
            assert_eq!(to_bool(&s(falsy)), Some(false), "{falsy}");
        }
        assert_eq!(to_bool(&s("maybe")), None);
        assert_eq!(to_bool(&s("")), None);
    }

    #[test]
    fn bool_from_numbers() {
        assert_eq!(to_bool(&Value::Integer(1)), Some(true));
        assert_eq!(to_bool(&Value::Integer(0)), Some(false));
        assert_eq!(to_bool(&Value::Float(0.5)), Some(true));
        assert_eq!(to_bool(&Value::Unsigned(0)), Some(false));
    }

    #[test]
    fn anything_formats_as_string() {
        assert_eq!(to_string(&Value::Integer(42)).as_deref(), Some("42"));
        assert_eq!(to_string(&Value::Float(2.25)).as_deref(), Some("2.25"));
        assert_eq!(to_string(&Value::Float(42.0)).as_deref(), Some("42"));
        assert_eq!(to_string(&Value::Float(1e300)).as_deref(), Some("1e300"));
        assert_eq!(to_string(&Value::Float(-2.5e-7)).as_deref(), Some("-2.5e-7"));
        assert_eq!(to_string(&Value::Float(0.0)).as_deref(), Some("0"));
        assert_eq!(to_string(&Value::Boolean(true)).as_deref(), Some("true"));
        assert_eq!(to_string(&Value::Boolean(false)).as_deref(), Some("false"));
    }

    #[test]
    fn coerce_dispatches_by_kind() {
        assert_eq!(coerce(&s("8"), ScalarKind::Uint), Some(Scalar::Uint(8)));
        assert_eq!(coerce(&s("8"), ScalarKind::Bool), None);
        assert_eq!(
            coerce(&Value::Integer(8), ScalarKind::String),
            Some(Scalar::String("8".into()))
        );
    }
}
