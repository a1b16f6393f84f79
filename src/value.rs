//! Untyped value cells and the flat path-keyed mapping every source produces.

use std::fmt;

use indexmap::IndexMap;

/// One untyped scalar as supplied by a source.
///
/// Flags and environment variables always produce [`Value::String`]; decoded
/// files produce whatever their format carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
}

/// Path → ordered, non-empty sequence of values, in insertion order.
pub type FlatValues = IndexMap<String, Vec<Value>>;

/// Append `value` to the multi-value sequence stored at `path`.
pub fn push_value(values: &mut FlatValues, path: String, value: Value) {
    values.entry(path).or_default().push(value);
}

impl Value {
    /// Short name of the variant, used in log fields.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Unsigned(_) => "unsigned",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Unsigned(u) => write!(f, "{u}"),
            Value::Float(x) => write_float(f, *x),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Shortest round-trip form, switching to exponent notation for magnitudes
/// at or above `1e21` and below `1e-4`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    let magnitude = x.abs();
    if x.is_finite() && x != 0.0 && !(1e-4..1e21).contains(&magnitude) {
        write!(f, "{x:e}")
    } else {
        write!(f, "{x}")
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
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Unsigned(u)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_value_accumulates_in_order() {
        let mut values = FlatValues::new();
        push_value(&mut values, "foo".into(), "a".into());
        push_value(&mut values, "bar".into(), "x".into());
        push_value(&mut values, "foo".into(), "b".into());
        assert_eq!(values["foo"], vec![Value::from("a"), Value::from("b")]);
        assert_eq!(values.keys().collect::<Vec<_>>(), ["foo", "bar"]);
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Boolean(false).to_string(), "false");
    }
}
