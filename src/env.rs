use crate::value::{FlatValues, Value, push_value};

/// Build a flat mapping from `KEY=VALUE` lines matching `{PREFIX}__*`.
///
/// Double underscore `__` separates nesting levels and becomes `.`.
/// Single `_` within a segment is literal (part of the field name).
/// Keys are lowercased to match Rust field names; literal `.` is escaped.
/// Values are kept as strings; the population engine coerces them per leaf.
///
/// Takes an iterator so tests can pass synthetic data instead of the process
/// environment.
pub fn env_to_values<I, S>(prefix: &str, vars: I) -> FlatValues
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needle = format!("{prefix}__");
    let mut values = FlatValues::new();

    for line in vars {
        let Some(rest) = line.as_ref().strip_prefix(&needle) else {
            continue;
        };
        let Some((key, value)) = rest.split_once('=') else {
            continue;
        };
        if key.is_empty() {
            continue;
        }

        let key = key.to_lowercase().replace('.', "\\.").replace("__", ".");
        push_value(&mut values, key, Value::String(value.to_string()));
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(values: &FlatValues, key: &str) -> String {
        values[key][0].to_string()
    }

    #[test]
    fn simple_key() {
        let values = env_to_values("MYAPP", ["MYAPP__HOST=0.0.0.0"]);
        assert_eq!(single(&values, "host"), "0.0.0.0");
    }

    #[test]
    fn nested_key() {
        let values = env_to_values("MYAPP", ["MYAPP__DATABASE__URL=postgres://db"]);
        assert_eq!(single(&values, "database.url"), "postgres://db");
    }

    #[test]
    fn single_underscore_preserved() {
        let values = env_to_values("MYAPP", ["MYAPP__POOL_SIZE=10"]);
        assert_eq!(single(&values, "pool_size"), "10");
    }

    #[test]
    fn values_stay_strings() {
        let values = env_to_values("MYAPP", ["MYAPP__PORT=8080", "MYAPP__DEBUG=true"]);
        assert_eq!(values["port"], vec![Value::from("8080")]);
        assert_eq!(values["debug"], vec![Value::from("true")]);
    }

    #[test]
    fn value_may_contain_equals() {
        let values = env_to_values("APP", ["APP__DSN=a=b=c"]);
        assert_eq!(single(&values, "dsn"), "a=b=c");
    }

    #[test]
    fn dots_in_key_are_escaped() {
        let values = env_to_values("APP", ["APP__A.B=1"]);
        assert!(values.contains_key("a\\.b"));
    }

    #[test]
    fn repeated_vars_accumulate() {
        let values = env_to_values("TEST", ["TEST__ENV=value1", "TEST__ENV=value2"]);
        assert_eq!(values.len(), 1);
        assert_eq!(values["env"], vec![Value::from("value1"), Value::from("value2")]);
    }

    #[test]
    fn no_matching_prefix_ignored() {
        let values = env_to_values("MYAPP", ["OTHER__HOST=x"]);
        assert!(values.is_empty());
    }

    #[test]
    fn bare_prefix_ignored() {
        let values = env_to_values("MYAPP", ["MYAPP=x", "MYAPP__=x"]);
        assert!(values.is_empty());
    }

    #[test]
    fn prefix_with_single_underscore_not_matched() {
        let values = env_to_values("MYAPP", ["MYAPP_HOST=x"]);
        assert!(values.is_empty());
    }

    #[test]
    fn line_without_equals_ignored() {
        let values = env_to_values("MYAPP", ["MYAPP__HOST"]);
        assert!(values.is_empty());
    }
}
