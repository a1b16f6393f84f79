use tracing::debug;

use crate::value::{FlatValues, Value, push_value};

/// Build a flat mapping from CLI-style tokens (program name already removed).
///
/// `--key=value` and `-k=value` split at the first `=`. A flag token with no
/// `=` takes the whole next token as its value, whatever it looks like.
/// Tokens that are not flags are ignored.
///
/// Keys are lowercased, literal `.` is escaped, `--` inside the key nests
/// (becomes `.`), and any remaining `-` becomes `_`. Repeated flags
/// accumulate in encounter order.
pub fn flags_to_values<I, S>(args: I) -> FlatValues
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = FlatValues::new();
    let mut pending: Option<String> = None;

    for arg in args {
        let arg = arg.as_ref();

        if let Some(key) = pending.take() {
            insert_flag(&mut values, &key, arg);
            continue;
        }

        let Some(body) = flag_body(arg) else {
            continue;
        };
        match body.split_once('=') {
            Some((key, value)) => insert_flag(&mut values, key, value),
            None => pending = Some(body.to_string()),
        }
    }

    if let Some(key) = pending {
        debug!(flag = %key, "flag has no value and was ignored");
    }

    values
}

/// Strip `--` or `-` from a flag token. `None` for anything else.
fn flag_body(arg: &str) -> Option<&str> {
    if let Some(body) = arg.strip_prefix("--") {
        return Some(body);
    }
    arg.strip_prefix('-').filter(|body| !body.is_empty())
}

fn insert_flag(values: &mut FlatValues, raw_key: &str, value: &str) {
    let key = normalize_flag_key(raw_key);
    if key.is_empty() {
        return;
    }
    push_value(values, key, Value::String(value.to_string()));
}

fn normalize_flag_key(key: &str) -> String {
    key.to_lowercase()
        .replace('.', "\\.")
        .replace("--", ".")
        .replace('-', "_")
}
