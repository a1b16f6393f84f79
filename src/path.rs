//! The flat path model every source is normalized into.
//!
//! A path is `segment ('.' segment)*`, where a segment may carry one or more
//! `[i]` index suffixes. A literal `.` inside a segment name is written `\.`.
//! The empty string is the root prefix used while populating and is never a
//! resolvable path.

use crate::types::KeyStyle;

/// Join a segment onto a prefix with `.`, omitting the separator at the root.
pub fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// Address element `index` of the sequence at `prefix`.
pub fn indexed(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

/// Return the shortest `prefix[i]` that is itself a prefix of `candidate`.
///
/// `None` unless `candidate` continues `prefix` directly with a well-formed
/// `[digits]` suffix. A candidate that is not longer than `prefix` plus the
/// three-character minimum suffix never matches.
pub fn sibling_index_path<'a>(candidate: &'a str, prefix: &str) -> Option<&'a str> {
    if candidate.len() < prefix.len() + 3 || !candidate.starts_with(prefix) {
        return None;
    }
    let rest = candidate[prefix.len()..].strip_prefix('[')?;
    let close = rest.find(']')?;
    let digits = &rest[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // prefix + '[' + digits + ']'
    Some(&candidate[..prefix.len() + close + 2])
}

/// Escape literal dots so a name stays one segment.
pub fn escape_segment(name: &str) -> String {
    name.replace('.', "\\.")
}

/// Derive the default path tag for a declared field name.
///
/// Each run of upper-case letters becomes `_` plus the lower-cased run
/// (no leading `_` at the start of the name). Snake-case names pass
/// through unchanged.
pub fn field_tag(name: &str) -> String {
    let mut tag = String::with_capacity(name.len() + 4);
    let mut in_upper_run = false;
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if !in_upper_run && i != 0 {
                tag.push('_');
            }
            tag.extend(c.to_lowercase());
            in_upper_run = true;
        } else {
            tag.push(c);
            in_upper_run = false;
        }
    }
    tag
}

/// Convert a snake or kebab case key to camel case: `pool_size` → `poolSize`.
///
/// Consecutive separators collapse; a trailing separator is dropped.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a kebab or camel case key to snake case: `pool-size` → `pool_size`.
pub fn to_snake_case(key: &str) -> String {
    field_tag(&key.replace('-', "_"))
}

/// Turn a raw file key into a path segment under the given style.
pub fn file_segment(key: &str, style: KeyStyle) -> String {
    let converted = match style {
        KeyStyle::Snake => to_snake_case(key),
        KeyStyle::Camel => to_camel_case(key),
    };
    escape_segment(&converted)
}
