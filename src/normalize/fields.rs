//! Presence-checked field extraction from loosely typed SchoolDigger JSON.
//!
//! SchoolDigger mixes numbers, numeric strings, `"Yes"`/`"No"` flags and
//! nulls for the same logical field across endpoints; every accessor here
//! returns `None` rather than guessing.

use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

pub fn object<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(key).and_then(Value::as_object)
}

pub fn array<'a>(obj: &'a Object, key: &str) -> Option<&'a Vec<Value>> {
    obj.get(key).and_then(Value::as_array)
}

/// Non-blank text. Numbers are accepted and rendered, since ids show up as
/// either.
pub fn text(obj: &Object, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn number(obj: &Object, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|n| n.is_finite())
}

/// Non-negative integer that fits a `u32`.
pub fn count(obj: &Object, key: &str) -> Option<u32> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    value.and_then(|n| u32::try_from(n).ok())
}

/// Rank values start at 1; upstream uses 0 for "unranked".
pub fn rank(obj: &Object, key: &str) -> Option<u32> {
    count(obj, key).filter(|r| *r >= 1)
}

pub fn flag(obj: &Object, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Iterate the objects of an array field, skipping anything else.
pub fn objects<'a>(obj: &'a Object, key: &str) -> impl Iterator<Item = &'a Object> {
    array(obj, key)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// The entry with the highest `year` in an array of yearly records.
pub fn latest<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    objects(obj, key)
        .filter_map(|entry| count(entry, "year").map(|year| (year, entry)))
        .max_by_key(|(year, _)| *year)
        .map(|(_, entry)| entry)
}

/// Outcome of reading a group of fields that must appear together.
#[derive(Debug, Clone, PartialEq)]
pub enum Group<T> {
    Complete(T),
    Absent,
    Partial,
}

impl<T> Group<T> {
    /// Classify a fixed set of optional values.
    pub fn collect<V: Default, const N: usize>(
        values: [Option<V>; N],
        build: impl FnOnce([V; N]) -> T,
    ) -> Self {
        let present = values.iter().filter(|v| v.is_some()).count();
        if present == 0 {
            return Group::Absent;
        }
        if present < N {
            return Group::Partial;
        }
        Group::Complete(build(values.map(|v| v.unwrap_or_default())))
    }

    /// The value of a complete group; absent and partial groups give `None`.
    pub fn complete(self) -> Option<T> {
        match self {
            Group::Complete(value) => Some(value),
            Group::Absent | Group::Partial => None,
        }
    }
}
