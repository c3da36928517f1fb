//! Dotted key-path utilities over nested JSON mappings.
//!
//! A key-path such as `appOptions.ioLayout` addresses a leaf of a nested
//! mapping.  This module flattens mappings into key-paths, resolves key-paths
//! back to values, and merges one mapping into any destination that exposes a
//! key-path setter ([`KeyPathWrite`]).
//!
//! Only JSON objects are descended into.  Arrays, strings, numbers, booleans
//! and `null` are leaves.

use serde_json::{Map, Value};

/// Lazy depth-first sequence of dotted key-paths.
///
/// Produced by [`key_paths`] and [`map_key_paths`].  Each nested level is
/// expanded only when the traversal reaches it.  The sequence is finite and
/// can be restarted by cloning it before iteration.
#[derive(Debug, Clone)]
pub struct KeyPaths<'a> {
    stack: Vec<Frame<'a>>,
}

#[derive(Debug, Clone)]
struct Frame<'a> {
    prefix: String,
    entries: Vec<(&'a String, &'a Value)>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(prefix: String, map: &'a Map<String, Value>) -> Self {
        Self {
            prefix,
            entries: map.iter().collect(),
            next: 0,
        }
    }
}

impl<'a> Iterator for KeyPaths<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(&(key, value)) = frame.entries.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            let path = join(&frame.prefix, key);
            match value {
                Value::Object(inner) => self.stack.push(Frame::new(path, inner)),
                _ => return Some(path),
            }
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Returns the key-paths of every leaf reachable from `obj`.
///
/// A non-object `obj` has no key-paths.  A non-empty `prefix` is prepended to
/// every emitted path.
///
/// ```
/// use ide_config_core::domain::keypath::key_paths;
/// use serde_json::json;
///
/// let obj = json!({"a": {"b": 1, "c": {"d": 2}}, "e": 3});
/// let paths: Vec<String> = key_paths(&obj, "").collect();
/// assert_eq!(paths, ["a.b", "a.c.d", "e"]);
/// ```
pub fn key_paths<'a>(obj: &'a Value, prefix: &str) -> KeyPaths<'a> {
    match obj {
        Value::Object(map) => map_key_paths(map, prefix),
        _ => KeyPaths { stack: Vec::new() },
    }
}

/// Returns the key-paths of every leaf reachable from `map`.
pub fn map_key_paths<'a>(map: &'a Map<String, Value>, prefix: &str) -> KeyPaths<'a> {
    KeyPaths {
        stack: vec![Frame::new(prefix.to_string(), map)],
    }
}

/// Resolves `key_path` inside `obj`.
///
/// An exact key match wins over descending, so flattened mappings (whose keys
/// already contain dots) resolve as well as nested ones.
pub fn lookup<'a>(obj: &'a Value, key_path: &str) -> Option<&'a Value> {
    lookup_in(obj.as_object()?, key_path)
}

/// [`lookup`] starting from a mapping.
pub fn lookup_in<'a>(map: &'a Map<String, Value>, key_path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key_path) {
        return Some(value);
    }
    let (head, rest) = key_path.split_once('.')?;
    lookup(map.get(head)?, rest)
}

/// Converts boolean-like strings to booleans.
///
/// `"true"`, `"on"`, `"yes"` become `true`; `"false"`, `"off"`, `"no"` become
/// `false`, ignoring ASCII case.  Every other value is returned unchanged.
pub fn normalize_bool(value: Value) -> Value {
    match value {
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => Value::Bool(true),
            "false" | "off" | "no" => Value::Bool(false),
            _ => Value::String(s),
        },
        other => other,
    }
}

/// A destination that accepts writes addressed by key-path.
///
/// Plain JSON values store whatever they are given.  Validating destinations
/// (the resolved configuration) apply their own rules inside `write_path`.
pub trait KeyPathWrite {
    fn write_path(&mut self, key_path: &str, value: Value);
}

impl KeyPathWrite for Value {
    fn write_path(&mut self, key_path: &str, value: Value) {
        let segments: Vec<&str> = key_path.split('.').collect();
        write_at(self, &segments, value);
    }
}

impl KeyPathWrite for Map<String, Value> {
    fn write_path(&mut self, key_path: &str, value: Value) {
        let segments: Vec<&str> = key_path.split('.').collect();
        if let Some((head, rest)) = segments.split_first() {
            let slot = self.entry(head.to_string()).or_insert(Value::Null);
            write_at(slot, rest, value);
        }
    }
}

/// Writes `value` at `segments` below `target`, replacing non-object
/// intermediates with empty objects.
fn write_at(target: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let slot = map.entry(head.to_string()).or_insert(Value::Null);
        write_at(slot, rest, value);
    }
}

/// Merges every leaf of `src` into `dest`.
///
/// Values are passed through [`normalize_bool`] and written with `dest`'s own
/// setter, so a validating destination still validates each write.
pub fn merge<D>(dest: &mut D, src: &Map<String, Value>)
where
    D: KeyPathWrite + ?Sized,
{
    for key_path in map_key_paths(src, "") {
        if let Some(value) = lookup_in(src, &key_path) {
            dest.write_path(&key_path, normalize_bool(value.clone()));
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
