//! Expand host attribute values into native types, and flatten them back
//!
//! The host hands resource attributes over as loosely-typed JSON values.
//! List expanders are lenient (they skip or blank out elements of the wrong
//! type, since the host turns empty strings in lists into nulls); map and
//! numeric expanders are strict and report the first offending entry.

use crate::error::{kind_of, ValueError};
use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Lists
// =============================================================================

/// Expand a list of strings, skipping empty and non-string elements
pub fn expand_string_list(configured: &[Value]) -> Vec<String> {
    expand_stringy_list(configured)
}

/// Expand a list of strings into a string newtype, skipping empty and non-string elements
pub fn expand_stringy_list<E: From<String>>(configured: &[Value]) -> Vec<E> {
    configured
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|s| E::from(s.to_string()))
        .collect()
}

/// Expand a list of strings, keeping one element per input
///
/// Non-string elements (the host's representation of an empty string inside a
/// list is null) become `""`.
pub fn expand_string_list_empty(configured: &[Value]) -> Vec<String> {
    expand_stringy_list_empty(configured)
}

/// Like [`expand_string_list_empty`], producing a string newtype
pub fn expand_stringy_list_empty<E: From<String>>(configured: &[Value]) -> Vec<E> {
    configured
        .iter()
        .map(|v| E::from(v.as_str().unwrap_or_default().to_string()))
        .collect()
}

/// Expand a list of timestamp strings using a `chrono` format string
///
/// Empty and non-string elements are skipped. A string that does not parse
/// expands to the Unix epoch.
pub fn expand_time_list(configured: &[Value], format: &str) -> Vec<NaiveDateTime> {
    configured
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDateTime::parse_from_str(s, format).unwrap_or_else(|e| {
                tracing::debug!("unparseable timestamp {:?} ({}), using epoch", s, e);
                NaiveDateTime::default()
            })
        })
        .collect()
}

/// Expand a list of integers
pub fn expand_int64_list(configured: &[Value]) -> Result<Vec<i64>, ValueError> {
    configured
        .iter()
        .enumerate()
        .map(|(i, v)| as_i64(v, || format!("[{}]", i)))
        .collect()
}

/// Expand a list of floats (integers are accepted and widened)
pub fn expand_float64_list(configured: &[Value]) -> Result<Vec<f64>, ValueError> {
    configured
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| ValueError::UnexpectedType {
                path: format!("[{}]", i),
                expected: "float",
                found: kind_of(v),
            })
        })
        .collect()
}

/// Flatten strings into attribute values
pub fn flatten_string_list<S: AsRef<str>>(list: &[S]) -> Vec<Value> {
    list.iter()
        .map(|s| Value::String(s.as_ref().to_string()))
        .collect()
}

/// Flatten timestamps into formatted attribute strings
pub fn flatten_time_list(list: &[NaiveDateTime], format: &str) -> Vec<Value> {
    list.iter()
        .map(|t| Value::String(t.format(format).to_string()))
        .collect()
}

pub fn flatten_int64_list(list: &[i64]) -> Vec<Value> {
    list.iter().map(|&i| Value::Number(Number::from(i))).collect()
}

/// Flatten floats into attribute values, truncating toward zero
pub fn flatten_float64_list(list: &[f64]) -> Vec<Value> {
    list.iter()
        .map(|&f| Value::Number(Number::from(f as i64)))
        .collect()
}

// =============================================================================
// Sets
// =============================================================================

/// Expand a set of strings, skipping empty and non-string elements
pub fn expand_string_set(configured: &[Value]) -> BTreeSet<String> {
    expand_stringy_list::<String>(configured).into_iter().collect()
}

pub fn flatten_string_set<S: AsRef<str>>(list: &[S]) -> BTreeSet<String> {
    list.iter().map(|s| s.as_ref().to_string()).collect()
}

// =============================================================================
// Maps
// =============================================================================

/// Expand a map whose values must all be strings
pub fn expand_string_map(m: &Map<String, Value>) -> Result<HashMap<String, String>, ValueError> {
    expand_map(m, |k, v| {
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| ValueError::UnexpectedType {
                path: k.to_string(),
                expected: "string",
                found: kind_of(v),
            })
    })
}

/// Expand a map whose values must all be integers
pub fn expand_int64_map(m: &Map<String, Value>) -> Result<HashMap<String, i64>, ValueError> {
    expand_map(m, |k, v| as_i64(v, || k.to_string()))
}

/// Expand a map whose values must all be integers that fit in 32 bits
pub fn expand_int32_map(m: &Map<String, Value>) -> Result<HashMap<String, i32>, ValueError> {
    expand_map(m, |k, v| {
        let i = as_i64(v, || k.to_string())?;
        i32::try_from(i).map_err(|_| ValueError::OutOfRange {
            path: k.to_string(),
            value: i.to_string(),
            target: "i32",
        })
    })
}

/// Expand a map whose values must all be booleans
pub fn expand_bool_map(m: &Map<String, Value>) -> Result<HashMap<String, bool>, ValueError> {
    expand_map(m, |k, v| {
        v.as_bool().ok_or_else(|| ValueError::UnexpectedType {
            path: k.to_string(),
            expected: "bool",
            found: kind_of(v),
        })
    })
}

/// Re-key a map of string newtypes into plain strings
pub fn expand_stringy_map<K, V>(m: &HashMap<K, V>) -> HashMap<String, String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    m.iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect()
}

pub fn flatten_string_map(m: &HashMap<String, String>) -> Map<String, Value> {
    m.iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

fn expand_map<T, F>(m: &Map<String, Value>, mut f: F) -> Result<HashMap<String, T>, ValueError>
where
    F: FnMut(&str, &Value) -> Result<T, ValueError>,
{
    m.iter()
        .map(|(k, v)| f(k, v).map(|t| (k.clone(), t)))
        .collect()
}

fn as_i64(v: &Value, path: impl FnOnce() -> String) -> Result<i64, ValueError> {
    v.as_i64().ok_or_else(|| ValueError::UnexpectedType {
        path: path(),
        expected: "integer",
        found: kind_of(v),
    })
}
