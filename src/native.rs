//! Converts parsed records into the canonical language-neutral
//! dictionary/list/string form consumers work with, plus the
//! classification predicates records expose.

use serde_json::{Map, Value as Json};

use crate::error::UsageError;
use crate::record::{AsyncKind, AsyncRecord, Record, ResultRecord, StreamKind, StreamRecord};
use crate::result::MiResult;
use crate::value::{ListItems, Value};

const RESERVED_KEYS: [&str; 3] = ["class", "type", "token"];

/// A record's projection into the canonical dictionary/list/string form.
/// Stream, Async, and Result records project into a JSON-shaped object;
/// Termination projects into a dedicated sentinel (see [`Termination`])
/// rather than a `Json`, since it carries no payload to shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Stream(Json),
    Async(Json),
    Result(Json),
    Termination(Termination),
}

/// Compares equal to the literal string `"(gdb)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Termination;

impl PartialEq<str> for Termination {
    fn eq(&self, other: &str) -> bool {
        other == "(gdb)"
    }
}

impl PartialEq<&str> for Termination {
    fn eq(&self, other: &&str) -> bool {
        *other == "(gdb)"
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(gdb)")
    }
}

/// Project a [`Record`] into its [`Native`] form.
pub fn as_native(record: &Record) -> Native {
    match record {
        Record::Stream(s) => Native::Stream(stream_native(s)),
        Record::Async(a) => Native::Async(async_native(a)),
        Record::Result(r) => Native::Result(result_native(r)),
        Record::Termination => Native::Termination(Termination),
    }
}

fn stream_native(s: &StreamRecord) -> Json {
    Json::Object(Map::from_iter([
        ("type".to_string(), Json::String(stream_kind_name(s.kind).to_string())),
        ("value".to_string(), Json::String(s.value.clone())),
    ]))
}

fn async_native(a: &AsyncRecord) -> Json {
    let mut map = fold_results(&a.results);
    rename_reserved(&mut map);
    map.insert("class".to_string(), Json::String(a.class.clone()));
    map.insert("type".to_string(), Json::String(async_kind_name(a.kind).to_string()));
    map.insert("token".to_string(), token_json(a.token));
    Json::Object(map)
}

fn result_native(r: &ResultRecord) -> Json {
    let mut map = fold_results(&r.results);
    rename_reserved(&mut map);
    map.insert("class".to_string(), Json::String(r.class.clone()));
    map.insert("type".to_string(), Json::String("Result".to_string()));
    map.insert("token".to_string(), token_json(r.token));
    Json::Object(map)
}

fn stream_kind_name(kind: StreamKind) -> &'static str {
    match kind {
        StreamKind::Console => "Console",
        StreamKind::Target => "Target",
        StreamKind::Log => "Log",
    }
}

fn async_kind_name(kind: AsyncKind) -> &'static str {
    match kind {
        AsyncKind::Exec => "Exec",
        AsyncKind::Status => "Status",
        AsyncKind::Notify => "Notify",
    }
}

fn token_json(token: Option<u64>) -> Json {
    match token {
        Some(t) => Json::Number(t.into()),
        None => Json::Null,
    }
}

fn value_native(value: &Value) -> Json {
    match value {
        Value::CString(s) => Json::String(s.clone()),
        Value::Tuple(results) => Json::Object(fold_results(results)),
        Value::List(items) => match items {
            ListItems::Empty => Json::Array(Vec::new()),
            ListItems::Values(values) => Json::Array(values.iter().map(value_native).collect()),
            ListItems::Results(results) => Json::Object(fold_results(results)),
        },
    }
}

/// Fold an ordered sequence of results into an ordered mapping. Duplicate
/// keys accumulate in original order: the first collision turns the slot
/// into a sequence; subsequent collisions append.
fn fold_results(results: &[MiResult]) -> Map<String, Json> {
    let mut map = Map::new();
    for r in results {
        let value = value_native(&r.value);
        match map.get_mut(&r.name) {
            None => {
                map.insert(r.name.clone(), value);
            }
            Some(existing) => {
                if let Json::Array(arr) = existing {
                    arr.push(value);
                } else {
                    let previous = std::mem::replace(existing, Json::Null);
                    *existing = Json::Array(vec![previous, value]);
                }
            }
        }
    }
    map
}

/// Rename keys that collide with the envelope fields the projection injects
/// (`class`, `type`, `token`) with a leading underscore, so the envelope
/// insertion afterwards doesn't clobber user data.
fn rename_reserved(map: &mut Map<String, Json>) {
    for key in RESERVED_KEYS {
        if let Some(value) = map.remove(key) {
            map.insert(format!("_{key}"), value);
        }
    }
}

/// Filter argument accepted by the `is_stream`/`is_async`/`is_result`
/// classification predicates.
pub enum Filter<'a> {
    Any,
    One(&'a str),
    Many(&'a [&'a str]),
}

impl<'a> Filter<'a> {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Filter::Any => true,
            Filter::One(name) => *name == candidate,
            Filter::Many(names) => names.contains(&candidate),
        }
    }
}

impl<'a> From<&'a str> for Filter<'a> {
    fn from(name: &'a str) -> Self {
        Filter::One(name)
    }
}

impl<'a> From<&'a [&'a str]> for Filter<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Filter::Many(names)
    }
}

/// Classification predicates over a [`Record`], filtered by stream/async
/// kind or result class.
///
/// These return a `Result` for API parity with a classification filter
/// that could reject a filter shape the predicate doesn't accept; Rust's
/// static typing makes that class of mistake unrepresentable through
/// [`Filter`]'s constructors, so the `Err` side is unreachable here — an
/// async-class filter against a stream record is simply `false`, never an
/// error.
pub fn is_stream(record: &Record, filter: Filter) -> Result<bool, UsageError> {
    Ok(match record {
        Record::Stream(s) => filter.matches(stream_kind_name(s.kind)),
        _ => false,
    })
}

pub fn is_async(record: &Record, filter: Filter) -> Result<bool, UsageError> {
    Ok(match record {
        Record::Async(a) => filter.matches(async_kind_name(a.kind)),
        _ => false,
    })
}

pub fn is_result(record: &Record, filter: Filter) -> Result<bool, UsageError> {
    Ok(match record {
        Record::Result(r) => filter.matches(&r.class),
        _ => false,
    })
}
