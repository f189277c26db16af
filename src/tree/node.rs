//! Entity node types as served by the tree endpoint.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One entity in the hierarchy (rocket, stage, engine, ...).
///
/// A node and all of its descendants arrive in a single response and are
/// replaced wholesale on the next search. `id` is only unique within one
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Slash-delimited ancestor chain, e.g. `/Rocket/Stage1`. Empty when the
    /// server omitted it.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub path: String,
    #[serde(default, deserialize_with = "deserialize_properties")]
    pub properties: BTreeMap<String, PropertyValue>,
    /// Display order; never re-sorted.
    #[serde(default)]
    pub descendants: Vec<Node>,
    #[serde(default, deserialize_with = "deserialize_created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Node {
    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.descendants.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// Property value: numeric or free text.
///
/// The backend stores typed attributes (`int`, `flt`, `str`), but older
/// servers send every value as a string. Anything that is neither a number
/// nor a string is kept as its raw JSON text so that rendering never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Numeric interpretation of the value.
    ///
    /// Text that parses as a finite float counts as numeric; any other text
    /// yields `None` so comparisons against it are simply false.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) if n.is_finite() => Some(*n),
            PropertyValue::Number(_) => None,
            PropertyValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => PropertyValue::Number(f),
                None => PropertyValue::Text(n.to_string()),
            },
            Value::String(s) => PropertyValue::Text(s),
            other => PropertyValue::Text(other.to_string()),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(PropertyValue::from)
    }
}

fn deserialize_nullable_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts either a JSON object (`{"ISP": 12.1}`) or the attribute-list form
/// the entity API emits (`[{"ISP": 12.1}, {"Thrust": 9.4}]`). Null and
/// unexpected shapes produce an empty map.
fn deserialize_properties<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, PropertyValue>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let properties = match raw {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| (k, PropertyValue::from(v)))
            .collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .flatten()
            .map(|(k, v)| (k, PropertyValue::from(v)))
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(properties)
}

fn deserialize_created_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

/// Parse an RFC 3339 string, a naive ISO timestamp (taken as UTC), or epoch
/// milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Strip exactly one leading `/` from a search query.
pub fn normalize_query(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Parent of a normalized path, or `None` when nothing remains.
///
/// `Rocket/Stage1/Engine1` -> `Rocket/Stage1`; `Rocket` -> `None`.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind('/')
        .map(|idx| &path[..idx])
        .filter(|parent| !parent.is_empty())
}

/// Join a parent path and a child name.
pub fn child_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}
