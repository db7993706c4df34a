//! Sentry event data structures
//!
//! Input shapes mirror the Sentry REST API (camelCase field names), output
//! shapes mirror what the tool prints.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key/value annotation attached to an event. Keys may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
            query: None,
        }
    }
}

/// One entry of `/issues/{id}/events/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEvent {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(rename = "dateCreated")]
    pub date_created: String,
}

/// `/projects/{org}/{project}/events/{id}/`
///
/// `dateReceived` and `context` are `Some` whenever the key was in the
/// response, even with a `null` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedEvent {
    #[serde(flatten)]
    pub event: IssueEvent,
    #[serde(
        rename = "dateReceived",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_received: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<Value>,
}

// Absent keys fall back to `default` (None), present ones keep their value, null included
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// An event in either of its two shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Issue(IssueEvent),
    Extended(ExtendedEvent),
}

impl Event {
    pub fn base(&self) -> &IssueEvent {
        match self {
            Event::Issue(event) => event,
            Event::Extended(extended) => &extended.event,
        }
    }

    pub fn event_id(&self) -> &str {
        &self.base().event_id
    }
}

impl From<IssueEvent> for Event {
    fn from(event: IssueEvent) -> Self {
        Event::Issue(event)
    }
}

impl From<ExtendedEvent> for Event {
    fn from(event: ExtendedEvent) -> Self {
        Event::Extended(event)
    }
}

/// A tag value: one occurrence stays a string, repeats become an array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Single(String),
    Multiple(Vec<String>),
}

impl TagValue {
    /// All values in encounter order
    pub fn values(&self) -> Vec<&str> {
        match self {
            TagValue::Single(value) => vec![value.as_str()],
            TagValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(single) => Some(TagValue::Single(single.clone())),
            Value::Array(values) => Some(TagValue::Multiple(
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// Tag mapping that keeps keys in first-encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Map<String, Value>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<TagValue> {
        self.entries.get(key).and_then(TagValue::from_json)
    }

    /// First value of a key is stored as a string, later ones turn it into an array
    pub(crate) fn append(&mut self, key: &str, value: String) {
        match self.entries.get_mut(key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                self.entries.insert(key.to_string(), Value::String(value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TagValue)> + '_ {
        self.entries
            .iter()
            .filter_map(|(k, v)| TagValue::from_json(v).map(|tag| (k.as_str(), tag)))
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Output record. `dateReceived` and `context` exist only for extended events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedEvent {
    pub date_created: String,
    pub tags: TagMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_received: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}
