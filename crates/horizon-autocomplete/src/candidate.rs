//! Suggestion data: raw source items and normalized candidates.
//!
//! Sources may hand back bare strings, scalars, or records with any mix of
//! `label`/`value` fields. [`normalize`] turns such a sequence into a
//! [`CandidateList`] where every entry has both fields populated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LABEL: &str = "label";
const VALUE: &str = "value";

/// One suggestion as produced by a source, before normalization.
///
/// This is a thin wrapper over a JSON value so that remote payloads can be
/// decoded without a fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawItem(Value);

impl RawItem {
    /// A bare string suggestion.
    pub fn text(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }

    /// A record with both a display label and an underlying value.
    pub fn record(label: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(LABEL.to_owned(), Value::String(label.into()));
        map.insert(VALUE.to_owned(), Value::String(value.into()));
        Self(Value::Object(map))
    }

    /// Wrap an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The text a fixed list matches queries against: the label, else the
    /// value, else the item itself when it is a scalar.
    pub fn match_text(&self) -> Option<String> {
        match &self.0 {
            Value::Object(map) => field_text(map, LABEL).or_else(|| field_text(map, VALUE)),
            other => scalar_text(other),
        }
    }

    /// Whether the item is a record whose `label` and `value` are both set.
    pub fn has_label_and_value(&self) -> bool {
        match &self.0 {
            Value::Object(map) => {
                field_text(map, LABEL).is_some() && field_text(map, VALUE).is_some()
            }
            _ => false,
        }
    }

    /// Convert, filling a missing `label` or `value` from its counterpart.
    ///
    /// Records with neither field, nulls and arrays yield `None`.
    pub fn into_candidate(self) -> Option<Candidate> {
        match self.0 {
            Value::Object(mut map) => {
                let label = field_text(&map, LABEL);
                let value = field_text(&map, VALUE);
                let (label, value) = match (label, value) {
                    (Some(label), Some(value)) => (label, value),
                    (Some(label), None) => (label.clone(), label),
                    (None, Some(value)) => (value.clone(), value),
                    (None, None) => return None,
                };
                map.remove(LABEL);
                map.remove(VALUE);
                Some(Candidate { label, value, extra: map })
            }
            other => scalar_text(&other).map(Candidate::from_text),
        }
    }

    /// Convert without repairing missing fields; they become empty strings.
    fn into_candidate_as_is(self) -> Option<Candidate> {
        match self.0 {
            Value::Object(mut map) => {
                let label = field_text(&map, LABEL).unwrap_or_default();
                let value = field_text(&map, VALUE).unwrap_or_default();
                map.remove(LABEL);
                map.remove(VALUE);
                Some(Candidate { label, value, extra: map })
            }
            other => scalar_text(&other).map(Candidate::from_text),
        }
    }
}

impl From<&str> for RawItem {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for RawItem {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Candidate> for RawItem {
    fn from(candidate: Candidate) -> Self {
        let mut map = candidate.extra;
        map.insert(LABEL.to_owned(), Value::String(candidate.label));
        map.insert(VALUE.to_owned(), Value::String(candidate.value));
        Self(Value::Object(map))
    }
}

/// A normalized suggestion with a display label and an underlying value.
///
/// Fields of the raw record other than `label` and `value` are kept in
/// [`extra`](Self::extra) and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Text shown in the menu row.
    pub label: String,
    /// Text written into the field when the candidate is selected.
    pub value: String,
    /// Passthrough fields from the raw item.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Create a candidate with distinct label and value.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }

    /// Create a candidate whose label and value are the same text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// Attach a passthrough field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Look up a passthrough field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// The candidates produced by one lookup round.
pub type CandidateList = Vec<Candidate>;

/// Normalize raw source output into candidates.
///
/// If the first item already carries both `label` and `value`, the whole
/// sequence is taken as well-formed and converted as-is; later items are not
/// repaired. Otherwise every item is converted with
/// [`RawItem::into_candidate`].
pub fn normalize(items: Vec<RawItem>) -> CandidateList {
    if items.first().is_some_and(RawItem::has_label_and_value) {
        items
            .into_iter()
            .filter_map(RawItem::into_candidate_as_is)
            .collect()
    } else {
        items
            .into_iter()
            .filter_map(RawItem::into_candidate)
            .collect()
    }
}

/// An empty `label` or `value` field counts as missing.
fn field_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(scalar_text)
        .filter(|text| !text.is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
