use carnac_pointer::{format_pointer, Path};
use carnac_value::{Object, Value};
use serde_json::Map;

use crate::codec::{encode_mutator, encode_patch};
use crate::mutator::Mutator;
use crate::patch::Patch;

/// A change notification raised by a store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The state was mutated directly, outside the engines.
    Raw,
    Patch {
        /// Location of the patched object, relative to the root state.
        target: Path,
        patch: Patch,
        /// Inverse patch holding the prior values.
        old_values: Patch,
    },
    Perform {
        target: Path,
        mutation: Mutator,
        inverse: Mutator,
    },
    Computed {
        name: String,
        value: Value,
        old_value: Value,
    },
    Batch(BatchEvent),
    /// Caller-declared event.
    Custom { kind: String, data: Object },
}

impl StoreEvent {
    pub fn custom(kind: impl Into<String>) -> Self {
        StoreEvent::Custom {
            kind: kind.into(),
            data: Object::new(),
        }
    }

    /// Returns the event tag.
    pub fn kind(&self) -> &str {
        match self {
            StoreEvent::Raw => "raw",
            StoreEvent::Patch { .. } => "patch",
            StoreEvent::Perform { .. } => "perform",
            StoreEvent::Computed { .. } => "computed",
            StoreEvent::Batch(batch) => &batch.kind,
            StoreEvent::Custom { kind, .. } => kind,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, StoreEvent::Batch(_))
    }

    pub fn as_batch(&self) -> Option<&BatchEvent> {
        match self {
            StoreEvent::Batch(batch) => Some(batch),
            _ => None,
        }
    }

    /// Renders the event as a tagged JSON record, e.g.
    /// `{"type": "perform", "target": "", "mutation": {..}, "inverse": {..}}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut m = Map::new();
        m.insert("type".into(), self.kind().into());
        match self {
            StoreEvent::Raw => {}
            StoreEvent::Patch {
                target,
                patch,
                old_values,
            } => {
                m.insert("target".into(), format_pointer(target).into());
                m.insert("patch".into(), encode_patch(patch));
                m.insert("oldValues".into(), encode_patch(old_values));
            }
            StoreEvent::Perform {
                target,
                mutation,
                inverse,
            } => {
                m.insert("target".into(), format_pointer(target).into());
                m.insert("mutation".into(), encode_mutator(mutation));
                m.insert("inverse".into(), encode_mutator(inverse));
            }
            StoreEvent::Computed {
                name,
                value,
                old_value,
            } => {
                m.insert("name".into(), name.as_str().into());
                m.insert("value".into(), value.to_json());
                m.insert("oldValue".into(), old_value.to_json());
            }
            StoreEvent::Batch(batch) => {
                for (k, v) in &batch.data {
                    if k != "type" && k != "events" {
                        m.insert(k.clone(), v.to_json());
                    }
                }
                m.insert(
                    "events".into(),
                    serde_json::Value::Array(batch.events.iter().map(StoreEvent::to_json).collect()),
                );
            }
            StoreEvent::Custom { data, .. } => {
                for (k, v) in data {
                    if k != "type" {
                        m.insert(k.clone(), v.to_json());
                    }
                }
            }
        }
        serde_json::Value::Object(m)
    }
}

/// Composite event carrying everything raised inside a batch scope.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvent {
    /// `"batch"` unless the scope overrode it.
    pub kind: String,
    /// Extra fields returned by the scope.
    pub data: Object,
    /// Events raised during the scope, in order. Nested batches appear as
    /// one event each.
    pub events: Vec<StoreEvent>,
}

impl BatchEvent {
    pub fn new(events: Vec<StoreEvent>) -> Self {
        Self {
            kind: "batch".into(),
            data: Object::new(),
            events,
        }
    }

    /// Merges fields returned by a batch scope. The scope may override the
    /// tag and add data, but never replaces the collected events.
    ///
    /// A string `type` in the data retags the event unless an explicit kind
    /// was given. Any other `type` value is dropped with a warning.
    pub fn merge(&mut self, fields: EventFields) {
        let EventFields { kind, mut data } = fields;
        match data.shift_remove("type") {
            Some(Value::String(tag)) if kind.is_none() => self.kind = tag,
            Some(Value::String(_)) | None => {}
            Some(other) => {
                tracing::warn!(value = ?other, "ignoring non-string batch event type");
            }
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if data.shift_remove("events").is_some() {
            tracing::warn!("batch scope fields cannot replace the collected events");
        }
        self.data.extend(data);
    }
}

/// Fields a batch scope can return to customize its composite event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFields {
    pub kind: Option<String>,
    pub data: Object,
}

impl EventFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Return type of a batch scope: `()` or the fields of a custom event.
pub trait IntoEventFields {
    fn into_event_fields(self) -> Option<EventFields>;
}

impl IntoEventFields for () {
    fn into_event_fields(self) -> Option<EventFields> {
        None
    }
}

impl IntoEventFields for EventFields {
    fn into_event_fields(self) -> Option<EventFields> {
        Some(self)
    }
}

impl IntoEventFields for Option<EventFields> {
    fn into_event_fields(self) -> Option<EventFields> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutator::Op;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn test_kinds() {
        assert_eq!(StoreEvent::Raw.kind(), "raw");
        assert_eq!(StoreEvent::custom("test").kind(), "test");
        assert_eq!(StoreEvent::Batch(BatchEvent::new(vec![])).kind(), "batch");
    }

    #[test]
    fn test_merge_keeps_events() {
        let mut batch = BatchEvent::new(vec![StoreEvent::Raw]);
        batch.merge(
            EventFields::new()
                .kind("testEvent")
                .with("data", "custom")
                .with("events", 3),
        );
        let evt = StoreEvent::Batch(batch);
        assert_eq!(
            evt.to_json(),
            json!({"type": "testEvent", "data": "custom", "events": [{"type": "raw"}]})
        );
    }

    #[test]
    fn test_type_in_data_retags_batch() {
        let mut batch = BatchEvent::new(vec![StoreEvent::Raw]);
        batch.merge(EventFields::new().with("type", "x").with("n", 1));
        assert_eq!(batch.kind, "x");
        assert_eq!(
            StoreEvent::Batch(batch).to_json(),
            json!({"type": "x", "n": 1, "events": [{"type": "raw"}]})
        );
    }

    #[test]
    fn test_explicit_kind_beats_type_in_data() {
        let mut batch = BatchEvent::new(vec![]);
        batch.merge(EventFields::new().kind("explicit").with("type", "data"));
        assert_eq!(batch.kind, "explicit");
        assert!(batch.data.is_empty());
    }

    #[test]
    #[traced_test]
    fn test_non_string_type_is_reported() {
        let mut batch = BatchEvent::new(vec![]);
        batch.merge(EventFields::new().with("type", 3));
        assert_eq!(batch.kind, "batch");
        assert!(batch.data.is_empty());
        assert!(logs_contain("non-string batch event type"));
    }

    #[test]
    fn test_perform_event_json() {
        let evt = StoreEvent::Perform {
            target: vec![],
            mutation: Mutator::field("arr", Op::Push(vec![Value::from(4), Value::from(5)])),
            inverse: Mutator::field("arr", Op::splice(0, 2, vec![])),
        };
        assert_eq!(
            evt.to_json(),
            json!({
                "type": "perform",
                "target": "",
                "mutation": {"arr": {"push": [4, 5]}},
                "inverse": {"arr": {"splice": [0, 2]}},
            })
        );
    }
}
