//! Patch engine: recursive deep assignment with inverse capture.
//!
//! A [`Patch`] mirrors a subset of the state tree. Leaf entries replace the
//! target value, nested entries recurse when the target is an object too, and
//! [`PatchEntry::Remove`] deletes a key. The inverse of applying a patch is a
//! patch of the same shape holding the prior values; keys that did not exist
//! before are recorded as removals so the round trip is exact.

use carnac_value::{Object, Value};
use indexmap::IndexMap;

/// One key of a [`Patch`].
#[derive(Debug, Clone, PartialEq)]
pub enum PatchEntry {
    /// Replace the target value.
    Assign(Value),
    /// Merge into the target when it is an object, replace it otherwise.
    Nested(Patch),
    /// Delete the key.
    Remove,
}

impl From<Value> for PatchEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(obj) => PatchEntry::Nested(Patch::from(obj)),
            other => PatchEntry::Assign(other),
        }
    }
}

/// A partial mapping applied over an [`Object`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: IndexMap<String, PatchEntry>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value entry. Object values become nested patches.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, PatchEntry::from(value.into()));
        self
    }

    pub fn nested(mut self, key: impl Into<String>, patch: Patch) -> Self {
        self.insert(key, PatchEntry::Nested(patch));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.insert(key, PatchEntry::Remove);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: PatchEntry) -> Option<PatchEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn get(&self, key: &str) -> Option<&PatchEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, PatchEntry> {
        self.entries.iter()
    }

    /// Converts to a plain object, dropping removals.
    pub fn to_object(&self) -> Object {
        self.entries
            .iter()
            .filter_map(|(key, entry)| {
                let value = match entry {
                    PatchEntry::Assign(v) => v.clone(),
                    PatchEntry::Nested(p) => Value::Object(p.to_object()),
                    PatchEntry::Remove => return None,
                };
                Some((key.clone(), value))
            })
            .collect()
    }
}

impl From<Object> for Patch {
    fn from(obj: Object) -> Self {
        Self {
            entries: obj
                .into_iter()
                .map(|(k, v)| (k, PatchEntry::from(v)))
                .collect(),
        }
    }
}

impl FromIterator<(String, PatchEntry)> for Patch {
    fn from_iter<T: IntoIterator<Item = (String, PatchEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = (&'a String, &'a PatchEntry);
    type IntoIter = indexmap::map::Iter<'a, String, PatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn previous(old: Option<Value>) -> PatchEntry {
    old.map_or(PatchEntry::Remove, PatchEntry::from)
}

/// Applies `patch` to `target` in place and returns the inverse patch.
///
/// Missing keys are created. The target is never partially merged into a
/// non-object: a nested entry over a primitive or collection replaces it.
///
/// # Example
///
/// ```
/// use carnac::{apply_patch, Patch};
/// use carnac_value::Value;
/// use serde_json::json;
///
/// let mut state = Value::from(json!({"a": 1, "foo": {"bar": "baz"}}));
/// let target = state.as_object_mut().unwrap();
///
/// let patch = Patch::new().set("a", 2).nested("foo", Patch::new().set("bar", "qux"));
/// let inverse = apply_patch(target, &patch);
/// assert_eq!(inverse, Patch::new().set("a", 1).nested("foo", Patch::new().set("bar", "baz")));
///
/// apply_patch(target, &inverse);
/// assert_eq!(state, Value::from(json!({"a": 1, "foo": {"bar": "baz"}})));
/// ```
pub fn apply_patch(target: &mut Object, patch: &Patch) -> Patch {
    let mut inverse = Patch::new();
    for (key, entry) in patch {
        let old = match entry {
            PatchEntry::Remove => previous(target.shift_remove(key)),
            PatchEntry::Nested(inner) => match target.get_mut(key) {
                Some(Value::Object(child)) => PatchEntry::Nested(apply_patch(child, inner)),
                _ => previous(target.insert(key.clone(), Value::Object(inner.to_object()))),
            },
            PatchEntry::Assign(Value::Object(obj)) => match target.get_mut(key) {
                Some(Value::Object(child)) => {
                    PatchEntry::Nested(apply_patch(child, &Patch::from(obj.clone())))
                }
                _ => previous(target.insert(key.clone(), Value::Object(obj.clone()))),
            },
            PatchEntry::Assign(value) => previous(target.insert(key.clone(), value.clone())),
        };
        inverse.insert(key.clone(), old);
    }
    inverse
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: serde_json::Value) -> Object {
        match Value::from(v) {
            Value::Object(obj) => obj,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_assignment() {
        let mut target = object(json!({"a": 1}));
        let inverse = apply_patch(&mut target, &Patch::new().set("a", 2));
        assert_eq!(target, object(json!({"a": 2})));
        assert_eq!(inverse, Patch::new().set("a", 1));
    }

    #[test]
    fn test_missing_key_is_created_and_inverse_removes_it() {
        let mut target = object(json!({"a": 1}));
        let inverse = apply_patch(&mut target, &Patch::new().set("b", true));
        assert_eq!(target, object(json!({"a": 1, "b": true})));
        assert_eq!(inverse, Patch::new().remove("b"));
        apply_patch(&mut target, &inverse);
        assert_eq!(target, object(json!({"a": 1})));
    }

    #[test]
    fn test_nested_recursion_keeps_siblings() {
        let mut target = object(json!({"foo": {"bar": "baz", "keep": 1}}));
        let inverse = apply_patch(&mut target, &Patch::from(object(json!({"foo": {"bar": "x"}}))));
        assert_eq!(target, object(json!({"foo": {"bar": "x", "keep": 1}})));
        assert_eq!(inverse, Patch::new().nested("foo", Patch::new().set("bar", "baz")));
    }

    #[test]
    fn test_nested_over_primitive_replaces() {
        let mut target = object(json!({"foo": 5}));
        let inverse = apply_patch(&mut target, &Patch::new().nested("foo", Patch::new().set("x", 1)));
        assert_eq!(target, object(json!({"foo": {"x": 1}})));
        assert_eq!(inverse, Patch::new().set("foo", 5));
        apply_patch(&mut target, &inverse);
        assert_eq!(target, object(json!({"foo": 5})));
    }

    #[test]
    fn test_primitive_over_object_replaces() {
        let mut target = object(json!({"foo": {"x": 1}}));
        let inverse = apply_patch(&mut target, &Patch::new().set("foo", "flat"));
        assert_eq!(target, object(json!({"foo": "flat"})));
        apply_patch(&mut target, &inverse);
        assert_eq!(target, object(json!({"foo": {"x": 1}})));
    }

    #[test]
    fn test_raw_object_assign_merges() {
        let mut target = object(json!({"foo": {"x": 1, "y": 2}}));
        let mut patch = Patch::new();
        patch.insert("foo", PatchEntry::Assign(Value::from(json!({"x": 3}))));
        let inverse = apply_patch(&mut target, &patch);
        assert_eq!(target, object(json!({"foo": {"x": 3, "y": 2}})));
        assert_eq!(inverse, Patch::new().nested("foo", Patch::new().set("x", 1)));
    }

    #[test]
    fn test_remove_entry() {
        let mut target = object(json!({"a": 1, "b": 2}));
        let inverse = apply_patch(&mut target, &Patch::new().remove("a").remove("zz"));
        assert_eq!(target, object(json!({"b": 2})));
        assert_eq!(inverse, Patch::new().set("a", 1).remove("zz"));
    }

    #[test]
    fn test_to_object_drops_removals() {
        let patch = Patch::new()
            .set("a", 1)
            .remove("b")
            .nested("c", Patch::new().remove("d").set("e", "f"));
        assert_eq!(patch.to_object(), object(json!({"a": 1, "c": {"e": "f"}})));
    }

    #[test]
    fn test_empty_patch() {
        let mut target = object(json!({"a": 1}));
        let inverse = apply_patch(&mut target, &Patch::new());
        assert!(inverse.is_empty());
        assert_eq!(target, object(json!({"a": 1})));
    }
}
