//! Insertion-ordered key-value map keyed by arbitrary values.

use crate::equal::same_value_zero;
use crate::types::Value;

/// Key-value map with [`Value`] keys.
///
/// Entries keep insertion order; overwriting an existing key keeps its
/// position. Keys compare with [`same_value_zero`]. Equality between two maps
/// ignores order.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| same_value_zero(k, key))
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Copies every entry out, in insertion order.
    pub fn to_entries(&self) -> Vec<(Value, Value)> {
        self.entries.clone()
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|w| v == w))
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: i32) -> Value {
        Value::from(n)
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = ValueMap::new();
        assert_eq!(map.insert(Value::from("k"), v(5)), None);
        assert_eq!(map.get(&Value::from("k")), Some(&v(5)));
        assert_eq!(map.insert(Value::from("k"), v(9)), Some(v(5)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map: ValueMap = [(v(1), v(10)), (v(2), v(20))].into_iter().collect();
        map.insert(v(1), v(11));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![v(1), v(2)]);
    }

    #[test]
    fn test_remove() {
        let mut map: ValueMap = [(v(1), v(10)), (v(2), v(20))].into_iter().collect();
        assert_eq!(map.remove(&v(1)), Some(v(10)));
        assert_eq!(map.remove(&v(1)), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_nan_key() {
        let mut map = ValueMap::new();
        map.insert(Value::from(f64::NAN), v(1));
        assert!(map.contains_key(&Value::from(f64::NAN)));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: ValueMap = [(v(1), v(10)), (v(2), v(20))].into_iter().collect();
        let b: ValueMap = [(v(2), v(20)), (v(1), v(10))].into_iter().collect();
        let c: ValueMap = [(v(2), v(21)), (v(1), v(10))].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
