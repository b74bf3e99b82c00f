//! Insertion-ordered set of values.

use crate::equal::same_value_zero;
use crate::types::Value;

/// Unique set of [`Value`]s.
///
/// Members keep insertion order and compare with [`same_value_zero`]. Equality
/// between two sets is membership equality.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    members: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|m| same_value_zero(m, value))
    }

    /// Adds `value`; returns `false` if it was already a member.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.members.push(value);
        true
    }

    /// Removes `value`; returns `true` if it was a member.
    pub fn remove(&mut self, value: &Value) -> bool {
        match self.members.iter().position(|m| same_value_zero(m, value)) {
            Some(i) => {
                self.members.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.members.iter()
    }

    /// Copies every member out, in insertion order.
    pub fn to_vec(&self) -> Vec<Value> {
        self.members.clone()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.members.iter().all(|m| other.contains(m))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_unique() {
        let mut set = ValueSet::new();
        assert!(set.insert(Value::from(1)));
        assert!(!set.insert(Value::from(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set: ValueSet = [Value::from(1), Value::from(2)].into_iter().collect();
        assert!(set.remove(&Value::from(1)));
        assert!(!set.remove(&Value::from(1)));
        assert_eq!(set.to_vec(), vec![Value::from(2)]);
    }

    #[test]
    fn test_from_iter_dedupes() {
        let set: ValueSet = [1, 2, 1, 3].into_iter().map(Value::from).collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: ValueSet = [1, 2].into_iter().map(Value::from).collect();
        let b: ValueSet = [2, 1].into_iter().map(Value::from).collect();
        assert_eq!(a, b);
    }
}
