//! Mutation engine: applies a [`Mutator`] to a state tree node and
//! synthesizes the inverse.
//!
//! Dispatch classifies the target once per recursion level with
//! [`Value::collection_kind`] and routes to one operator module per
//! collection kind. Mismatches never fail the call: they are reported with
//! `tracing::warn!` and yield [`MutationResult::Skipped`] with a no-op
//! inverse.

mod array;
mod map;
mod set;

use carnac_value::{CollectionKind, Object, Value};
use indexmap::IndexMap;

use crate::mutator::{Mutator, MutationResult, Op};

fn skipped() -> (MutationResult, Mutator) {
    (MutationResult::Skipped, Mutator::noop())
}

/// Applies `mutator` to `target` in place.
///
/// Returns the operation results, shaped like `mutator`, and an inverse that
/// restores `target` to its prior value when applied to the mutated target.
///
/// # Example
///
/// ```
/// use carnac::{perform_mutation, Mutator, Op};
/// use carnac_value::Value;
/// use serde_json::json;
///
/// let mut state = Value::from(json!({"arr": []}));
/// let mutator = Mutator::field("arr", Op::Push(vec![Value::from(1), Value::from(2)]));
///
/// let (_, inverse) = perform_mutation(&mut state, &mutator);
/// assert_eq!(state, Value::from(json!({"arr": [1, 2]})));
///
/// perform_mutation(&mut state, &inverse);
/// assert_eq!(state, Value::from(json!({"arr": []})));
/// ```
pub fn perform_mutation(target: &mut Value, mutator: &Mutator) -> (MutationResult, Mutator) {
    match mutator {
        Mutator::Chain(steps) => {
            let mut results = Vec::with_capacity(steps.len());
            let mut inverses = Vec::with_capacity(steps.len());
            for step in steps {
                let (result, inverse) = perform_mutation(target, step);
                results.push(result);
                inverses.push(inverse);
            }
            inverses.reverse();
            (MutationResult::Chain(results), Mutator::Chain(inverses))
        }
        Mutator::Fields(fields) => perform_fields(target, fields),
        Mutator::Op(op) => perform_op(target, op),
    }
}

/// Applies `mutator` to a plain mapping in place, without wrapping it in a
/// [`Value`].
///
/// A panic raised by an operation (a caller comparator, say) leaves every
/// key of `target` in place.
pub fn perform_object_mutation(target: &mut Object, mutator: &Mutator) -> (MutationResult, Mutator) {
    match mutator {
        Mutator::Chain(steps) => {
            let mut results = Vec::with_capacity(steps.len());
            let mut inverses = Vec::with_capacity(steps.len());
            for step in steps {
                let (result, inverse) = perform_object_mutation(target, step);
                results.push(result);
                inverses.push(inverse);
            }
            inverses.reverse();
            (MutationResult::Chain(results), Mutator::Chain(inverses))
        }
        Mutator::Fields(fields) => perform_object_fields(target, fields),
        Mutator::Op(op) => {
            tracing::warn!(
                op = op.name(),
                kind = %CollectionKind::PlainMapping,
                "operation does not apply to collection kind"
            );
            skipped()
        }
    }
}

fn perform_object_fields(obj: &mut Object, fields: &IndexMap<String, Mutator>) -> (MutationResult, Mutator) {
    let mut results = IndexMap::with_capacity(fields.len());
    let mut inverses = IndexMap::with_capacity(fields.len());
    for (key, mutator) in fields {
        let (result, inverse) = match obj.get_mut(key) {
            Some(child) => perform_mutation(child, mutator),
            None => {
                tracing::warn!(key = %key, "unhandled collection mutation: no value at key");
                skipped()
            }
        };
        results.insert(key.clone(), result);
        inverses.insert(key.clone(), inverse);
    }
    (MutationResult::Fields(results), Mutator::Fields(inverses))
}

fn perform_fields(target: &mut Value, fields: &IndexMap<String, Mutator>) -> (MutationResult, Mutator) {
    match target {
        Value::Object(obj) => perform_object_fields(obj, fields),
        Value::Array(arr) => {
            if let Some(key) = fields.keys().find(|k| k.parse::<usize>().is_err()) {
                tracing::warn!(key = %key, "sequence mutation called with non-index key");
                return skipped();
            }
            let len = arr.len();
            let mut results = IndexMap::with_capacity(fields.len());
            let mut inverses = IndexMap::with_capacity(fields.len());
            for (key, mutator) in fields {
                let child = key.parse::<usize>().ok().and_then(|i| arr.get_mut(i));
                let (result, inverse) = match child {
                    Some(child) => perform_mutation(child, mutator),
                    None => {
                        tracing::warn!(index = %key, len, "unhandled collection mutation: index out of range");
                        skipped()
                    }
                };
                results.insert(key.clone(), result);
                inverses.insert(key.clone(), inverse);
            }
            (MutationResult::Fields(results), Mutator::Fields(inverses))
        }
        other => {
            tracing::warn!(kind = other.type_name(), "nested mutator applied to a value without fields");
            skipped()
        }
    }
}

fn perform_op(target: &mut Value, op: &Op) -> (MutationResult, Mutator) {
    let Some(kind) = target.collection_kind() else {
        tracing::warn!(op = op.name(), kind = target.type_name(), "unhandled collection mutation");
        return skipped();
    };
    if !op.applies_to(kind) {
        tracing::warn!(op = op.name(), kind = %kind, "operation does not apply to collection kind");
        return skipped();
    }
    match (kind, target) {
        (CollectionKind::Sequence, Value::Array(arr)) => array::perform(arr, op),
        (CollectionKind::Map, Value::Map(map)) => map::perform(map, op),
        (CollectionKind::Set, Value::Set(set)) => set::perform(set, op),
        _ => skipped(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutator::OpResult;
    use carnac_value::{ValueMap, ValueSet};
    use serde_json::json;
    use tracing_test::traced_test;

    fn state() -> Value {
        let mut state = Value::from(json!({"arr": [], "foo": {"arr": [1, 2, 3]}}));
        let obj = state.as_object_mut().unwrap();
        obj.insert("map".into(), Value::Map(ValueMap::new()));
        obj.insert("set".into(), Value::Set(ValueSet::new()));
        state
    }

    #[test]
    fn test_chain_inverse_is_reversed() {
        let mut target = Value::Array(vec![]);
        let mutator = Mutator::chain([Op::Push(vec![Value::from(1)]), Op::Pop]);
        let (result, inverse) = perform_mutation(&mut target, &mutator);
        assert_eq!(
            result,
            MutationResult::Chain(vec![
                MutationResult::Op(OpResult::Length(1)),
                MutationResult::Op(OpResult::Removed(Some(Value::from(1)))),
            ])
        );
        assert_eq!(
            inverse,
            Mutator::chain([Op::Push(vec![Value::from(1)]), Op::splice(0, 1, vec![])])
        );
        perform_mutation(&mut target, &inverse);
        assert_eq!(target, Value::Array(vec![]));
    }

    #[test]
    fn test_nested_fields() {
        let mut target = state();
        let mutator = Mutator::field("foo", Mutator::field("arr", Op::Push(vec![Value::from(4)])));
        let (_, inverse) = perform_mutation(&mut target, &mutator);
        assert_eq!(target["foo"]["arr"], Value::from(json!([1, 2, 3, 4])));
        assert_eq!(
            inverse,
            Mutator::field("foo", Mutator::field("arr", Op::splice(3, 1, vec![])))
        );
    }

    #[test]
    fn test_index_style_mutator_on_sequence() {
        let mut target = Value::from(json!([[1], [2]]));
        let mutator = Mutator::field("1", Op::Push(vec![Value::from(3)]));
        let (result, inverse) = perform_mutation(&mut target, &mutator);
        assert_eq!(target, Value::from(json!([[1], [2, 3]])));
        assert_eq!(result.get("1"), Some(&MutationResult::Op(OpResult::Length(2))));
        perform_mutation(&mut target, &inverse);
        assert_eq!(target, Value::from(json!([[1], [2]])));
    }

    #[test]
    #[traced_test]
    fn test_map_op_on_sequence_is_reported() {
        let mut target = Value::Array(vec![Value::from(1)]);
        let (result, inverse) = perform_mutation(&mut target, &Mutator::from(Op::set("k", 1)));
        assert_eq!(result, MutationResult::Skipped);
        assert!(inverse.is_noop());
        assert_eq!(target, Value::Array(vec![Value::from(1)]));
        assert!(logs_contain("operation does not apply to collection kind"));
    }

    #[test]
    #[traced_test]
    fn test_missing_key_is_reported() {
        let mut target = state();
        let (result, inverse) = perform_mutation(&mut target, &Mutator::field("nope", Op::Pop));
        assert_eq!(result.get("nope"), Some(&MutationResult::Skipped));
        assert_eq!(inverse, Mutator::field("nope", Mutator::noop()));
        assert!(logs_contain("no value at key"));
    }

    #[test]
    #[traced_test]
    fn test_non_index_fields_on_sequence_are_reported() {
        let mut target = Value::from(json!([1, 2]));
        let (result, _) = perform_mutation(&mut target, &Mutator::field("length", Op::Pop));
        assert_eq!(result, MutationResult::Skipped);
        assert!(logs_contain("non-index key"));
    }

    #[test]
    #[traced_test]
    fn test_op_on_primitive_is_reported() {
        let mut target = Value::from(json!({"n": 1}));
        let (result, _) = perform_mutation(&mut target, &Mutator::field("n", Op::Pop));
        assert_eq!(result.get("n"), Some(&MutationResult::Skipped));
        assert_eq!(target, Value::from(json!({"n": 1})));
        assert!(logs_contain("unhandled collection mutation"));
    }

    #[test]
    fn test_plain_mapping_rejects_ops() {
        let mut target = state();
        let (result, _) = perform_mutation(&mut target, &Mutator::from(Op::Clear));
        assert_eq!(result, MutationResult::Skipped);
    }
}
