//! Key-value map operations and their inverses.

use carnac_value::ValueMap;

use crate::mutator::{Mutator, MutationResult, Op, OpResult};

pub(super) fn perform(target: &mut ValueMap, op: &Op) -> (MutationResult, Mutator) {
    let (result, inverse) = match op {
        Op::Set { key, value } => {
            let inverse = match target.insert(key.clone(), value.clone()) {
                Some(previous) => Mutator::Op(Op::Set {
                    key: key.clone(),
                    value: previous,
                }),
                None => Mutator::Op(Op::Delete(key.clone())),
            };
            (OpResult::Target, inverse)
        }
        Op::Delete(key) => match target.remove(key) {
            Some(previous) => (
                OpResult::Deleted(true),
                Mutator::Op(Op::Set {
                    key: key.clone(),
                    value: previous,
                }),
            ),
            None => (OpResult::Deleted(false), Mutator::Op(Op::Delete(key.clone()))),
        },
        Op::Clear => {
            let entries = target.to_entries();
            target.clear();
            (OpResult::Cleared, Mutator::Op(Op::RestoreEntries(entries)))
        }
        Op::RestoreEntries(entries) => {
            let inverse = if target.is_empty() {
                Mutator::Op(Op::Clear)
            } else {
                Mutator::chain([Op::Clear, Op::RestoreEntries(target.to_entries())])
            };
            for (k, v) in entries {
                target.insert(k.clone(), v.clone());
            }
            (OpResult::Target, inverse)
        }
        other => {
            tracing::warn!(op = other.name(), "map mutation called with invalid operation");
            return (MutationResult::Skipped, Mutator::noop());
        }
    };
    (MutationResult::Op(result), inverse)
}
