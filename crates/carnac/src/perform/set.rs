//! Unique set operations and their inverses.

use carnac_value::ValueSet;

use crate::mutator::{Mutator, MutationResult, Op, OpResult};

pub(super) fn perform(target: &mut ValueSet, op: &Op) -> (MutationResult, Mutator) {
    let (result, inverse) = match op {
        Op::Add(value) => {
            let inverse = if target.insert(value.clone()) {
                Op::Delete(value.clone())
            } else {
                Op::Add(value.clone())
            };
            (OpResult::Target, Mutator::Op(inverse))
        }
        Op::Delete(value) => {
            let removed = target.remove(value);
            let inverse = if removed {
                Op::Add(value.clone())
            } else {
                Op::Delete(value.clone())
            };
            (OpResult::Deleted(removed), Mutator::Op(inverse))
        }
        Op::Clear => {
            let members = target.to_vec();
            target.clear();
            (OpResult::Cleared, Mutator::Op(Op::RestoreMembers(members)))
        }
        Op::RestoreMembers(members) => {
            let inverse = if target.is_empty() {
                Mutator::Op(Op::Clear)
            } else {
                Mutator::chain([Op::Clear, Op::RestoreMembers(target.to_vec())])
            };
            for member in members {
                target.insert(member.clone());
            }
            (OpResult::Target, inverse)
        }
        other => {
            tracing::warn!(op = other.name(), "set mutation called with invalid operation");
            return (MutationResult::Skipped, Mutator::noop());
        }
    };
    (MutationResult::Op(result), inverse)
}
