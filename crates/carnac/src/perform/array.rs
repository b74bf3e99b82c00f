//! Sequence operations and their inverses.

use carnac_value::{total_cmp, Value};

use crate::mutator::{Mutator, MutationResult, Op, OpResult};

/// Resolves a possibly negative bound against `len`.
fn relative_index(index: i64, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs() as usize)
    } else {
        (index as usize).min(len)
    }
}

fn done(result: OpResult, inverse: Op) -> (MutationResult, Mutator) {
    (MutationResult::Op(result), Mutator::Op(inverse))
}

/// Applies a sequence operation. Inverses use normalized bounds so they stay
/// exact when the caller passed negative or out-of-range ones.
pub(super) fn perform(target: &mut Vec<Value>, op: &Op) -> (MutationResult, Mutator) {
    let len = target.len();
    match op {
        Op::Push(items) => {
            target.extend(items.iter().cloned());
            done(
                OpResult::Length(target.len()),
                Op::splice(len as i64, items.len() as i64, Vec::new()),
            )
        }
        Op::Pop => match target.pop() {
            Some(removed) => done(OpResult::Removed(Some(removed.clone())), Op::Push(vec![removed])),
            None => done(OpResult::Removed(None), Op::Pop),
        },
        Op::Splice {
            start,
            delete_count,
            items,
        } => {
            let start = relative_index(*start, len);
            let delete_count = match delete_count {
                None => len - start,
                Some(n) => (*n).clamp(0, (len - start) as i64) as usize,
            };
            let removed: Vec<Value> = target
                .splice(start..start + delete_count, items.iter().cloned())
                .collect();
            done(
                OpResult::Spliced(removed.clone()),
                Op::splice(start as i64, items.len() as i64, removed),
            )
        }
        Op::Fill { value, start, end } => {
            let start = start.map_or(0, |s| relative_index(s, len));
            let end = end.map_or(len, |e| relative_index(e, len)).max(start);
            // the overwritten slice must be captured before filling
            let overwritten = target[start..end].to_vec();
            target[start..end].fill(value.clone());
            done(
                OpResult::Target,
                Op::splice(start as i64, (end - start) as i64, overwritten),
            )
        }
        Op::Sort(comparator) => {
            let original = target.clone();
            match comparator {
                Some(cmp) => target.sort_by(|a, b| cmp.compare(a, b)),
                None => target.sort_by(total_cmp),
            }
            done(OpResult::Target, Op::splice(0, len as i64, original))
        }
        Op::Reverse => {
            target.reverse();
            done(OpResult::Target, Op::Reverse)
        }
        Op::Shift => {
            if target.is_empty() {
                return done(OpResult::Removed(None), Op::Shift);
            }
            let removed = target.remove(0);
            done(OpResult::Removed(Some(removed.clone())), Op::Unshift(vec![removed]))
        }
        Op::Unshift(items) => {
            target.splice(0..0, items.iter().cloned());
            done(
                OpResult::Length(target.len()),
                Op::splice(0, items.len() as i64, Vec::new()),
            )
        }
        other => {
            tracing::warn!(op = other.name(), "sequence mutation called with invalid operation");
            (MutationResult::Skipped, Mutator::noop())
        }
    }
}
