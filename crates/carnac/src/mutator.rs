//! Mutation descriptors and their results.
//!
//! A [`Mutator`] is a declarative description of collection operations laid
//! out like the state tree: [`Mutator::Fields`] descends into object keys (or
//! sequence indices), [`Mutator::Chain`] applies several mutators to the same
//! target in order, and [`Mutator::Op`] names one collection operation.
//!
//! Every application yields a [`MutationResult`] of the same shape and an
//! inverse [`Mutator`] that undoes it.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use carnac_value::{CollectionKind, Value};
use indexmap::IndexMap;

// ── Comparator ────────────────────────────────────────────────────────────

/// Caller-supplied ordering for [`Op::Sort`].
///
/// Comparators are compared by identity.
#[derive(Clone)]
pub struct Comparator(Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>);

impl Comparator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        (self.0)(a, b)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

impl PartialEq for Comparator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ── Op ────────────────────────────────────────────────────────────────────

/// One collection operation with its native arguments.
///
/// Sequence bounds (`start`, `end`, `delete_count`) follow native sequence
/// semantics: negative values count from the end and everything is clamped to
/// the sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // ── Sequence operations ───────────────────────────────────────────────
    Push(Vec<Value>),
    Pop,
    Splice {
        start: i64,
        /// `None` removes everything from `start` to the end.
        delete_count: Option<i64>,
        items: Vec<Value>,
    },
    Fill {
        value: Value,
        start: Option<i64>,
        end: Option<i64>,
    },
    Sort(Option<Comparator>),
    Reverse,
    Shift,
    Unshift(Vec<Value>),

    // ── Map operations ────────────────────────────────────────────────────
    Set {
        key: Value,
        value: Value,
    },

    // ── Set operations ────────────────────────────────────────────────────
    Add(Value),

    // ── Shared by maps and sets ───────────────────────────────────────────
    Delete(Value),
    Clear,

    // ── Bulk restore, produced as the inverse of `Clear` ──────────────────
    RestoreEntries(Vec<(Value, Value)>),
    RestoreMembers(Vec<Value>),
}

impl Op {
    /// Returns the descriptor key naming this operation.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Push(_) => "push",
            Op::Pop => "pop",
            Op::Splice { .. } => "splice",
            Op::Fill { .. } => "fill",
            Op::Sort(_) => "sort",
            Op::Reverse => "reverse",
            Op::Shift => "shift",
            Op::Unshift(_) => "unshift",
            Op::Set { .. } => "set",
            Op::Add(_) => "add",
            Op::Delete(_) => "delete",
            Op::Clear => "clear",
            Op::RestoreEntries(_) => "restore_entries",
            Op::RestoreMembers(_) => "restore_members",
        }
    }

    /// Returns true if this operation is defined for `kind`.
    pub fn applies_to(&self, kind: CollectionKind) -> bool {
        match kind {
            CollectionKind::Sequence => matches!(
                self,
                Op::Push(_)
                    | Op::Pop
                    | Op::Splice { .. }
                    | Op::Fill { .. }
                    | Op::Sort(_)
                    | Op::Reverse
                    | Op::Shift
                    | Op::Unshift(_)
            ),
            CollectionKind::Map => matches!(
                self,
                Op::Set { .. } | Op::Delete(_) | Op::Clear | Op::RestoreEntries(_)
            ),
            CollectionKind::Set => matches!(
                self,
                Op::Add(_) | Op::Delete(_) | Op::Clear | Op::RestoreMembers(_)
            ),
            CollectionKind::PlainMapping => false,
        }
    }

    pub fn splice(start: i64, delete_count: i64, items: Vec<Value>) -> Self {
        Op::Splice {
            start,
            delete_count: Some(delete_count),
            items,
        }
    }

    pub fn set(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Op::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn fill(value: impl Into<Value>, start: Option<i64>, end: Option<i64>) -> Self {
        Op::Fill {
            value: value.into(),
            start,
            end,
        }
    }
}

// ── Mutator ───────────────────────────────────────────────────────────────

/// A declarative mutation of a state tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutator {
    /// Apply one collection operation to the target.
    Op(Op),
    /// Descend into object keys, or sequence indices when every key is an
    /// index.
    Fields(IndexMap<String, Mutator>),
    /// Apply each mutator in turn to the same target.
    Chain(Vec<Mutator>),
}

impl Mutator {
    /// A mutator that changes nothing, used as the inverse of skipped work.
    pub fn noop() -> Self {
        Mutator::Chain(Vec::new())
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Mutator::Chain(steps) if steps.iter().all(Mutator::is_noop))
    }

    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Mutator)>,
        K: Into<String>,
    {
        Mutator::Fields(fields.into_iter().map(|(k, m)| (k.into(), m)).collect())
    }

    /// Single-key shorthand for [`Mutator::fields`].
    pub fn field(key: impl Into<String>, mutator: impl Into<Mutator>) -> Self {
        Mutator::fields([(key.into(), mutator.into())])
    }

    pub fn chain<I, M>(steps: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Mutator>,
    {
        Mutator::Chain(steps.into_iter().map(Into::into).collect())
    }
}

impl From<Op> for Mutator {
    fn from(op: Op) -> Self {
        Mutator::Op(op)
    }
}

// ── Results ───────────────────────────────────────────────────────────────

/// Native return value of one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OpResult {
    /// New length, from `push` and `unshift`.
    Length(usize),
    /// Element removed by `pop` or `shift`; `None` when the sequence was empty.
    Removed(Option<Value>),
    /// Elements removed by `splice`.
    Spliced(Vec<Value>),
    /// Whether `delete` found its key or member.
    Deleted(bool),
    /// The operation returns the collection it was invoked on (`fill`, `sort`,
    /// `reverse`, `set`, `add`, bulk restores). Read the target for its value.
    Target,
    /// `clear` returns nothing.
    Cleared,
}

/// Results of a [`Mutator`], shaped like the mutator.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    Op(OpResult),
    Fields(IndexMap<String, MutationResult>),
    Chain(Vec<MutationResult>),
    /// Nothing was applied: the mutator did not fit its target.
    Skipped,
}

impl MutationResult {
    /// Looks up the result for a field.
    pub fn get(&self, key: &str) -> Option<&MutationResult> {
        match self {
            MutationResult::Fields(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn as_op(&self) -> Option<&OpResult> {
        match self {
            MutationResult::Op(res) => Some(res),
            _ => None,
        }
    }
}
