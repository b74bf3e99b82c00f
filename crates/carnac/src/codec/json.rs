//! JSON codec for mutators and patches.
//!
//! Descriptor objects are ambiguous on their own: `{"set": ["k", 1]}` is a map
//! operation on a map but a nested mutator for a field named `set` on an
//! object. Decoding therefore walks the target alongside the descriptor and
//! classifies each level the same way the mutation engine does:
//!
//! - object target: every key is a field;
//! - sequence target: index keys are elements, anything else is an operation;
//! - map or set target: the descriptor names an operation;
//! - no target: an operation if the first key names one, fields otherwise.
//!
//! A JSON array is a chain of mutators applied to the same target.

use carnac_value::{Object, Value};
use indexmap::IndexMap;
use serde_json::{json, Map};

use super::CodecError;
use crate::mutator::{Mutator, Op};
use crate::patch::{Patch, PatchEntry};

const OP_NAMES: &[&str] = &[
    "push",
    "pop",
    "splice",
    "fill",
    "sort",
    "reverse",
    "shift",
    "unshift",
    "set",
    "add",
    "delete",
    "clear",
    "restore_entries",
    "restore_members",
];

fn op_name(key: &str) -> Option<&'static str> {
    OP_NAMES.iter().copied().find(|name| *name == key)
}

fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".into(),
        serde_json::Value::Bool(_) => "a boolean".into(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(_) => "a string".into(),
        serde_json::Value::Array(_) => "an array".into(),
        serde_json::Value::Object(_) => "an object".into(),
    }
}

// ── Mutator decoding ──────────────────────────────────────────────────────

/// Decodes a mutator descriptor against the value it will be applied to.
pub fn decode_mutator(target: &Value, descriptor: &serde_json::Value) -> Result<Mutator, CodecError> {
    decode(Some(target), descriptor)
}

/// Decodes a mutator descriptor against an object, such as a store's root
/// state.
pub fn decode_object_mutator(
    target: &Object,
    descriptor: &serde_json::Value,
) -> Result<Mutator, CodecError> {
    match descriptor {
        serde_json::Value::Array(steps) => steps
            .iter()
            .map(|step| decode_object_mutator(target, step))
            .collect::<Result<Vec<_>, _>>()
            .map(Mutator::Chain),
        serde_json::Value::Object(obj) => decode_fields(obj, |key| target.get(key)),
        other => Err(CodecError::NotAnObject(describe(other))),
    }
}

fn decode(target: Option<&Value>, descriptor: &serde_json::Value) -> Result<Mutator, CodecError> {
    let obj = match descriptor {
        serde_json::Value::Array(steps) => {
            return steps
                .iter()
                .map(|step| decode(target, step))
                .collect::<Result<Vec<_>, _>>()
                .map(Mutator::Chain)
        }
        serde_json::Value::Object(obj) => obj,
        other => return Err(CodecError::NotAnObject(describe(other))),
    };
    match target {
        Some(Value::Object(fields)) => decode_fields(obj, |key| fields.get(key)),
        Some(Value::Array(items)) => {
            if !obj.is_empty() && obj.keys().all(|k| k.parse::<usize>().is_ok()) {
                decode_fields(obj, |key| key.parse::<usize>().ok().and_then(|i| items.get(i)))
            } else {
                decode_op(obj)
            }
        }
        Some(Value::Map(_) | Value::Set(_)) => decode_op(obj),
        _ => match obj.keys().next() {
            Some(first) if op_name(first).is_some() => decode_op(obj),
            _ => decode_fields(obj, |_| None),
        },
    }
}

fn decode_fields<'a, F>(obj: &Map<String, serde_json::Value>, child: F) -> Result<Mutator, CodecError>
where
    F: Fn(&str) -> Option<&'a Value>,
{
    let mut fields = IndexMap::with_capacity(obj.len());
    for (key, descriptor) in obj {
        fields.insert(key.clone(), decode(child(key), descriptor)?);
    }
    Ok(Mutator::Fields(fields))
}

/// Decodes an operation-style descriptor. The first key wins; any further
/// keys are reported and ignored.
fn decode_op(obj: &Map<String, serde_json::Value>) -> Result<Mutator, CodecError> {
    let mut keys = obj.iter();
    let Some((key, args)) = keys.next() else {
        return Ok(Mutator::noop());
    };
    let extra: Vec<&String> = keys.map(|(k, _)| k).collect();
    if !extra.is_empty() {
        tracing::warn!(op = %key, extra_keys = ?extra, "mutator descriptor names more than one operation, using the first");
    }
    let Some(name) = op_name(key) else {
        tracing::warn!(op = %key, "unknown collection operation");
        return Ok(Mutator::noop());
    };
    let args = args
        .as_array()
        .ok_or(CodecError::InvalidArgs { op: name })?;
    decode_op_args(name, args).map(Mutator::Op)
}

fn values(args: &[serde_json::Value]) -> Vec<Value> {
    args.iter().cloned().map(Value::from).collect()
}

fn required<'a>(
    op: &'static str,
    arg: &'static str,
    value: Option<&'a serde_json::Value>,
) -> Result<&'a serde_json::Value, CodecError> {
    value.ok_or(CodecError::MissingArgument { op, arg })
}

fn integer(op: &'static str, value: &serde_json::Value) -> Result<i64, CodecError> {
    value
        .as_f64()
        .map(|n| n.trunc() as i64)
        .ok_or_else(|| CodecError::InvalidNumber {
            op,
            value: describe(value),
        })
}

/// Optional bound; `null` counts as omitted.
fn bound(op: &'static str, value: Option<&serde_json::Value>) -> Result<Option<i64>, CodecError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => integer(op, v).map(Some),
    }
}

fn decode_op_args(name: &'static str, args: &[serde_json::Value]) -> Result<Op, CodecError> {
    let op = match name {
        "push" => Op::Push(values(args)),
        "pop" => Op::Pop,
        "splice" => Op::Splice {
            start: integer(name, required(name, "start", args.first())?)?,
            delete_count: bound(name, args.get(1))?,
            items: values(args.get(2..).unwrap_or_default()),
        },
        "fill" => Op::Fill {
            value: Value::from(required(name, "value", args.first())?.clone()),
            start: bound(name, args.get(1))?,
            end: bound(name, args.get(2))?,
        },
        "sort" => Op::Sort(None),
        "reverse" => Op::Reverse,
        "shift" => Op::Shift,
        "unshift" => Op::Unshift(values(args)),
        "set" => Op::Set {
            key: Value::from(required(name, "key", args.first())?.clone()),
            value: Value::from(required(name, "value", args.get(1))?.clone()),
        },
        "add" => Op::Add(Value::from(required(name, "value", args.first())?.clone())),
        "delete" => Op::Delete(Value::from(required(name, "key", args.first())?.clone())),
        "clear" => Op::Clear,
        "restore_entries" => Op::RestoreEntries(
            args.iter()
                .map(|pair| match pair.as_array().map(Vec::as_slice) {
                    Some([k, v]) => Ok((Value::from(k.clone()), Value::from(v.clone()))),
                    _ => Err(CodecError::InvalidArgs { op: name }),
                })
                .collect::<Result<_, _>>()?,
        ),
        "restore_members" => Op::RestoreMembers(values(args)),
        _ => unreachable!("op names are taken from OP_NAMES"),
    };
    Ok(op)
}

// ── Mutator encoding ──────────────────────────────────────────────────────

fn encode_values(items: &[Value]) -> Vec<serde_json::Value> {
    items.iter().map(Value::to_json).collect()
}

fn encode_op_args(op: &Op) -> Vec<serde_json::Value> {
    match op {
        Op::Push(items) | Op::Unshift(items) | Op::RestoreMembers(items) => encode_values(items),
        Op::Pop | Op::Sort(_) | Op::Reverse | Op::Shift | Op::Clear => Vec::new(),
        Op::Splice {
            start,
            delete_count,
            items,
        } => {
            let mut args = vec![json!(start)];
            match delete_count {
                Some(n) => args.push(json!(n)),
                None if !items.is_empty() => args.push(serde_json::Value::Null),
                None => {}
            }
            args.extend(encode_values(items));
            args
        }
        Op::Fill { value, start, end } => {
            let mut args = vec![value.to_json()];
            if start.is_some() || end.is_some() {
                args.push(start.map_or(serde_json::Value::Null, |s| json!(s)));
            }
            if let Some(e) = end {
                args.push(json!(e));
            }
            args
        }
        Op::Set { key, value } => vec![key.to_json(), value.to_json()],
        Op::Add(value) | Op::Delete(value) => vec![value.to_json()],
        Op::RestoreEntries(entries) => entries
            .iter()
            .map(|(k, v)| json!([k.to_json(), v.to_json()]))
            .collect(),
    }
}

/// Encodes a mutator as a JSON descriptor.
///
/// Sort comparators cannot be represented and encode as a plain `sort`.
pub fn encode_mutator(mutator: &Mutator) -> serde_json::Value {
    match mutator {
        Mutator::Op(op) => {
            let mut m = Map::new();
            m.insert(op.name().into(), serde_json::Value::Array(encode_op_args(op)));
            serde_json::Value::Object(m)
        }
        Mutator::Fields(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(k, m)| (k.clone(), encode_mutator(m)))
                .collect(),
        ),
        Mutator::Chain(steps) => serde_json::Value::Array(steps.iter().map(encode_mutator).collect()),
    }
}

// ── Patch codec ───────────────────────────────────────────────────────────

/// Decodes a JSON object into a [`Patch`]. Nested objects become nested
/// patches.
pub fn decode_patch(descriptor: &serde_json::Value) -> Result<Patch, CodecError> {
    match Value::from(descriptor.clone()) {
        Value::Object(obj) => Ok(Patch::from(obj)),
        _ => Err(CodecError::NotAnObject(describe(descriptor))),
    }
}

/// Encodes a patch as a JSON object. JSON has no absent marker, so
/// [`PatchEntry::Remove`] encodes as `null`.
pub fn encode_patch(patch: &Patch) -> serde_json::Value {
    serde_json::Value::Object(
        patch
            .iter()
            .map(|(key, entry)| {
                let value = match entry {
                    PatchEntry::Assign(v) => v.to_json(),
                    PatchEntry::Nested(p) => encode_patch(p),
                    PatchEntry::Remove => serde_json::Value::Null,
                };
                (key.clone(), value)
            })
            .collect(),
    )
}
