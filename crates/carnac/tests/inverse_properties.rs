use carnac::{apply_patch, perform_mutation, Comparator, Mutator, Op, Patch};
use carnac_value::{total_cmp, Object, Value, ValueMap, ValueSet};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-20i32..20).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::String),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-d]", inner), 0..4)
                .prop_map(|kv| Value::Object(kv.into_iter().collect())),
        ]
    })
}

fn object() -> impl Strategy<Value = Object> {
    prop::collection::vec(("[a-d]", tree()), 0..5).prop_map(|kv| kv.into_iter().collect())
}

fn items() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(leaf(), 0..4)
}

fn bound() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-8i64..8)
}

fn sequence_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        items().prop_map(Op::Push),
        Just(Op::Pop),
        (-8i64..8, bound(), items()).prop_map(|(start, delete_count, items)| Op::Splice {
            start,
            delete_count,
            items,
        }),
        (leaf(), bound(), bound()).prop_map(|(value, start, end)| Op::Fill { value, start, end }),
        Just(Op::Sort(None)),
        Just(Op::Sort(Some(Comparator::new(|a, b| total_cmp(b, a))))),
        Just(Op::Reverse),
        Just(Op::Shift),
        items().prop_map(Op::Unshift),
    ]
}

fn key() -> impl Strategy<Value = Value> {
    prop_oneof![(0i32..4).prop_map(Value::from), "[a-b]".prop_map(Value::String)]
}

fn map_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (key(), leaf()).prop_map(|(key, value)| Op::Set { key, value }),
        key().prop_map(Op::Delete),
        Just(Op::Clear),
        prop::collection::vec((key(), leaf()), 0..3).prop_map(Op::RestoreEntries),
    ]
}

fn set_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        key().prop_map(Op::Add),
        key().prop_map(Op::Delete),
        Just(Op::Clear),
        prop::collection::vec(key(), 0..3).prop_map(Op::RestoreMembers),
    ]
}

fn round_trip(mut target: Value, mutator: Mutator) -> Result<(), TestCaseError> {
    let before = target.clone();
    let (_, inverse) = perform_mutation(&mut target, &mutator);
    perform_mutation(&mut target, &inverse);
    prop_assert_eq!(target, before);
    Ok(())
}

proptest! {
    #[test]
    fn patch_inverse_restores_target(mut target in object(), patch in object()) {
        let before = target.clone();
        let inverse = apply_patch(&mut target, &Patch::from(patch));
        apply_patch(&mut target, &inverse);
        prop_assert_eq!(target, before);
    }

    #[test]
    fn sequence_inverse_restores_target(
        start in prop::collection::vec(leaf(), 0..8),
        ops in prop::collection::vec(sequence_op(), 1..5),
    ) {
        round_trip(Value::Array(start), Mutator::chain(ops))?;
    }

    #[test]
    fn map_inverse_restores_target(
        entries in prop::collection::vec((key(), leaf()), 0..6),
        ops in prop::collection::vec(map_op(), 1..5),
    ) {
        let map: ValueMap = entries.into_iter().collect();
        round_trip(Value::Map(map), Mutator::chain(ops))?;
    }

    #[test]
    fn set_inverse_restores_target(
        members in prop::collection::vec(key(), 0..6),
        ops in prop::collection::vec(set_op(), 1..5),
    ) {
        let set: ValueSet = members.into_iter().collect();
        round_trip(Value::Set(set), Mutator::chain(ops))?;
    }

    #[test]
    fn nested_inverse_restores_tree(
        arr in prop::collection::vec(leaf(), 0..6),
        op in sequence_op(),
        map_ops in prop::collection::vec(map_op(), 0..3),
    ) {
        let mut root = Object::new();
        root.insert("arr".into(), Value::Array(arr));
        let mut inner = Object::new();
        inner.insert("map".into(), Value::Map(ValueMap::new()));
        root.insert("foo".into(), Value::Object(inner));
        let mutator = Mutator::fields([
            ("arr", Mutator::from(op)),
            ("foo", Mutator::field("map", Mutator::chain(map_ops))),
        ]);
        round_trip(Value::Object(root), mutator)?;
    }
}
