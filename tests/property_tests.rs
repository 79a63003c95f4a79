//! Property-based tests for the normalizer's structural guarantees.

use proptest::prelude::*;
use serde_safenum::{normalize, try_normalize, BigInt, Map, NormalizeOptions, Number, Value};

const SAFE: i64 = serde_safenum::MAX_SAFE_INTEGER;

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Absent),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e12f64..1.0e12).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        any::<i128>().prop_map(Value::from),
    ]
}

fn arb_tree() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map>())),
        ]
    })
}

fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| same_shape(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.keys().eq(y.keys())
                && x.values().zip(y.values()).all(|(l, r)| same_shape(l, r))
        }
        (Value::Array(_), _) | (Value::Object(_), _) | (_, Value::Array(_)) | (_, Value::Object(_)) => false,
        _ => true,
    }
}

proptest! {
    #[test]
    fn prop_safe_integers_exact(n in -SAFE..=SAFE) {
        let out = normalize(&Value::BigInt(BigInt::from(n)));
        prop_assert_eq!(out, Value::Number(Number::Integer(n)));
    }

    #[test]
    fn prop_unsafe_integers_nearest_f64(n in any::<i128>()) {
        prop_assume!(n.unsigned_abs() > SAFE as u128);
        let out = normalize(&Value::BigInt(BigInt::from(n)));
        // `as f64` on i128 rounds to nearest, ties to even
        prop_assert_eq!(out.as_f64(), Some(n as f64));
    }

    #[test]
    fn prop_shape_preserved(tree in arb_tree()) {
        let out = normalize(&tree);
        prop_assert!(same_shape(&tree, &out));
        prop_assert!(!out.contains_bigint());
    }

    #[test]
    fn prop_idempotent(tree in arb_tree()) {
        let once = normalize(&tree);
        let twice = normalize(&once);
        // NaN never appears: floats are drawn from a finite range
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_default_options_match_plain(tree in arb_tree()) {
        let walked = try_normalize(&tree, &NormalizeOptions::default()).unwrap();
        prop_assert_eq!(walked, normalize(&tree));
    }

    #[test]
    fn prop_identity_without_bigint(tree in arb_tree()) {
        prop_assume!(!tree.contains_bigint());
        prop_assert_eq!(normalize(&tree), tree);
    }
}
