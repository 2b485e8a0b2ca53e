#![cfg(feature = "dispatch")]
//! Property-based tests for the dispatch operations.
//!
//! - **Filter**: keeps exactly the passing elements, in order
//! - **Map**: preserves length and applies the function pointwise
//! - **ZipWith**: result length is the shorter input's length
//! - **Fold**: agrees with a left fold over the elements
//! - **Flat**: flattens one level, so total length is the sum of part lengths
//! - **Currying**: fixing a prefix then supplying the rest equals a full call
//! - **Group**: partitions the input, preserving order inside each group

use fpkit::dispatch::{Callable, filter, flat, fold, group_by, group_reduce, map, zip_with};
use fpkit::fingerprint::FieldMask;
use fpkit::value::{IntoValue, Value};
use proptest::prelude::*;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

proptest! {
    #[test]
    fn prop_filter_keeps_passing_elements_in_order(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let even = Callable::new(|value: i64| value % 2 == 0);
        let expected: Vec<i64> = values.iter().copied().filter(|value| value % 2 == 0).collect();
        prop_assert_eq!(filter(&even, values).unwrap(), ints(&expected));
    }

    #[test]
    fn prop_map_is_pointwise(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let widen = Callable::new(|value: i64| value.wrapping_mul(3));
        let mapped = map(&widen, values.clone()).unwrap();
        prop_assert_eq!(mapped.len(), values.len());
        for (result, value) in mapped.iter().zip(&values) {
            prop_assert_eq!(result, &Value::Int(i64::from(*value).wrapping_mul(3)));
        }
    }

    #[test]
    fn prop_zip_with_truncates_to_shorter(
        left in prop::collection::vec(any::<i64>(), 0..32),
        right in prop::collection::vec(any::<i64>(), 0..32),
    ) {
        let add = Callable::new(|first: i64, second: i64| first.wrapping_add(second));
        let zipped = zip_with(&add, left.clone(), right.clone()).unwrap();
        prop_assert_eq!(zipped.len(), left.len().min(right.len()));
    }

    #[test]
    fn prop_fold_agrees_with_left_fold(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let add = Callable::new(|total: i64, next: i64| total.wrapping_add(next));
        let expected = values
            .iter()
            .copied()
            .reduce(i64::wrapping_add)
            .map(Value::Int);
        prop_assert_eq!(fold(&add, values).unwrap(), expected);
    }

    #[test]
    fn prop_flat_length_is_sum_of_parts(parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..8), 0..16)) {
        let total: usize = parts.iter().map(Vec::len).sum();
        prop_assert_eq!(flat(parts).len(), total);
    }

    #[test]
    fn prop_curry_then_call_equals_direct_call(first in any::<i64>(), second in any::<i64>(), third in any::<i64>()) {
        let combine = Callable::new(|a: i64, b: i64, c: i64| a.wrapping_mul(31).wrapping_add(b).wrapping_sub(c));
        let direct = combine.invoke([Value::Int(first), Value::Int(second), Value::Int(third)]).unwrap();
        let curried = combine
            .curry([Value::Int(first)])
            .and_then(|partial| partial.curry([Value::Int(second)]))
            .and_then(|partial| partial.invoke([Value::Int(third)]))
            .unwrap();
        prop_assert_eq!(curried, direct);
    }

    #[test]
    fn prop_group_partitions_input(pairs in prop::collection::vec((0_u8..4, any::<i32>()), 0..64)) {
        let groups = group_by(FieldMask::new(0b01), pairs.clone()).unwrap();
        prop_assert_eq!(groups.element_count(), pairs.len());
        for (_, members) in &groups {
            let key = members[0].0;
            prop_assert!(members.iter().all(|(group_key, _)| *group_key == key));
            let expected: Vec<(u8, i32)> = pairs.iter().copied().filter(|(k, _)| *k == key).collect();
            prop_assert_eq!(members, expected.as_slice());
        }
    }

    #[test]
    fn prop_group_reduce_counts_distinct_keys(keys in prop::collection::vec(0_u8..16, 0..64)) {
        let items: Vec<(u8,)> = keys.iter().map(|key| (*key,)).collect();
        let mut distinct = keys.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let mut slots = vec![0_usize; 16];
        let count = group_reduce(FieldMask::new(0b1), |count: &mut usize, _: (u8,)| *count += 1, &mut slots, items).unwrap();
        prop_assert_eq!(count, distinct.len());
    }

    #[test]
    fn prop_scalar_promotes_to_single_element(value in any::<i64>()) {
        let identity = Callable::new(|value: i64| value);
        prop_assert_eq!(map(&identity, value).unwrap(), vec![value.into_value()]);
    }
}
