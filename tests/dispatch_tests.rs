#![cfg(feature = "dispatch")]
//! Integration tests for the element-wise dispatch operations.

use fpkit::dispatch::{
    Callable, DispatchError, filter, filter_into, flat, flat_into, fold, fold_into, map, map_into,
    reduce, unzip_with, unzip_with_into, zip_with, zip_with_into,
};
use fpkit::value::{FromValue, IntoValue, Record, Value};
use rstest::rstest;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

// =============================================================================
// filter
// =============================================================================

#[test]
fn test_filter_keeps_passing_scores_in_order() {
    let passing = Callable::new(|score: i64| score >= 90);
    let kept = filter(&passing, vec![23, 90, 67, 6878, 90, 8]).unwrap();
    assert_eq!(kept, ints(&[90, 6878, 90]));
}

#[test]
fn test_filter_into_can_reuse_the_source_buffer() {
    let passing = Callable::new(|score: i64| score >= 90);
    let mut scores = vec![23_i64, 90, 67, 6878, 90, 8];
    let source = scores.clone().into_value();
    let written = filter_into(&passing, source, &mut scores).unwrap();
    assert_eq!(&scores[..written], &[90, 6878, 90]);
}

#[test]
fn test_filter_over_records() {
    let adults = Callable::new(|person: Record| {
        person
            .get("age")
            .is_some_and(|age| matches!(age, Value::Int(years) if *years >= 18))
    });
    let people = vec![
        Record::new()
            .with_field("name", "Ann".into_value())
            .with_field("age", 34.into_value()),
        Record::new()
            .with_field("name", "Bo".into_value())
            .with_field("age", 9.into_value()),
    ];
    let kept = filter(&adults, people.clone()).unwrap();
    assert_eq!(kept, vec![Value::Record(people[0].clone())]);
}

// =============================================================================
// map
// =============================================================================

#[test]
fn test_map_squares() {
    let square = Callable::new(|value: i64| value * value);
    assert_eq!(map(&square, vec![4, 7]).unwrap(), ints(&[16, 49]));
}

#[test]
fn test_map_into_typed_destination() {
    let square = Callable::new(|value: i64| value * value);
    let mut destination = [0_u32; 2];
    let written = map_into(&square, vec![4, 7], &mut destination).unwrap();
    assert_eq!(written, 2);
    assert_eq!(destination, [16, 49]);
}

#[test]
fn test_map_spreads_zipped_pairs() {
    let swap = Callable::new(|first: i64, second: i64| (second, first));
    let pair_up = Callable::new(|first: i64, second: i64| vec![first, second]);
    let pairs = zip_with(&pair_up, vec![1, 2], vec![10, 20]).unwrap();
    let swapped = map(&swap, pairs).unwrap();
    assert_eq!(
        swapped,
        vec![
            Value::List(ints(&[10, 1])),
            Value::List(ints(&[20, 2])),
        ]
    );
}

#[test]
fn test_map_with_curried_function() {
    let add = Callable::new(|first: i64, second: i64| first + second);
    let add_seven = add.curry([Value::Int(7)]).unwrap();
    assert_eq!(map(&add_seven, vec![4, -3]).unwrap(), ints(&[11, 4]));
}

// =============================================================================
// zip_with
// =============================================================================

#[test]
fn test_zip_with_builds_records_and_truncates() {
    let new_student = Callable::new(|id: i64, name: String| {
        Record::new()
            .with_field("id", id.into_value())
            .with_field("name", name.into_value())
    });
    let students = zip_with(&new_student, vec![7, 3, 11], vec!["Jack", "John"]).unwrap();
    assert_eq!(students.len(), 2);
    let second = Record::from_value(students[1].clone()).unwrap();
    assert_eq!(second.get("id"), Some(&Value::Int(3)));
    assert_eq!(second.get("name"), Some(&Value::Str("John".into())));
}

#[test]
fn test_zip_with_into_counts_pairs() {
    let multiply = Callable::new(|first: f64, second: f64| first * second);
    let mut destination = [0.0_f64; 3];
    let written = zip_with_into(
        &multiply,
        vec![1.5, 2.0, 4.0],
        vec![2.0, 3.0],
        &mut destination,
    )
    .unwrap();
    assert_eq!(written, 2);
    assert_eq!(destination, [3.0, 6.0, 0.0]);
}

#[test]
fn test_zip_with_requires_binary_function() {
    let square = Callable::new(|value: i64| value * value);
    assert_eq!(
        zip_with(&square, vec![1], vec![2]),
        Err(DispatchError::ArityMismatch {
            expected: 1,
            given: 2
        })
    );
}

// =============================================================================
// fold
// =============================================================================

#[rstest]
#[case(vec![], None)]
#[case(vec![42], Some(42))]
#[case(vec![-23, 90, 67, 90, 8], Some(232))]
fn test_fold_sum(#[case] input: Vec<i64>, #[case] expected: Option<i64>) {
    let sum = Callable::new(|total: i64, next: i64| total + next);
    assert_eq!(fold(&sum, input).unwrap(), expected.map(Value::Int));
}

#[test]
fn test_fold_into_slot() {
    let longest = Callable::new(|best: String, next: String| {
        if next.len() > best.len() { next } else { best }
    });
    let mut slot = String::new();
    let written = fold_into(&longest, vec!["ab", "abcd", "abc"], &mut slot).unwrap();
    assert_eq!(written, 1);
    assert_eq!(slot, "abcd");
}

#[test]
fn test_fold_requires_single_return() {
    let pair = Callable::new(|first: i64, second: i64| (first, second));
    assert_eq!(
        fold(&pair, vec![1, 2]),
        Err(DispatchError::ReturnShape {
            operation: "fold",
            expected: 1,
            declared: 2
        })
    );
}

// =============================================================================
// reduce
// =============================================================================

#[test]
fn test_reduce_collects_every_element_in_order() {
    let temperatures = vec![5.0, 76.0, 67.0, 69.0, 70.0, -7.0, 8.0];
    let mut collected: Vec<f64> = Vec::new();
    reduce(
        |destination: &mut Vec<f64>, value: f64| destination.push(value),
        &mut collected,
        temperatures.clone(),
    )
    .unwrap();
    assert_eq!(collected, temperatures);
}

#[test]
fn test_reduce_into_scalar_accumulator() {
    let mut longest = 0_usize;
    reduce(
        |longest: &mut usize, word: String| *longest = (*longest).max(word.len()),
        &mut longest,
        vec!["a", "abc", "ab"],
    )
    .unwrap();
    assert_eq!(longest, 3);
}

#[test]
fn test_reduce_promotes_a_scalar() {
    let mut calls = 0;
    reduce(|calls: &mut i32, _: i64| *calls += 1, &mut calls, 7).unwrap();
    assert_eq!(calls, 1);
}

// =============================================================================
// flat
// =============================================================================

#[test]
fn test_flat_one_level() {
    assert_eq!(flat(vec![vec![7, 7], vec![9, 9]]), ints(&[7, 7, 9, 9]));
}

#[test]
fn test_flat_is_not_recursive() {
    assert_eq!(flat(vec![vec![vec![1]]]), vec![Value::List(ints(&[1]))]);
}

#[test]
fn test_flat_into_rejects_small_destination() {
    let mut destination = [0_i64; 3];
    assert_eq!(
        flat_into(vec![vec![7, 7], vec![9, 9]], &mut destination),
        Err(DispatchError::CapacityExceeded {
            capacity: 3,
            required: 4
        })
    );
    assert_eq!(destination, [0, 0, 0]);
}

// =============================================================================
// unzip_with
// =============================================================================

#[test]
fn test_unzip_with_copies() {
    let copy = Callable::new(|value: i64| (value, value));
    let (firsts, seconds) = unzip_with(&copy, vec![7, -2, 0]).unwrap();
    assert_eq!(firsts, ints(&[7, -2, 0]));
    assert_eq!(seconds, ints(&[7, -2, 0]));
}

#[test]
fn test_unzip_with_into_mixed_types() {
    let describe = Callable::new(|value: i64| (value.unsigned_abs(), value.to_string()));
    let mut magnitudes = [0_u64; 3];
    let mut labels = vec![String::new(); 3];
    let written = unzip_with_into(&describe, vec![7, -2, 0], &mut magnitudes, &mut labels).unwrap();
    assert_eq!(written, 3);
    assert_eq!(magnitudes, [7, 2, 0]);
    assert_eq!(labels, vec!["7", "-2", "0"]);
}

#[test]
fn test_unzip_with_rejects_three_returns() {
    let triple = Callable::new(|value: i64| (value, value, value));
    assert!(matches!(
        unzip_with(&triple, vec![1]),
        Err(DispatchError::ReturnShape { declared: 3, .. })
    ));
}
