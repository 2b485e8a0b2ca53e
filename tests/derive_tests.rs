//! Integration tests for the `Fields` and `Record` derive macros.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fpkit::dispatch::{Callable, DispatchError, map, zip_with};
use fpkit::fingerprint::{FieldMask, FieldTable, Fields, compute_fingerprint, visit};
use fpkit::value::{FromValue, IntoValue, Record, Value};
use fpkit::{Fields, Record};
use rstest::rstest;

#[derive(Clone, Debug, PartialEq, Fields, Record)]
struct Student {
    id: i64,
    name: String,
}

#[derive(Clone, Debug, PartialEq, Fields, Record)]
struct Point(i32, i32);

#[derive(Fields)]
struct Tagged<T> {
    tag: u8,
    payload: T,
}

#[derive(Fields)]
struct Shipment {
    id: u32,
    origin: Point,
    sent_at: SystemTime,
    transit: Option<Duration>,
}

// =============================================================================
// Fields
// =============================================================================

#[test]
fn test_field_count_and_positional_access() {
    let student = Student {
        id: 7,
        name: "Jack".into(),
    };
    assert_eq!(student.field_count(), 2);
    assert_eq!(visit(0, &student).unwrap().encoded_len(), 8);
    assert!(visit(2, &student).is_err());
}

#[test]
fn test_descriptor_table_lists_fields_in_order() {
    let names: Vec<&str> = Student::FIELDS.iter().map(|field| field.name).collect();
    assert_eq!(names, vec!["id", "name"]);
    assert_eq!(Student::FIELDS[0].index, 0);
    assert_eq!(Student::FIELDS[0].size, std::mem::size_of::<i64>());
    assert_eq!(Student::FIELDS[1].size, std::mem::size_of::<String>());
}

#[test]
fn test_tuple_struct_fields_are_numbered() {
    let names: Vec<&str> = Point::FIELDS.iter().map(|field| field.name).collect();
    assert_eq!(names, vec!["0", "1"]);
}

#[test]
fn test_generic_struct_fingerprint() {
    let first = Tagged {
        tag: 1,
        payload: "same".to_string(),
    };
    let second = Tagged {
        tag: 2,
        payload: "same".to_string(),
    };
    let payload = FieldMask::new(0b10);
    assert_eq!(
        compute_fingerprint(payload, &first).unwrap(),
        compute_fingerprint(payload, &second).unwrap()
    );
    assert_ne!(
        compute_fingerprint(FieldMask::new(0b11), &first).unwrap(),
        compute_fingerprint(FieldMask::new(0b11), &second).unwrap()
    );
}

#[test]
fn test_nested_struct_is_a_single_field() {
    let sent_at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let shipment = |id, x| Shipment {
        id,
        origin: Point(x, 4),
        sent_at,
        transit: None,
    };
    let origin = FieldMask::from_indices([1]).unwrap();
    assert_eq!(
        compute_fingerprint(origin, &shipment(1, 3)).unwrap(),
        compute_fingerprint(origin, &shipment(2, 3)).unwrap()
    );
    assert_ne!(
        compute_fingerprint(origin, &shipment(1, 3)).unwrap(),
        compute_fingerprint(origin, &shipment(1, 5)).unwrap()
    );
    assert_eq!(
        compute_fingerprint(origin, &shipment(1, 3)).unwrap().len(),
        8
    );
}

#[rstest]
#[case(&["id"], 0b01)]
#[case(&["name"], 0b10)]
#[case(&["name", "id"], 0b11)]
fn test_mask_from_names(#[case] names: &[&str], #[case] bits: u64) {
    assert_eq!(
        FieldMask::from_names::<Student, _, _>(names.iter()).unwrap(),
        FieldMask::new(bits)
    );
}

#[test]
fn test_named_mask_selects_the_same_field_as_its_position() {
    let first = Student {
        id: 7,
        name: "Jack".into(),
    };
    let second = Student {
        id: 9,
        name: "Jack".into(),
    };
    let by_name = FieldMask::from_names::<Student, _, _>(["name"]).unwrap();
    let position = Student::FIELDS[1].index;
    assert_eq!(by_name, FieldMask::from_indices([position]).unwrap());
    assert_eq!(
        compute_fingerprint(by_name, &first).unwrap(),
        compute_fingerprint(by_name, &second).unwrap()
    );
    assert_eq!(
        compute_fingerprint(by_name, &first).unwrap().len(),
        visit(position, &first).unwrap().encoded_len()
    );
}

#[test]
fn test_mask_from_unknown_name_fails() {
    assert!(FieldMask::from_names::<Student, _, _>(["age"]).is_err());
}

// =============================================================================
// Record
// =============================================================================

#[test]
fn test_record_conversion_names_fields() {
    let value = Student {
        id: 7,
        name: "Jack".into(),
    }
    .into_value();
    let record = value.as_record().unwrap();
    assert_eq!(record.get("id"), Some(&Value::Int(7)));
    assert_eq!(record.get("name"), Some(&Value::Str("Jack".into())));
}

#[test]
fn test_record_round_trip_through_value() {
    let point = Point(3, -4);
    assert_eq!(Point::from_value(point.clone().into_value()).unwrap(), point);
}

#[test]
fn test_hand_built_record_converts_by_name() {
    let record = Record::new()
        .with_field("name", Value::Str("John".into()))
        .with_field("id", Value::Int(3));
    assert_eq!(
        Student::from_value(Value::Record(record)).unwrap(),
        Student {
            id: 3,
            name: "John".into()
        }
    );
}

#[test]
fn test_record_missing_field_fails() {
    let record = Record::new().with_field("id", Value::Int(3));
    assert_eq!(
        Student::from_value(Value::Record(record)),
        Err(DispatchError::MissingField {
            name: "name".to_string()
        })
    );
}

#[test]
fn test_record_from_scalar_fails() {
    assert_eq!(
        Student::from_value(Value::Int(1)),
        Err(DispatchError::TypeMismatch {
            expected: "record",
            found: "int"
        })
    );
}

#[test]
fn test_derived_types_flow_through_dispatch() {
    let new_student = Callable::new(|id: i64, name: String| Student { id, name });
    let students = zip_with(&new_student, vec![7, 3, 11], vec!["Jack", "John"]).unwrap();
    let names = Callable::new(|student: Student| student.name);
    assert_eq!(
        map(&names, students).unwrap(),
        vec![Value::Str("Jack".into()), Value::Str("John".into())]
    );
}
