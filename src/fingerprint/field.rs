//! Field introspection and canonical field encodings.
//!
//! A fingerprint never copies raw memory. Each selected field writes its
//! canonical byte representation through [`FieldBytes`], which keeps the
//! result independent of struct layout, padding and pointer values.
//!
//! # Encodings
//!
//! | Type                          | Bytes                                            |
//! |-------------------------------|--------------------------------------------------|
//! | `bool`                        | 1 byte, `0` or `1`                               |
//! | fixed-width integers          | little-endian, `size_of` bytes                   |
//! | `usize` / `isize`             | little-endian, 8 bytes                           |
//! | `f32` / `f64`                 | little-endian IEEE-754 bit pattern               |
//! | `char`                        | little-endian scalar value, 4 bytes              |
//! | `str` / `String`              | 8-byte length, then UTF-8 bytes                  |
//! | `[T]` / `Vec<T>`              | 8-byte length, then each element                 |
//! | `Record`                      | 8-byte field count, then each field value        |
//! | `[T; N]`                      | each element                                     |
//! | `Option<T>`                   | 1 tag byte, then the payload when present        |
//! | tuples                        | each component in order                          |
//! | `Duration`                    | 8-byte seconds, 4-byte nanoseconds               |
//! | `SystemTime`                  | 1 sign byte, then the distance from the epoch     |
//!
//! Floats compare by bit pattern: `0.0` and `-0.0` differ, and a NaN equals
//! itself only when the payloads match.

use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Static description of one struct field.
///
/// `offset` and `size` describe the in-memory layout reported by the
/// compiler. They are informational; fingerprints use the canonical
/// encoding, whose length is [`FieldBytes::encoded_len`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Declared name, or the position for tuple struct fields.
    pub name: &'static str,
    /// Position in declaration order; the mask bit that selects the field.
    pub index: usize,
    /// Byte offset within the struct.
    pub offset: usize,
    /// In-memory size of the field type.
    pub size: usize,
}

impl FieldDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, index: usize, offset: usize, size: usize) -> Self {
        Self {
            name,
            index,
            offset,
            size,
        }
    }
}

/// Canonical byte encoding of a single field value.
///
/// `encoded_len` must return exactly the number of bytes `write_bytes`
/// appends; the fingerprint is allocated from the former and filled by the
/// latter.
pub trait FieldBytes {
    /// Number of bytes [`write_bytes`](FieldBytes::write_bytes) appends.
    fn encoded_len(&self) -> usize;

    /// Appends the encoding to `sink`.
    fn write_bytes(&self, sink: &mut Vec<u8>);
}

/// Positional access to the fields of a struct-like value.
///
/// Derive it with `#[derive(Fields)]`. Index `i` is the `i`-th field in
/// declaration order.
pub trait Fields {
    /// Number of fields the value exposes.
    fn field_count(&self) -> usize;

    /// The field at `index`, or `None` past the last field.
    fn field(&self, index: usize) -> Option<&dyn FieldBytes>;
}

/// A descriptor table shared by every value of a struct type.
///
/// Masks always index the positions of [`Fields::field`]. The table only
/// resolves field names to those positions for
/// [`FieldMask::from_names`](super::FieldMask::from_names) and describes
/// the layout; fingerprinting never reads it.
pub trait FieldTable: Fields {
    /// Descriptors in declaration order.
    const FIELDS: &'static [FieldDescriptor];
}

// One level of indirection is transparent: a reference to a struct exposes
// the struct's own fields.

impl<T: Fields + ?Sized> Fields for &T {
    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
        (**self).field(index)
    }
}

impl<T: Fields + ?Sized> Fields for Box<T> {
    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
        (**self).field(index)
    }
}

impl<T: Fields + ?Sized> Fields for Rc<T> {
    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
        (**self).field(index)
    }
}

impl<T: Fields + ?Sized> Fields for Arc<T> {
    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
        (**self).field(index)
    }
}

macro_rules! impl_field_bytes_for_integer {
    ($($integer:ty),* $(,)?) => {
        $(
            impl FieldBytes for $integer {
                #[inline]
                fn encoded_len(&self) -> usize {
                    size_of::<$integer>()
                }

                #[inline]
                fn write_bytes(&self, sink: &mut Vec<u8>) {
                    sink.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_field_bytes_for_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

pub(crate) fn write_length(length: usize, sink: &mut Vec<u8>) {
    (length as u64).write_bytes(sink);
}

pub(crate) const LENGTH_PREFIX: usize = size_of::<u64>();

impl FieldBytes for usize {
    fn encoded_len(&self) -> usize {
        size_of::<u64>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        (*self as u64).write_bytes(sink);
    }
}

impl FieldBytes for isize {
    fn encoded_len(&self) -> usize {
        size_of::<i64>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        (*self as i64).write_bytes(sink);
    }
}

impl FieldBytes for bool {
    fn encoded_len(&self) -> usize {
        1
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        sink.push(u8::from(*self));
    }
}

impl FieldBytes for char {
    fn encoded_len(&self) -> usize {
        size_of::<u32>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        u32::from(*self).write_bytes(sink);
    }
}

impl FieldBytes for f32 {
    fn encoded_len(&self) -> usize {
        size_of::<u32>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        self.to_bits().write_bytes(sink);
    }
}

impl FieldBytes for f64 {
    fn encoded_len(&self) -> usize {
        size_of::<u64>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        self.to_bits().write_bytes(sink);
    }
}

impl FieldBytes for () {
    fn encoded_len(&self) -> usize {
        0
    }

    fn write_bytes(&self, _sink: &mut Vec<u8>) {}
}

impl FieldBytes for str {
    fn encoded_len(&self) -> usize {
        LENGTH_PREFIX + self.len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        write_length(self.len(), sink);
        sink.extend_from_slice(self.as_bytes());
    }
}

impl FieldBytes for String {
    fn encoded_len(&self) -> usize {
        self.as_str().encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        self.as_str().write_bytes(sink);
    }
}

impl<T: FieldBytes> FieldBytes for [T] {
    fn encoded_len(&self) -> usize {
        LENGTH_PREFIX + self.iter().map(FieldBytes::encoded_len).sum::<usize>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        write_length(self.len(), sink);
        for element in self {
            element.write_bytes(sink);
        }
    }
}

impl<T: FieldBytes> FieldBytes for Vec<T> {
    fn encoded_len(&self) -> usize {
        self.as_slice().encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        self.as_slice().write_bytes(sink);
    }
}

impl<T: FieldBytes, const N: usize> FieldBytes for [T; N] {
    fn encoded_len(&self) -> usize {
        self.iter().map(FieldBytes::encoded_len).sum()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        for element in self {
            element.write_bytes(sink);
        }
    }
}

impl<T: FieldBytes> FieldBytes for Option<T> {
    fn encoded_len(&self) -> usize {
        1 + self.as_ref().map_or(0, FieldBytes::encoded_len)
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        match self {
            Some(inner) => {
                sink.push(1);
                inner.write_bytes(sink);
            }
            None => sink.push(0),
        }
    }
}

impl<T: FieldBytes + ?Sized> FieldBytes for &T {
    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        (**self).write_bytes(sink);
    }
}

impl<T: FieldBytes + ?Sized> FieldBytes for Box<T> {
    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        (**self).write_bytes(sink);
    }
}

impl<T: FieldBytes + ?Sized> FieldBytes for Rc<T> {
    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        (**self).write_bytes(sink);
    }
}

impl<T: FieldBytes + ?Sized> FieldBytes for Arc<T> {
    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        (**self).write_bytes(sink);
    }
}

impl FieldBytes for Duration {
    fn encoded_len(&self) -> usize {
        size_of::<u64>() + size_of::<u32>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        self.as_secs().write_bytes(sink);
        self.subsec_nanos().write_bytes(sink);
    }
}

impl FieldBytes for SystemTime {
    fn encoded_len(&self) -> usize {
        1 + Duration::ZERO.encoded_len()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => {
                sink.push(1);
                after.write_bytes(sink);
            }
            Err(before) => {
                sink.push(0);
                before.duration().write_bytes(sink);
            }
        }
    }
}

// A tuple is encoded as its components in order and exposes them as
// positional fields.
macro_rules! impl_fields_for_tuple {
    ($count:literal; $($component:ident @ $index:tt),+) => {
        paste::paste! {
            impl<$($component: FieldBytes),+> FieldBytes for ($($component,)+) {
                fn encoded_len(&self) -> usize {
                    let ($([<$component:lower>],)+) = self;
                    0 $(+ [<$component:lower>].encoded_len())+
                }

                fn write_bytes(&self, sink: &mut Vec<u8>) {
                    let ($([<$component:lower>],)+) = self;
                    $([<$component:lower>].write_bytes(sink);)+
                }
            }

            impl<$($component: FieldBytes),+> Fields for ($($component,)+) {
                fn field_count(&self) -> usize {
                    $count
                }

                fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
                    match index {
                        $($index => Some(&self.$index),)+
                        _ => None,
                    }
                }
            }
        }
    };
}

impl_fields_for_tuple!(1; A @ 0);
impl_fields_for_tuple!(2; A @ 0, B @ 1);
impl_fields_for_tuple!(3; A @ 0, B @ 1, C @ 2);
impl_fields_for_tuple!(4; A @ 0, B @ 1, C @ 2, D @ 3);

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: FieldBytes + ?Sized>(value: &T) -> Vec<u8> {
        let mut sink = Vec::new();
        value.write_bytes(&mut sink);
        assert_eq!(sink.len(), value.encoded_len());
        sink
    }

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(encode(&0x0102_i16), vec![0x02, 0x01]);
        assert_eq!(encode(&-1_i32), vec![0xff; 4]);
        assert_eq!(encode(&7_usize), vec![7, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_strings_carry_a_length_prefix() {
        assert_eq!(encode("ab"), vec![2, 0, 0, 0, 0, 0, 0, 0, b'a', b'b']);
        assert_eq!(encode(&String::from("ab")), encode("ab"));
    }

    #[test]
    fn test_adjacent_strings_do_not_alias() {
        assert_ne!(
            encode(&("ab".to_string(), "c".to_string())),
            encode(&("a".to_string(), "bc".to_string()))
        );
    }

    #[test]
    fn test_float_encoding_is_bitwise() {
        assert_ne!(encode(&0.0_f64), encode(&-0.0_f64));
        assert_eq!(encode(&1.5_f32), 1.5_f32.to_bits().to_le_bytes().to_vec());
    }

    #[test]
    fn test_option_tags_presence() {
        assert_eq!(encode(&None::<u8>), vec![0]);
        assert_eq!(encode(&Some(9_u8)), vec![1, 9]);
    }

    #[test]
    fn test_arrays_have_no_prefix_but_vectors_do() {
        assert_eq!(encode(&[1_u8, 2]), vec![1, 2]);
        assert_eq!(encode(&vec![1_u8, 2]).len(), 10);
    }

    #[test]
    fn test_system_time_distinguishes_sides_of_epoch() {
        let after = UNIX_EPOCH + Duration::from_secs(5);
        let before = UNIX_EPOCH - Duration::from_secs(5);
        assert_ne!(encode(&after), encode(&before));
        assert_eq!(encode(&after).len(), 13);
    }

    #[test]
    fn test_references_encode_their_target() {
        let value = 42_u32;
        assert_eq!(encode(&&value), encode(&value));
        assert_eq!(encode(&Box::new(value)), encode(&value));
        assert_eq!(encode(&Rc::new(value)), encode(&value));
    }
}
