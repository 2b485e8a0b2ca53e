//! Opaque run-time values.
//!
//! [`Value`] carries any argument or result through the dispatch core
//! without the core inspecting it beyond "is it a collection". [`List`]
//! is the only collection-shaped variant.
//!
//! [`List`]: Value::List
//!
//! Typed Rust values enter and leave through [`IntoValue`] and
//! [`FromValue`]. Structs take part by deriving `Record`, which converts
//! them to and from a [`Record`].
//!
//! # Examples
//!
//! ```rust
//! use fpkit::value::{FromValue, IntoValue, Value};
//!
//! let value = vec![4_i32, 7].into_value();
//! assert_eq!(value, Value::List(vec![Value::Int(4), Value::Int(7)]));
//!
//! let back: Vec<i32> = Vec::from_value(value).unwrap();
//! assert_eq!(back, vec![4, 7]);
//! ```

mod convert;
mod record;

use std::fmt;

use crate::fingerprint::{FieldBytes, Fields};

pub use convert::{FromValue, IntoValue};
pub use record::Record;

/// A dynamically shaped value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The absent value.
    #[default]
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer that does not fit [`Value::Int`].
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A Unicode scalar value.
    Char(char),
    /// An owned string.
    Str(String),
    /// An ordered sequence; the only collection-shaped variant.
    List(Vec<Value>),
    /// A struct-like value with named fields in declaration order.
    Record(Record),
}

impl Value {
    /// Name of the variant, as used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    /// Returns `true` for [`Value::List`].
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` for [`Value::Nil`].
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Borrows the items of a [`Value::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the record of a [`Value::Record`].
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    const fn tag(&self) -> u8 {
        match self {
            Self::Nil => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::UInt(_) => 3,
            Self::Float(_) => 4,
            Self::Char(_) => 5,
            Self::Str(_) => 6,
            Self::List(_) => 7,
            Self::Record(_) => 8,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => formatter.write_str("nil"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::UInt(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Char(value) => write!(formatter, "{value:?}"),
            Self::Str(value) => write!(formatter, "{value:?}"),
            Self::List(items) => {
                formatter.write_str("[")?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{item}")?;
                }
                formatter.write_str("]")
            }
            Self::Record(record) => write!(formatter, "{record}"),
        }
    }
}

// A value's encoding starts with its variant tag so that, for example,
// `Int(1)` and `UInt(1)` never collide.
impl FieldBytes for Value {
    fn encoded_len(&self) -> usize {
        1 + match self {
            Self::Nil => 0,
            Self::Bool(value) => value.encoded_len(),
            Self::Int(value) => value.encoded_len(),
            Self::UInt(value) => value.encoded_len(),
            Self::Float(value) => value.encoded_len(),
            Self::Char(value) => value.encoded_len(),
            Self::Str(value) => value.encoded_len(),
            Self::List(items) => items.encoded_len(),
            Self::Record(record) => record.encoded_len(),
        }
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        sink.push(self.tag());
        match self {
            Self::Nil => {}
            Self::Bool(value) => value.write_bytes(sink),
            Self::Int(value) => value.write_bytes(sink),
            Self::UInt(value) => value.write_bytes(sink),
            Self::Float(value) => value.write_bytes(sink),
            Self::Char(value) => value.write_bytes(sink),
            Self::Str(value) => value.write_bytes(sink),
            Self::List(items) => items.write_bytes(sink),
            Self::Record(record) => record.write_bytes(sink),
        }
    }
}

/// A record's fields and a list's items are the positional fields of a
/// value; scalars have none.
impl Fields for Value {
    fn field_count(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Record(record) => record.len(),
            _ => 0,
        }
    }

    fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
        match self {
            Self::List(items) => items.get(index).map(|item| item as &dyn FieldBytes),
            Self::Record(record) => record.field(index),
            _ => None,
        }
    }
}
