//! Conversions between typed Rust values and [`Value`].

use super::{Record, Value};
use crate::dispatch::DispatchError;

/// Conversion of a typed value into a [`Value`].
///
/// Tuples deliberately do not implement this trait: a tuple returned from a
/// callable means several return values, not one aggregate.
pub trait IntoValue {
    /// Performs the conversion.
    fn into_value(self) -> Value;
}

/// Conversion of a [`Value`] back into a typed value.
pub trait FromValue: Sized {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TypeMismatch`] when `value` has the wrong
    /// shape or does not fit the target type.
    fn from_value(value: Value) -> Result<Self, DispatchError>;
}

const fn mismatch(expected: &'static str, found: &Value) -> DispatchError {
    DispatchError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl IntoValue for Value {
    #[inline]
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        Ok(value)
    }
}

macro_rules! impl_value_for_signed {
    ($($integer:ty),* $(,)?) => {
        $(
            impl IntoValue for $integer {
                #[inline]
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }

            impl FromValue for $integer {
                fn from_value(value: Value) -> Result<Self, DispatchError> {
                    match value {
                        Value::Int(number) => {
                            Self::try_from(number).map_err(|_| mismatch(stringify!($integer), &value))
                        }
                        Value::UInt(number) => {
                            Self::try_from(number).map_err(|_| mismatch(stringify!($integer), &value))
                        }
                        other => Err(mismatch(stringify!($integer), &other)),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_value_for_unsigned {
    ($($integer:ty),* $(,)?) => {
        $(
            impl IntoValue for $integer {
                #[inline]
                fn into_value(self) -> Value {
                    let wide = u64::from(self);
                    i64::try_from(wide).map_or(Value::UInt(wide), Value::Int)
                }
            }

            impl FromValue for $integer {
                fn from_value(value: Value) -> Result<Self, DispatchError> {
                    match value {
                        Value::Int(number) => {
                            Self::try_from(number).map_err(|_| mismatch(stringify!($integer), &value))
                        }
                        Value::UInt(number) => {
                            Self::try_from(number).map_err(|_| mismatch(stringify!($integer), &value))
                        }
                        other => Err(mismatch(stringify!($integer), &other)),
                    }
                }
            }
        )*
    };
}

impl_value_for_signed!(i8, i16, i32, i64);
impl_value_for_unsigned!(u8, u16, u32, u64);

// Pointer-sized integers are at most 64 bits wide on every supported target.
impl IntoValue for isize {
    #[allow(clippy::cast_possible_truncation)]
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl FromValue for isize {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        i64::from_value(value).and_then(|number| {
            Self::try_from(number).map_err(|_| mismatch("isize", &Value::Int(number)))
        })
    }
}

impl IntoValue for usize {
    #[allow(clippy::cast_possible_truncation)]
    fn into_value(self) -> Value {
        (self as u64).into_value()
    }
}

impl FromValue for usize {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        u64::from_value(value).and_then(|number| {
            Self::try_from(number).map_err(|_| mismatch("usize", &Value::UInt(number)))
        })
    }
}

impl IntoValue for f64 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Float(number) => Ok(number),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl IntoValue for f32 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        f64::from_value(value).map(|number| number as Self)
    }
}

impl IntoValue for bool {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl IntoValue for char {
    #[inline]
    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Char(character) => Ok(character),
            other => Err(mismatch("char", &other)),
        }
    }
}

impl IntoValue for String {
    #[inline]
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    #[inline]
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Str(text) => Ok(text),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl IntoValue for Record {
    #[inline]
    fn into_value(self) -> Value {
        Value::Record(self)
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Record(record) => Ok(record),
            other => Err(mismatch("record", &other)),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Nil, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue + Clone> IntoValue for &[T] {
    fn into_value(self) -> Value {
        Value::List(self.iter().cloned().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("list", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_unsigned_becomes_int() {
        assert_eq!(7_u8.into_value(), Value::Int(7));
        assert_eq!(u64::MAX.into_value(), Value::UInt(u64::MAX));
    }

    #[test]
    fn test_narrowing_is_range_checked() {
        assert_eq!(i8::from_value(Value::Int(-128)), Ok(-128));
        assert_eq!(
            i8::from_value(Value::Int(300)),
            Err(DispatchError::TypeMismatch {
                expected: "i8",
                found: "int"
            })
        );
        assert!(u32::from_value(Value::Int(-1)).is_err());
        assert_eq!(i64::from_value(Value::UInt(5)), Ok(5));
    }

    #[test]
    fn test_wrong_variant_names_both_sides() {
        assert_eq!(
            bool::from_value(Value::Str("yes".into())),
            Err(DispatchError::TypeMismatch {
                expected: "bool",
                found: "string"
            })
        );
    }

    #[test]
    fn test_option_maps_nil() {
        assert_eq!(None::<i32>.into_value(), Value::Nil);
        assert_eq!(Option::<i32>::from_value(Value::Nil), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Int(3)), Ok(Some(3)));
    }

    #[test]
    fn test_nested_vectors_round_trip() {
        let nested = vec![vec![1_i32], vec![2, 3]];
        let value = nested.clone().into_value();
        assert_eq!(Vec::<Vec<i32>>::from_value(value), Ok(nested));
    }

    #[test]
    fn test_slices_and_arrays_become_lists() {
        let slice: &[f64] = &[1.0, 2.0];
        assert_eq!(
            slice.into_value(),
            Value::List(vec![Value::Float(1.0), Value::Float(2.0)])
        );
        assert_eq!(["a", "b"].into_value().as_list().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_f32_widens_exactly() {
        assert_eq!(10.13_f32.into_value(), Value::Float(f64::from(10.13_f32)));
        assert_eq!(f32::from_value(Value::Float(f64::from(10.13_f32))), Ok(10.13_f32));
    }
}
