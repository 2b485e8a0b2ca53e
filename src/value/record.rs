//! Struct-like values with named fields.

use std::fmt;

use super::Value;
use crate::dispatch::DispatchError;
use crate::fingerprint::{FieldBytes, Fields, LENGTH_PREFIX, write_length};

/// Named fields in declaration order.
///
/// A record is what a struct becomes inside the dispatch core. Field order
/// is significant: it is the order field masks index into.
///
/// # Examples
///
/// ```rust
/// use fpkit::value::{Record, Value};
///
/// let record = Record::new()
///     .with_field("id", Value::Int(7))
///     .with_field("name", Value::Str("Jack".into()));
///
/// assert_eq!(record.get("name"), Some(&Value::Str("Jack".into())));
/// assert_eq!(record.field_at(0), Some(("id", &Value::Int(7))));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(Box<str>, Value)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field, builder style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<Box<str>>, value: Value) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<Box<str>>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field_name, _)| &**field_name == name)
            .map(|(_, value)| value)
    }

    /// The field at `index` with its name.
    #[must_use]
    pub fn field_at(&self, index: usize) -> Option<(&str, &Value)> {
        self.fields
            .get(index)
            .map(|(name, value)| (&**name, value))
    }

    /// Moves the value of the field called `name` out, leaving
    /// [`Value::Nil`] in its place.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingField`] if there is no such field.
    pub fn take(&mut self, name: &str) -> Result<Value, DispatchError> {
        self.fields
            .iter_mut()
            .find(|(field_name, _)| &**field_name == name)
            .map(|(_, value)| std::mem::take(value))
            .ok_or_else(|| DispatchError::MissingField {
                name: name.to_string(),
            })
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| &**name)
    }

    /// Field values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }
}

impl<N: Into<Box<str>>> FromIterator<(N, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(fields: I) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("{")?;
        for (position, (name, value)) in self.fields.iter().enumerate() {
            if position > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{name}: {value}")?;
        }
        formatter.write_str("}")
    }
}

// Names are not encoded. The field count is, so a nested record cannot
// borrow bytes from the fields that follow it.
impl FieldBytes for Record {
    fn encoded_len(&self) -> usize {
        LENGTH_PREFIX + self.values().map(FieldBytes::encoded_len).sum::<usize>()
    }

    fn write_bytes(&self, sink: &mut Vec<u8>) {
        write_length(self.len(), sink);
        for value in self.values() {
            value.write_bytes(sink);
        }
    }
}

impl Fields for Record {
    fn field_count(&self) -> usize {
        self.len()
    }

    fn field(&self, index: usize) -> Option<&dyn FieldBytes> {
        self.fields
            .get(index)
            .map(|(_, value)| value as &dyn FieldBytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Record {
        Record::new()
            .with_field("id", Value::Int(7))
            .with_field("name", Value::Str("Jack".into()))
    }

    #[test]
    fn test_take_moves_value_out() {
        let mut record = student();
        assert_eq!(record.take("id"), Ok(Value::Int(7)));
        assert_eq!(record.get("id"), Some(&Value::Nil));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_take_missing_field_fails() {
        let mut record = student();
        assert_eq!(
            record.take("age"),
            Err(DispatchError::MissingField {
                name: "age".to_string()
            })
        );
    }

    #[test]
    fn test_names_keep_declaration_order() {
        assert_eq!(student().names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_collect_from_pairs() {
        let record: Record = [("id", Value::Int(7)), ("name", Value::Str("Jack".into()))]
            .into_iter()
            .collect();
        assert_eq!(record, student());
    }

    #[test]
    fn test_display() {
        assert_eq!(student().to_string(), "{id: 7, name: \"Jack\"}");
    }
}
