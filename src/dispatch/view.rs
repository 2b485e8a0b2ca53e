//! Uniform element access over collection and scalar inputs.

use std::slice;
use std::vec;

use super::{Arguments, DispatchError};
use crate::value::{IntoValue, Value};

/// The elements of an operation's input.
///
/// A [`Value::List`] yields its items. Any other value, [`Value::Nil`]
/// included, is promoted to a one-element collection.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::CollectionView;
/// use fpkit::value::Value;
///
/// assert_eq!(CollectionView::promote(vec![4, 7]).len(), 2);
/// assert_eq!(CollectionView::promote(42).as_slice(), &[Value::Int(42)]);
/// assert_eq!(CollectionView::promote(Value::Nil).len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectionView {
    elements: Vec<Value>,
}

impl CollectionView {
    /// Views `value` as a collection.
    pub fn promote(value: impl IntoValue) -> Self {
        match value.into_value() {
            Value::List(elements) => Self { elements },
            scalar => Self {
                elements: vec![scalar],
            },
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if there are no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.elements.iter()
    }

    /// Consumes the view, returning the elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.elements
    }
}

impl IntoIterator for CollectionView {
    type Item = Value;
    type IntoIter = vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a CollectionView {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl From<CollectionView> for Value {
    fn from(view: CollectionView) -> Self {
        Self::List(view.elements)
    }
}

impl IntoValue for CollectionView {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

/// Binds one element to a callable of the given arity.
///
/// A unary callable receives the element whole. Any other arity spreads the
/// element's parts, promoting a scalar to a single part.
pub(crate) fn bind_element(element: Value, arity: usize) -> Result<Arguments, DispatchError> {
    if arity == 1 {
        return Ok(Arguments::from_iter([element]));
    }

    let parts = CollectionView::promote(element);
    if parts.len() != arity {
        tracing::debug!(
            expected = arity,
            given = parts.len(),
            "element does not spread to the callable's arity"
        );
        return Err(DispatchError::ArityMismatch {
            expected: arity,
            given: parts.len(),
        });
    }
    Ok(parts.into_iter().collect())
}
