//! Element-wise operations over collection views.
//!
//! Every operation promotes its input with [`CollectionView::promote`], so a
//! scalar behaves like a one-element collection. Operations returning a
//! fresh sequence come first; the `*_into` forms write into a caller-owned
//! typed destination and return how many slots they wrote.
//!
//! Destinations are validated before they are touched: a call that fails
//! for capacity or conversion leaves every slot as it was.

use tracing::debug;

use super::view::bind_element;
use super::{Callable, CollectionView, DispatchError};
use crate::value::{FromValue, IntoValue, Value};

fn expect_arity(callable: &Callable, given: usize) -> Result<(), DispatchError> {
    if callable.arity() == given {
        Ok(())
    } else {
        debug!(
            expected = callable.arity(),
            given, "rejected callable with wrong arity"
        );
        Err(DispatchError::ArityMismatch {
            expected: callable.arity(),
            given,
        })
    }
}

fn expect_returns(
    operation: &'static str,
    callable: &Callable,
    expected: usize,
) -> Result<(), DispatchError> {
    if callable.returns() == expected {
        Ok(())
    } else {
        debug!(
            operation,
            expected,
            declared = callable.returns(),
            "rejected callable with wrong return count"
        );
        Err(DispatchError::ReturnShape {
            operation,
            expected,
            declared: callable.returns(),
        })
    }
}

/// Keeps the elements for which `predicate` returns `true`.
///
/// # Errors
///
/// - [`DispatchError::ArityMismatch`] unless `predicate` takes one argument
/// - [`DispatchError::ReturnShape`] unless it returns one value
/// - [`DispatchError::TypeMismatch`] if that value is not a boolean
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::{Callable, filter};
/// use fpkit::value::Value;
///
/// let passing = Callable::new(|score: i64| score >= 90);
/// let kept = filter(&passing, vec![23, 90, 67, 6878, 90, 8]).unwrap();
/// assert_eq!(kept, vec![Value::Int(90), Value::Int(6878), Value::Int(90)]);
/// ```
pub fn filter(
    predicate: &Callable,
    collection: impl IntoValue,
) -> Result<Vec<Value>, DispatchError> {
    expect_arity(predicate, 1)?;
    expect_returns("filter", predicate, 1)?;

    let mut retained = Vec::new();
    for element in CollectionView::promote(collection) {
        if bool::from_value(predicate.invoke([element.clone()])?)? {
            retained.push(element);
        }
    }
    Ok(retained)
}

/// Applies `function` to every element.
///
/// A unary function receives each element whole. A function of any other
/// arity receives the parts of each element spread across its parameters.
/// Results follow the one-vs-many rule of [`Callable::invoke`].
///
/// # Errors
///
/// Returns [`DispatchError::ArityMismatch`] when an element does not spread
/// to the function's arity, or any error raised by the function.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::{Callable, map};
/// use fpkit::value::Value;
///
/// let square = Callable::new(|value: i64| value * value);
/// assert_eq!(map(&square, vec![4, 7]).unwrap(), vec![Value::Int(16), Value::Int(49)]);
///
/// let add = Callable::new(|first: i64, second: i64| first + second);
/// let pairs = vec![vec![1, 2], vec![3, 4]];
/// assert_eq!(map(&add, pairs).unwrap(), vec![Value::Int(3), Value::Int(7)]);
/// ```
pub fn map(function: &Callable, collection: impl IntoValue) -> Result<Vec<Value>, DispatchError> {
    CollectionView::promote(collection)
        .into_iter()
        .map(|element| function.invoke(bind_element(element, function.arity())?))
        .collect()
}

/// Applies `function` pairwise to elements at the same index.
///
/// The result is as long as the shorter input; the rest of the longer one is
/// ignored.
///
/// # Errors
///
/// Returns [`DispatchError::ArityMismatch`] unless `function` takes two
/// arguments, or any error raised by the function.
pub fn zip_with(
    function: &Callable,
    left: impl IntoValue,
    right: impl IntoValue,
) -> Result<Vec<Value>, DispatchError> {
    expect_arity(function, 2)?;

    CollectionView::promote(left)
        .into_iter()
        .zip(CollectionView::promote(right))
        .map(|(first, second)| function.invoke([first, second]))
        .collect()
}

/// Left fold seeded with the first element.
///
/// Returns `None` for an empty collection and the sole element unchanged for
/// a one-element collection.
///
/// # Errors
///
/// - [`DispatchError::ArityMismatch`] unless `function` takes two arguments
/// - [`DispatchError::ReturnShape`] unless it returns one value
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::{Callable, fold};
/// use fpkit::value::Value;
///
/// let sum = Callable::new(|total: i64, next: i64| total + next);
/// assert_eq!(fold(&sum, vec![-23, 90, 67, 90, 8]).unwrap(), Some(Value::Int(232)));
/// assert_eq!(fold(&sum, Vec::<i64>::new()).unwrap(), None);
/// ```
pub fn fold(function: &Callable, collection: impl IntoValue) -> Result<Option<Value>, DispatchError> {
    expect_arity(function, 2)?;
    expect_returns("fold", function, 1)?;

    let mut elements = CollectionView::promote(collection).into_iter();
    let Some(first) = elements.next() else {
        return Ok(None);
    };
    elements
        .try_fold(first, |accumulator, next| function.invoke([accumulator, next]))
        .map(Some)
}

/// Feeds every element to `reducer` together with `destination`.
///
/// `reducer` runs exactly once per element, in order. Elements are converted
/// to `T` before the first call, so a conversion failure leaves
/// `destination` untouched.
///
/// # Errors
///
/// Returns [`DispatchError::TypeMismatch`] if an element does not convert to
/// `T`.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::reduce;
///
/// let mut temperatures = Vec::new();
/// reduce(
///     |collected: &mut Vec<f64>, value: f64| collected.push(value),
///     &mut temperatures,
///     vec![5.0, 76.0, -7.0],
/// )
/// .unwrap();
/// assert_eq!(temperatures, vec![5.0, 76.0, -7.0]);
/// ```
pub fn reduce<D, T, F>(
    mut reducer: F,
    destination: &mut D,
    collection: impl IntoValue,
) -> Result<(), DispatchError>
where
    D: ?Sized,
    T: FromValue,
    F: FnMut(&mut D, T),
{
    let elements = CollectionView::promote(collection)
        .into_iter()
        .map(T::from_value)
        .collect::<Result<Vec<_>, _>>()?;
    for element in elements {
        reducer(&mut *destination, element);
    }
    Ok(())
}

/// Splices list elements into the output, one level deep.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::flat;
/// use fpkit::value::{IntoValue, Value};
///
/// let flattened = flat(vec![vec![7, 7], vec![9, 9]]);
/// assert_eq!(flattened, vec![Value::Int(7), Value::Int(7), Value::Int(9), Value::Int(9)]);
///
/// let deep = flat(vec![vec![vec![1]]]);
/// assert_eq!(deep, vec![vec![1].into_value()]);
/// ```
pub fn flat(collection: impl IntoValue) -> Vec<Value> {
    let view = CollectionView::promote(collection);
    let mut flattened = Vec::with_capacity(view.len());
    for element in view {
        match element {
            Value::List(members) => flattened.extend(members),
            scalar => flattened.push(scalar),
        }
    }
    flattened
}

/// Splits every element in two with `function`.
///
/// The first value of each call goes to the first sequence, the second value
/// to the second, so indices correspond.
///
/// # Errors
///
/// - [`DispatchError::ArityMismatch`] unless `function` takes one argument
/// - [`DispatchError::ReturnShape`] unless it returns two values
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::{Callable, unzip_with};
/// use fpkit::value::Value;
///
/// let split = Callable::new(|value: i64| (value, -value));
/// let (positive, negative) = unzip_with(&split, vec![7, 0]).unwrap();
/// assert_eq!(positive, vec![Value::Int(7), Value::Int(0)]);
/// assert_eq!(negative, vec![Value::Int(-7), Value::Int(0)]);
/// ```
pub fn unzip_with(
    function: &Callable,
    collection: impl IntoValue,
) -> Result<(Vec<Value>, Vec<Value>), DispatchError> {
    expect_arity(function, 1)?;
    expect_returns("unzip_with", function, 2)?;

    let view = CollectionView::promote(collection);
    let mut firsts = Vec::with_capacity(view.len());
    let mut seconds = Vec::with_capacity(view.len());
    for element in view {
        let [first, second] = <[Value; 2]>::try_from(function.call([element])?.into_vec())
            .map_err(|produced| DispatchError::ReturnCountMismatch {
                expected: 2,
                produced: produced.len(),
            })?;
        firsts.push(first);
        seconds.push(second);
    }
    Ok((firsts, seconds))
}

fn convert_for<T: FromValue>(
    capacity: usize,
    results: Vec<Value>,
) -> Result<Vec<T>, DispatchError> {
    if results.len() > capacity {
        debug!(
            capacity,
            required = results.len(),
            "destination too small for results"
        );
        return Err(DispatchError::CapacityExceeded {
            capacity,
            required: results.len(),
        });
    }
    results.into_iter().map(T::from_value).collect()
}

fn write_into<T>(destination: &mut [T], converted: Vec<T>) -> usize {
    let count = converted.len();
    for (slot, value) in destination.iter_mut().zip(converted) {
        *slot = value;
    }
    count
}

fn store<T: FromValue>(destination: &mut [T], results: Vec<Value>) -> Result<usize, DispatchError> {
    let converted = convert_for(destination.len(), results)?;
    Ok(write_into(destination, converted))
}

/// [`filter`] into a typed destination.
///
/// # Errors
///
/// Everything [`filter`] raises, plus [`DispatchError::CapacityExceeded`]
/// and [`DispatchError::TypeMismatch`] for the destination.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::{Callable, filter_into};
///
/// let even = Callable::new(|value: i64| value % 2 == 0);
/// let mut destination = [0_i32; 4];
/// let written = filter_into(&even, vec![1, 2, 3, 4], &mut destination).unwrap();
/// assert_eq!(&destination[..written], &[2, 4]);
/// ```
pub fn filter_into<T: FromValue>(
    predicate: &Callable,
    collection: impl IntoValue,
    destination: &mut [T],
) -> Result<usize, DispatchError> {
    store(destination, filter(predicate, collection)?)
}

/// [`map`] into a typed destination.
///
/// # Errors
///
/// Everything [`map`] raises, plus [`DispatchError::CapacityExceeded`] and
/// [`DispatchError::TypeMismatch`] for the destination.
pub fn map_into<T: FromValue>(
    function: &Callable,
    collection: impl IntoValue,
    destination: &mut [T],
) -> Result<usize, DispatchError> {
    store(destination, map(function, collection)?)
}

/// [`flat`] into a typed destination.
///
/// # Errors
///
/// [`DispatchError::CapacityExceeded`] and [`DispatchError::TypeMismatch`]
/// for the destination.
pub fn flat_into<T: FromValue>(
    collection: impl IntoValue,
    destination: &mut [T],
) -> Result<usize, DispatchError> {
    store(destination, flat(collection))
}

/// [`zip_with`] into a typed destination.
///
/// # Errors
///
/// Everything [`zip_with`] raises, plus [`DispatchError::CapacityExceeded`]
/// and [`DispatchError::TypeMismatch`] for the destination.
pub fn zip_with_into<T: FromValue>(
    function: &Callable,
    left: impl IntoValue,
    right: impl IntoValue,
    destination: &mut [T],
) -> Result<usize, DispatchError> {
    store(destination, zip_with(function, left, right)?)
}

/// [`fold`] into a typed slot.
///
/// Returns 1 when the slot was written and 0 for an empty collection, which
/// leaves the slot untouched.
///
/// # Errors
///
/// Everything [`fold`] raises, plus [`DispatchError::TypeMismatch`] for the
/// slot.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::{Callable, fold_into};
///
/// let sum = Callable::new(|total: i64, next: i64| total + next);
/// let mut total = 0_i64;
/// assert_eq!(fold_into(&sum, vec![1, 2, 3], &mut total).unwrap(), 1);
/// assert_eq!(total, 6);
/// ```
pub fn fold_into<T: FromValue>(
    function: &Callable,
    collection: impl IntoValue,
    slot: &mut T,
) -> Result<usize, DispatchError> {
    match fold(function, collection)? {
        Some(result) => {
            *slot = T::from_value(result)?;
            Ok(1)
        }
        None => Ok(0),
    }
}

/// [`unzip_with`] into two typed destinations.
///
/// Both destinations are validated before either is written.
///
/// # Errors
///
/// Everything [`unzip_with`] raises, plus
/// [`DispatchError::CapacityExceeded`] and [`DispatchError::TypeMismatch`]
/// for either destination.
pub fn unzip_with_into<A: FromValue, B: FromValue>(
    function: &Callable,
    collection: impl IntoValue,
    firsts: &mut [A],
    seconds: &mut [B],
) -> Result<usize, DispatchError> {
    let (first_results, second_results) = unzip_with(function, collection)?;
    let converted_firsts = convert_for(firsts.len(), first_results)?;
    let converted_seconds = convert_for(seconds.len(), second_results)?;
    write_into(seconds, converted_seconds);
    Ok(write_into(firsts, converted_firsts))
}
