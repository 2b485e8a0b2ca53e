//! Tagged callables: a parameter count, a return count, and an entry point.
//!
//! A [`Callable`] is how the dispatch core invokes user functions without
//! knowing their types. Ordinary Rust closures and functions become
//! callables through [`Callable::new`]; their parameter types are bound from
//! [`Value`]s with [`FromValue`] and their results converted back with
//! [`IntoValue`].
//!
//! # Return Shapes
//!
//! | Rust return type         | Declared returns |
//! |--------------------------|------------------|
//! | `()`                     | 0                |
//! | `T` where `T: IntoValue` | 1                |
//! | `(T1, T2)`               | 2                |
//! | `(T1, T2, T3)`           | 3                |
//!
//! [`Callable::invoke`] unwraps the results: a single return value comes back
//! bare, any other count comes back as a [`Value::List`].
//!
//! # Examples
//!
//! ```rust
//! use fpkit::dispatch::Callable;
//! use fpkit::value::Value;
//!
//! let add = Callable::new(|first: i64, second: i64| first + second);
//! assert_eq!(add.arity(), 2);
//! assert_eq!(add.invoke([Value::Int(7), Value::Int(2)]).unwrap(), Value::Int(9));
//!
//! let add_seven = add.curry([Value::Int(7)]).unwrap();
//! assert_eq!(add_seven.invoke([Value::Int(2)]).unwrap(), Value::Int(9));
//!
//! let swap = Callable::new(|first: i64, second: i64| (second, first));
//! assert_eq!(
//!     swap.invoke([Value::Int(7), Value::Int(3)]).unwrap(),
//!     Value::List(vec![Value::Int(3), Value::Int(7)]),
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use smallvec::{SmallVec, smallvec};

use super::DispatchError;
use crate::value::{FromValue, IntoValue, Value};

/// Arguments bound to one invocation.
pub type Arguments = SmallVec<[Value; 4]>;

/// Values produced by one invocation.
pub type Returns = SmallVec<[Value; 2]>;

type Entry = dyn Fn(Arguments) -> Result<Returns, DispatchError>;

/// A function with a fixed parameter count and a fixed return count.
///
/// Cloning is cheap; clones share the entry point.
#[derive(Clone)]
pub struct Callable {
    arity: usize,
    returns: usize,
    entry: Rc<Entry>,
}

static_assertions::assert_not_impl_any!(Callable: Send, Sync);

impl Callable {
    /// Wraps a typed Rust function.
    ///
    /// Functions of up to six parameters are supported. Each parameter type
    /// must implement [`FromValue`]; the return type decides the declared
    /// return count (see the module documentation).
    pub fn new<Parameters, Output, Function>(function: Function) -> Self
    where
        Function: IntoCallable<Parameters, Output>,
    {
        function.into_callable()
    }

    /// Wraps a dynamic entry point.
    ///
    /// The entry point always receives exactly `arity` arguments. It must
    /// produce exactly `returns` values; [`call`](Self::call) rejects any
    /// other count with [`DispatchError::ReturnCountMismatch`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::dispatch::{Arguments, Callable, Returns};
    /// use fpkit::value::Value;
    ///
    /// let count = Callable::from_raw(1, 1, |arguments: Arguments| {
    ///     let length = arguments[0].as_list().map_or(1, <[Value]>::len);
    ///     Ok(Returns::from_iter([Value::UInt(length as u64)]))
    /// });
    ///
    /// let list = Value::List(vec![Value::Nil, Value::Nil]);
    /// assert_eq!(count.invoke([list]).unwrap(), Value::UInt(2));
    /// ```
    pub fn from_raw<Function>(arity: usize, returns: usize, entry: Function) -> Self
    where
        Function: Fn(Arguments) -> Result<Returns, DispatchError> + 'static,
    {
        Self {
            arity,
            returns,
            entry: Rc::new(entry),
        }
    }

    /// Declared parameter count.
    #[inline]
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Declared return count.
    #[inline]
    #[must_use]
    pub const fn returns(&self) -> usize {
        self.returns
    }

    /// Invokes the callable and returns every produced value.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::ArityMismatch`] if the argument count differs from
    ///   [`arity`](Self::arity)
    /// - [`DispatchError::ReturnCountMismatch`] if the entry point produces a
    ///   different count than [`returns`](Self::returns)
    /// - any error raised while binding arguments or by the entry point
    pub fn call<I>(&self, arguments: I) -> Result<Returns, DispatchError>
    where
        I: IntoIterator<Item = Value>,
    {
        let arguments: Arguments = arguments.into_iter().collect();
        if arguments.len() != self.arity {
            tracing::debug!(
                expected = self.arity,
                given = arguments.len(),
                "rejected call with wrong argument count"
            );
            return Err(DispatchError::ArityMismatch {
                expected: self.arity,
                given: arguments.len(),
            });
        }

        let produced = (self.entry)(arguments)?;
        if produced.len() != self.returns {
            return Err(DispatchError::ReturnCountMismatch {
                expected: self.returns,
                produced: produced.len(),
            });
        }
        Ok(produced)
    }

    /// Invokes the callable and unwraps the results: one value comes back
    /// bare, any other count as a [`Value::List`].
    ///
    /// # Errors
    ///
    /// Same as [`call`](Self::call).
    pub fn invoke<I>(&self, arguments: I) -> Result<Value, DispatchError>
    where
        I: IntoIterator<Item = Value>,
    {
        self.call(arguments).map(unwrap_returns)
    }

    /// Fixes the leading arguments, returning a callable that takes the rest.
    ///
    /// The result is itself a callable, so currying chains to any depth.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ArityMismatch`] if more arguments are fixed
    /// than the callable takes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::dispatch::Callable;
    /// use fpkit::value::Value;
    ///
    /// let swap = Callable::new(|first: i64, second: i64| (second, first));
    /// let swap_one = swap.curry([Value::Int(7)]).unwrap();
    /// let swap_none = swap_one.curry([Value::Int(3)]).unwrap();
    ///
    /// assert_eq!(swap_none.arity(), 0);
    /// assert_eq!(
    ///     swap_none.invoke([]).unwrap(),
    ///     Value::List(vec![Value::Int(3), Value::Int(7)]),
    /// );
    /// ```
    pub fn curry<I>(&self, fixed: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = Value>,
    {
        let fixed: Arguments = fixed.into_iter().collect();
        if fixed.len() > self.arity {
            return Err(DispatchError::ArityMismatch {
                expected: self.arity,
                given: fixed.len(),
            });
        }

        let inner = self.clone();
        Ok(Self::from_raw(
            self.arity - fixed.len(),
            self.returns,
            move |remaining| inner.call(fixed.iter().cloned().chain(remaining)),
        ))
    }

    /// Fixes an arbitrary subset of arguments.
    ///
    /// `bindings` names every parameter position: [`Binding::Fixed`] supplies
    /// a value, [`Binding::Hole`] leaves the position open. The result takes
    /// one argument per hole, in order.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ArityMismatch`] if the number of bindings
    /// differs from the arity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::dispatch::{Binding, Callable};
    /// use fpkit::value::Value;
    ///
    /// let divide = Callable::new(|numerator: f64, denominator: f64| numerator / denominator);
    /// let half = divide.partial([Binding::Hole, Binding::fixed(2.0)]).unwrap();
    /// assert_eq!(half.invoke([Value::Float(10.0)]).unwrap(), Value::Float(5.0));
    /// ```
    pub fn partial<I>(&self, bindings: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = Binding>,
    {
        let bindings: SmallVec<[Binding; 4]> = bindings.into_iter().collect();
        if bindings.len() != self.arity {
            return Err(DispatchError::ArityMismatch {
                expected: self.arity,
                given: bindings.len(),
            });
        }

        let holes = bindings.iter().filter(|binding| binding.is_hole()).count();
        let inner = self.clone();
        Ok(Self::from_raw(holes, self.returns, move |remaining| {
            let mut remaining = remaining.into_iter();
            let arguments = bindings
                .iter()
                .enumerate()
                .map(|(position, binding)| match binding {
                    Binding::Fixed(value) => Ok(value.clone()),
                    Binding::Hole => take_argument(&mut remaining, holes, position),
                })
                .collect::<Result<Arguments, _>>()?;
            inner.call(arguments)
        }))
    }

    /// Feeds the results of `self` into `next`.
    ///
    /// The composed callable takes `self.arity()` arguments for `self`,
    /// followed by the arguments `next` needs beyond `self`'s results. Its
    /// return count is that of `next`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::PipeShape`] if `self` produces more values
    /// than `next` takes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::dispatch::Callable;
    /// use fpkit::value::Value;
    ///
    /// let square = Callable::new(|value: i64| value * value);
    /// let add = Callable::new(|first: i64, second: i64| first + second);
    ///
    /// let square_then_add = square.pipe(&add).unwrap();
    /// assert_eq!(square_then_add.arity(), 2);
    /// assert_eq!(
    ///     square_then_add.invoke([Value::Int(-2), Value::Int(7)]).unwrap(),
    ///     Value::Int(11),
    /// );
    /// ```
    pub fn pipe(&self, next: &Self) -> Result<Self, DispatchError> {
        if self.returns > next.arity {
            tracing::debug!(
                produced = self.returns,
                accepted = next.arity,
                "rejected pipe with incompatible stages"
            );
            return Err(DispatchError::PipeShape {
                produced: self.returns,
                accepted: next.arity,
            });
        }

        let first = self.clone();
        let second = next.clone();
        Ok(Self::from_raw(
            self.arity + next.arity - self.returns,
            next.returns,
            move |arguments| {
                let mut arguments = arguments.into_iter();
                let produced = first.call(arguments.by_ref().take(first.arity))?;
                second.call(produced.into_iter().chain(arguments))
            },
        ))
    }

    /// Swaps the two arguments of a binary callable.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ParameterShape`] unless the callable takes
    /// exactly two arguments.
    pub fn flip(&self) -> Result<Self, DispatchError> {
        if self.arity != 2 {
            return Err(DispatchError::ParameterShape {
                operation: "flip",
                expected: 2,
                declared: self.arity,
            });
        }

        let inner = self.clone();
        Ok(Self::from_raw(2, self.returns, move |arguments| {
            let mut arguments = arguments.into_iter();
            let first = take_argument(&mut arguments, 2, 0)?;
            let second = take_argument(&mut arguments, 2, 1)?;
            inner.call([second, first])
        }))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Callable")
            .field("arity", &self.arity)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Fixes the leading arguments of `function`. See [`Callable::curry`].
///
/// # Errors
///
/// Returns [`DispatchError::ArityMismatch`] if more arguments are fixed than
/// `function` takes.
pub fn curry<I>(function: &Callable, fixed: I) -> Result<Callable, DispatchError>
where
    I: IntoIterator<Item = Value>,
{
    function.curry(fixed)
}

/// Left-to-right composition. See [`Callable::pipe`].
///
/// # Errors
///
/// Returns [`DispatchError::PipeShape`] if `first` produces more values than
/// `second` takes.
pub fn pipe(first: &Callable, second: &Callable) -> Result<Callable, DispatchError> {
    first.pipe(second)
}

/// Right-to-left composition: `compose(outer, inner)` runs `inner` first.
///
/// # Errors
///
/// Returns [`DispatchError::PipeShape`] if `inner` produces more values than
/// `outer` takes.
pub fn compose(outer: &Callable, inner: &Callable) -> Result<Callable, DispatchError> {
    inner.pipe(outer)
}

/// One parameter position in [`Callable::partial`].
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    /// The position is fixed to this value.
    Fixed(Value),
    /// The position stays open.
    Hole,
}

impl Binding {
    /// A fixed binding from any convertible value.
    pub fn fixed(value: impl IntoValue) -> Self {
        Self::Fixed(value.into_value())
    }

    /// Returns `true` for [`Binding::Hole`].
    #[must_use]
    pub const fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }
}

/// Applies the one-vs-many rule to the results of a call.
pub(crate) fn unwrap_returns(mut produced: Returns) -> Value {
    if produced.len() == 1 {
        if let Some(value) = produced.pop() {
            return value;
        }
    }
    Value::List(produced.into_vec())
}

fn take_argument<I>(arguments: &mut I, expected: usize, position: usize) -> Result<Value, DispatchError>
where
    I: Iterator<Item = Value>,
{
    arguments.next().ok_or(DispatchError::ArityMismatch {
        expected,
        given: position,
    })
}

/// Marker for functions with a single return value.
pub struct Single<Output>(PhantomData<Output>);

/// Conversion of a Rust return type into call results.
///
/// `Marker` separates the single-value case from the multi-value tuples.
pub trait IntoReturns<Marker> {
    /// Number of values produced.
    const COUNT: usize;

    /// Performs the conversion.
    fn into_returns(self) -> Returns;
}

impl<Output: IntoValue> IntoReturns<Single<Output>> for Output {
    const COUNT: usize = 1;

    fn into_returns(self) -> Returns {
        smallvec![self.into_value()]
    }
}

impl IntoReturns<()> for () {
    const COUNT: usize = 0;

    fn into_returns(self) -> Returns {
        Returns::new()
    }
}

impl<First: IntoValue, Second: IntoValue> IntoReturns<(First, Second)> for (First, Second) {
    const COUNT: usize = 2;

    fn into_returns(self) -> Returns {
        smallvec![self.0.into_value(), self.1.into_value()]
    }
}

impl<First, Second, Third> IntoReturns<(First, Second, Third)> for (First, Second, Third)
where
    First: IntoValue,
    Second: IntoValue,
    Third: IntoValue,
{
    const COUNT: usize = 3;

    fn into_returns(self) -> Returns {
        smallvec![
            self.0.into_value(),
            self.1.into_value(),
            self.2.into_value()
        ]
    }
}

/// Conversion of a function into a [`Callable`].
///
/// `Parameters` and `Marker` let one trait cover every supported signature;
/// they are inferred and never named by callers.
pub trait IntoCallable<Parameters, Marker> {
    /// Performs the conversion.
    fn into_callable(self) -> Callable;
}

#[allow(clippy::use_self)]
impl IntoCallable<Callable, Callable> for Callable {
    fn into_callable(self) -> Callable {
        self
    }
}

macro_rules! impl_into_callable {
    ($arity:literal $(, $parameter:ident @ $position:literal)*) => {
        paste::paste! {
            impl<Function, Output, Marker, $($parameter,)*> IntoCallable<($($parameter,)*), Marker>
                for Function
            where
                Function: Fn($($parameter),*) -> Output + 'static,
                Output: IntoReturns<Marker> + 'static,
                $($parameter: FromValue + 'static,)*
            {
                fn into_callable(self) -> Callable {
                    Callable::from_raw($arity, Output::COUNT, move |arguments: Arguments| {
                        #[allow(unused_mut, unused_variables)]
                        let mut arguments = arguments.into_iter();
                        $(
                            let [<$parameter:lower>] = $parameter::from_value(
                                take_argument(&mut arguments, $arity, $position)?,
                            )?;
                        )*
                        Ok(self($([<$parameter:lower>]),*).into_returns())
                    })
                }
            }
        }
    };
}

impl_into_callable!(0);
impl_into_callable!(1, A1 @ 0);
impl_into_callable!(2, A1 @ 0, A2 @ 1);
impl_into_callable!(3, A1 @ 0, A2 @ 1, A3 @ 2);
impl_into_callable!(4, A1 @ 0, A2 @ 1, A3 @ 2, A4 @ 3);
impl_into_callable!(5, A1 @ 0, A2 @ 1, A3 @ 2, A4 @ 3, A5 @ 4);
impl_into_callable!(6, A1 @ 0, A2 @ 1, A3 @ 2, A4 @ 3, A5 @ 4, A6 @ 5);
