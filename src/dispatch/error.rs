//! Error type for the dispatch core.

use thiserror::Error;

use crate::fingerprint::FingerprintError;

/// Errors raised by dispatch operations.
///
/// Every variant aborts the operation that raised it. Destinations are
/// checked before they are written, so a failed call never leaves a
/// partially filled destination behind.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::DispatchError;
///
/// let error = DispatchError::ArityMismatch { expected: 2, given: 1 };
/// assert_eq!(
///     error.to_string(),
///     "wrong number of parameters: takes 2 positional arguments but 1 were given"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A callable received a different number of arguments than it declares.
    #[error(
        "wrong number of parameters: takes {expected} positional arguments but {given} were given"
    )]
    ArityMismatch {
        /// Declared parameter count.
        expected: usize,
        /// Number of arguments supplied.
        given: usize,
    },
    /// An operation needs a callable with a specific number of parameters.
    #[error("{operation} needs a callable taking {expected} arguments, found one taking {declared}")]
    ParameterShape {
        /// The operation that rejected the callable.
        operation: &'static str,
        /// Parameter count the operation needs.
        expected: usize,
        /// Parameter count the callable declares.
        declared: usize,
    },
    /// An operation needs a callable with a specific number of return values.
    #[error("{operation} needs a callable returning {expected} values, found one returning {declared}")]
    ReturnShape {
        /// The operation that rejected the callable.
        operation: &'static str,
        /// Return count the operation needs.
        expected: usize,
        /// Return count the callable declares.
        declared: usize,
    },
    /// A callable produced a different number of values than it declares.
    #[error("callable declares {expected} return values but produced {produced}")]
    ReturnCountMismatch {
        /// Declared return count.
        expected: usize,
        /// Number of values actually produced.
        produced: usize,
    },
    /// The second stage of a pipe cannot take the first stage's results.
    #[error("cannot pipe {produced} results into a callable taking {accepted} arguments")]
    PipeShape {
        /// Return count of the first stage.
        produced: usize,
        /// Parameter count of the second stage.
        accepted: usize,
    },
    /// A destination is too small for the results.
    #[error("destination holds {capacity} slots but {required} results were produced")]
    CapacityExceeded {
        /// Slots available in the destination.
        capacity: usize,
        /// Slots needed.
        required: usize,
    },
    /// A value could not be bound to a typed parameter or destination.
    #[error("expected a value of type {expected}, found {found}")]
    TypeMismatch {
        /// The type that was required.
        expected: &'static str,
        /// The kind of value that was found.
        found: &'static str,
    },
    /// A record lacks a field that a typed struct requires.
    #[error("record has no field named `{name}`")]
    MissingField {
        /// The missing field name.
        name: String,
    },
    /// Computing a grouping key failed.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
}
