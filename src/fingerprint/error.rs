//! Error type for field-mask fingerprinting.

use thiserror::Error;

/// Errors raised while building a mask or computing a fingerprint.
///
/// # Examples
///
/// ```rust
/// use fpkit::fingerprint::FingerprintError;
///
/// let error = FingerprintError::FieldOutOfRange { index: 5, field_count: 3 };
/// assert_eq!(
///     error.to_string(),
///     "mask selects field 5 but the value has only 3 fields"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// The mask selects a field index the value does not have.
    #[error("mask selects field {index} but the value has only {field_count} fields")]
    FieldOutOfRange {
        /// The selected field index.
        index: usize,
        /// The number of fields the value exposes.
        field_count: usize,
    },
    /// A field index does not fit into a 64-bit mask.
    #[error("field index {index} does not fit in a 64-bit mask")]
    MaskOverflow {
        /// The offending index.
        index: usize,
    },
    /// A field name is not present in the descriptor table.
    #[error("no field named `{name}`")]
    UnknownField {
        /// The name that was looked up.
        name: String,
    },
}
