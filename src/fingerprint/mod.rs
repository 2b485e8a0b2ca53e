//! Field-mask fingerprinting.
//!
//! A fingerprint is a fixed-length byte string built from a selected subset
//! of a value's fields. Two values produce equal fingerprints under the same
//! mask exactly when every selected field encodes to the same bytes, so a
//! fingerprint works as a map key for structural partial equality.
//!
//! # Overview
//!
//! - [`FieldMask`]: which fields participate (bit `i` = `i`-th declared field)
//! - [`Fields`]: positional field access, usually derived
//! - [`FieldTable`]: the static [`FieldDescriptor`] table of a struct type
//! - [`FieldBytes`]: the canonical encoding of one field
//! - [`compute_fingerprint`]: mask + value -> [`Fingerprint`]
//! - [`visit`]: positional access to a single field
//!
//! # Examples
//!
//! ```rust
//! use fpkit::fingerprint::{FieldMask, compute_fingerprint};
//! use fpkit::Fields;
//!
//! #[derive(Fields)]
//! struct Drug {
//!     name: String,
//!     producer: String,
//!     price: f32,
//! }
//!
//! let first = Drug { name: "aspirin".into(), producer: "north".into(), price: 1.5 };
//! let second = Drug { name: "aspirin".into(), producer: "south".into(), price: 1.5 };
//!
//! // name + price
//! let mask = FieldMask::new(0b101);
//! assert_eq!(
//!     compute_fingerprint(mask, &first).unwrap(),
//!     compute_fingerprint(mask, &second).unwrap(),
//! );
//!
//! // name + producer
//! let mask = FieldMask::new(0b011);
//! assert_ne!(
//!     compute_fingerprint(mask, &first).unwrap(),
//!     compute_fingerprint(mask, &second).unwrap(),
//! );
//! ```
//!
//! # Equality Contract
//!
//! Fingerprints are compared byte for byte. Values must be fingerprinted
//! with the same mask to be comparable; two different masks may happen to
//! produce equal bytes without the selected fields being related.

mod error;
mod field;
mod mask;

use std::borrow::Borrow;
use std::fmt;

use smallvec::SmallVec;

pub use error::FingerprintError;
pub use field::{FieldBytes, FieldDescriptor, FieldTable, Fields};
pub(crate) use field::{LENGTH_PREFIX, write_length};
pub use mask::{FieldMask, MASK_WIDTH, MaskIndices};

/// The concatenated encodings of the fields a mask selects.
///
/// Compares, hashes and orders by its bytes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    /// The fingerprint bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the fingerprint of an empty mask.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the fingerprint, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Box<[u8]> {
        self.0
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for Fingerprint {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Fingerprint(")?;
        for byte in self.0.iter() {
            write!(formatter, "{byte:02x}")?;
        }
        formatter.write_str(")")
    }
}

/// Returns the field of `value` at positional `index`.
///
/// # Errors
///
/// Returns [`FingerprintError::FieldOutOfRange`] when `value` has no field
/// at `index`.
///
/// # Examples
///
/// ```rust
/// use fpkit::fingerprint::{FieldBytes, visit};
/// use fpkit::Fields;
///
/// #[derive(Fields)]
/// struct Data {
///     public: i64,
///     private: String,
/// }
///
/// let data = Data { public: 334_700, private: "test".into() };
/// assert_eq!(visit(0, &data).unwrap().encoded_len(), 8);
/// assert_eq!(visit(1, &&data).unwrap().encoded_len(), 8 + 4);
/// assert!(visit(2, &data).is_err());
/// ```
pub fn visit<T>(index: usize, value: &T) -> Result<&dyn FieldBytes, FingerprintError>
where
    T: Fields + ?Sized,
{
    value
        .field(index)
        .ok_or_else(|| FingerprintError::FieldOutOfRange {
            index,
            field_count: value.field_count(),
        })
}

/// Computes the fingerprint of the fields of `value` selected by `mask`.
///
/// Fields are visited from bit 0 upward, stopping once no selected bits
/// remain. The output length is summed over the selected fields before the
/// single allocation, and the bytes are then written in the same order.
///
/// # Errors
///
/// Returns [`FingerprintError::FieldOutOfRange`] when the mask selects a
/// position past the last field of `value`.
pub fn compute_fingerprint<T>(mask: FieldMask, value: &T) -> Result<Fingerprint, FingerprintError>
where
    T: Fields + ?Sized,
{
    let selected = mask
        .indices()
        .map(|index| visit(index, value))
        .collect::<Result<SmallVec<[&dyn FieldBytes; 8]>, _>>()?;

    let length = selected.iter().map(|field| field.encoded_len()).sum();
    let mut bytes = Vec::with_capacity(length);
    for field in &selected {
        field.write_bytes(&mut bytes);
    }
    debug_assert_eq!(bytes.len(), length, "field encoding length drifted");

    Ok(Fingerprint(bytes.into_boxed_slice()))
}
