//! Field selection masks.
//!
//! Bit `i` of a [`FieldMask`], read from the least-significant bit, selects
//! the field at positional index `i` in declaration order. A mask therefore
//! addresses at most 64 fields.

use std::fmt;
use std::ops::BitOr;

use super::error::FingerprintError;
use super::field::FieldTable;

/// Number of field positions a mask can address.
pub const MASK_WIDTH: usize = u64::BITS as usize;

/// A 64-bit selection of field positions.
///
/// # Examples
///
/// ```rust
/// use fpkit::fingerprint::FieldMask;
///
/// let mask = FieldMask::new(0b101);
/// assert!(mask.contains(0));
/// assert!(!mask.contains(1));
/// assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 2]);
///
/// let same = FieldMask::from_indices([2, 0]).unwrap();
/// assert_eq!(mask, same);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldMask(u64);

impl FieldMask {
    /// The mask that selects nothing.
    pub const EMPTY: Self = Self(0);

    /// Creates a mask from raw bits.
    #[inline]
    #[must_use]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Builds a mask selecting each of `indices`.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::MaskOverflow`] for an index of 64 or more.
    pub fn from_indices<I>(indices: I) -> Result<Self, FingerprintError>
    where
        I: IntoIterator<Item = usize>,
    {
        indices
            .into_iter()
            .try_fold(Self::EMPTY, |mask, index| mask.with(index))
    }

    /// Builds a mask from field names, resolved through the descriptor table
    /// of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::UnknownField`] when a name is not declared
    /// by `T`, or [`FingerprintError::MaskOverflow`] when it sits past
    /// position 63.
    pub fn from_names<T, I, S>(names: I) -> Result<Self, FingerprintError>
    where
        T: FieldTable,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::EMPTY, |mask, name| {
            let name = name.as_ref();
            let descriptor = T::FIELDS
                .iter()
                .find(|descriptor| descriptor.name == name)
                .ok_or_else(|| FingerprintError::UnknownField {
                    name: name.to_string(),
                })?;
            mask.with(descriptor.index)
        })
    }

    /// Returns a copy of this mask that also selects `index`.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::MaskOverflow`] for an index of 64 or more.
    pub fn with(self, index: usize) -> Result<Self, FingerprintError> {
        if index >= MASK_WIDTH {
            return Err(FingerprintError::MaskOverflow { index });
        }
        Ok(Self(self.0 | (1 << index)))
    }

    /// Returns `true` if `index` is selected.
    #[inline]
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < MASK_WIDTH && self.0 & (1 << index) != 0
    }

    /// Returns `true` if no field is selected.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected fields.
    #[inline]
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Highest selected index plus one; zero for the empty mask.
    #[inline]
    #[must_use]
    pub const fn span(self) -> usize {
        MASK_WIDTH - self.0.leading_zeros() as usize
    }

    /// Iterates the selected indices in ascending order.
    #[inline]
    pub const fn indices(self) -> MaskIndices {
        MaskIndices { remaining: self.0 }
    }
}

impl From<u64> for FieldMask {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<FieldMask> for u64 {
    fn from(mask: FieldMask) -> Self {
        mask.0
    }
}

impl BitOr for FieldMask {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl fmt::Display for FieldMask {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:#b}", self.0)
    }
}

/// Ascending iterator over the indices selected by a [`FieldMask`].
///
/// Stops as soon as no selected bits remain, so a mask never walks past its
/// highest selected field.
#[derive(Clone, Debug)]
pub struct MaskIndices {
    remaining: u64,
}

impl Iterator for MaskIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.remaining.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for MaskIndices {}
