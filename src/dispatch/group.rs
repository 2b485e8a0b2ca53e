//! Grouping by field-mask fingerprint.
//!
//! Elements whose mask-selected fields encode identically land in the same
//! group. Groups keep the order in which their first element appeared, and
//! each group keeps its elements in input order.
//!
//! The transient index from fingerprint to group uses the hasher chosen by
//! the `fxhash` or `ahash` feature, falling back to the standard library's.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::{slice, vec};

use tracing::{debug, trace};

use super::{CollectionView, DispatchError};
use crate::fingerprint::{FieldMask, Fields, Fingerprint, compute_fingerprint};
use crate::value::{IntoValue, Value};

#[cfg(feature = "fxhash")]
type GroupHasher = rustc_hash::FxBuildHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type GroupHasher = ahash::RandomState;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type GroupHasher = std::collections::hash_map::RandomState;

/// Elements grouped by fingerprint, in first-appearance order.
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::group;
/// use fpkit::fingerprint::FieldMask;
///
/// // Group pairs by their first item.
/// let pairs = vec![vec![1, 10], vec![2, 20], vec![1, 30]];
/// let groups = group(FieldMask::new(0b01), pairs).unwrap();
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups.element_count(), 3);
/// let sizes: Vec<usize> = groups.iter().map(|(_, members)| members.len()).collect();
/// assert_eq!(sizes, vec![2, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct Groups<T> {
    index: HashMap<Fingerprint, usize, GroupHasher>,
    groups: Vec<(Fingerprint, Vec<T>)>,
}

impl<T> Groups<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, GroupHasher::default()),
            groups: Vec::new(),
        }
    }

    fn insert(&mut self, key: Fingerprint, element: T) {
        let next = self.groups.len();
        match self.index.entry(key) {
            Entry::Occupied(entry) => self.groups[*entry.get()].1.push(element),
            Entry::Vacant(entry) => {
                self.groups.push((entry.key().clone(), vec![element]));
                entry.insert(next);
            }
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of elements across all groups.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.groups.iter().map(|(_, members)| members.len()).sum()
    }

    /// The members of the group with fingerprint `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&[T]>
    where
        Fingerprint: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&position| self.groups[position].1.as_slice())
    }

    /// Returns `true` if a group has fingerprint `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Fingerprint: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Iterates over the fingerprints in group order.
    pub fn keys(&self) -> impl Iterator<Item = &Fingerprint> {
        self.groups.iter().map(|(key, _)| key)
    }

    /// Iterates over `(fingerprint, members)` in group order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.groups.iter(),
        }
    }
}

/// Borrowing iterator over [`Groups`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, (Fingerprint, Vec<T>)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Fingerprint, &'a [T]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, members)| (key, members.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Groups<T> {
    type Item = (&'a Fingerprint, &'a [T]);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Groups<T> {
    type Item = (Fingerprint, Vec<T>);
    type IntoIter = vec::IntoIter<(Fingerprint, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Groups typed items by the fingerprint of their mask-selected fields.
///
/// # Errors
///
/// Returns [`DispatchError::Fingerprint`] if the mask selects a field an item
/// does not have.
pub fn group_by<T, I>(mask: FieldMask, items: I) -> Result<Groups<T>, DispatchError>
where
    T: Fields,
    I: IntoIterator<Item = T>,
{
    let items = items.into_iter();
    let mut groups = Groups::with_capacity(items.size_hint().0);
    for item in items {
        let key = compute_fingerprint(mask, &item)?;
        groups.insert(key, item);
    }
    trace!(
        mask = %mask,
        elements = groups.element_count(),
        groups = groups.len(),
        "grouped elements"
    );
    Ok(groups)
}

/// Groups a dynamically shaped collection.
///
/// Record fields and list items are the positional fields of each element.
///
/// # Errors
///
/// Returns [`DispatchError::Fingerprint`] if the mask selects a field an
/// element does not have; scalar elements have no fields.
pub fn group(mask: FieldMask, collection: impl IntoValue) -> Result<Groups<Value>, DispatchError> {
    group_by(mask, CollectionView::promote(collection))
}

/// Groups `items`, then folds each group into its own destination slot.
///
/// Group `n` (in first-appearance order) accumulates into `destination[n]`.
/// Each used slot is reset to `D::default()` before the group's first
/// element is passed to `reducer`. Returns the number of groups.
///
/// # Errors
///
/// - [`DispatchError::Fingerprint`] as for [`group_by`]
/// - [`DispatchError::CapacityExceeded`] if there are more groups than
///   slots; no slot is touched in that case
///
/// # Examples
///
/// ```rust
/// use fpkit::dispatch::group_reduce;
/// use fpkit::fingerprint::FieldMask;
///
/// let sales = vec![("north", 3_u32), ("south", 5), ("north", 4)];
/// let mut totals = [0_u32; 4];
/// let count = group_reduce(
///     FieldMask::new(0b01),
///     |total: &mut u32, (_, amount): (&str, u32)| *total += amount,
///     &mut totals,
///     sales,
/// )
/// .unwrap();
///
/// assert_eq!(&totals[..count], &[7, 5]);
/// ```
pub fn group_reduce<T, D, F, I>(
    mask: FieldMask,
    mut reducer: F,
    destination: &mut [D],
    items: I,
) -> Result<usize, DispatchError>
where
    T: Fields,
    D: Default,
    F: FnMut(&mut D, T),
    I: IntoIterator<Item = T>,
{
    let groups = group_by(mask, items)?;
    if groups.len() > destination.len() {
        debug!(
            capacity = destination.len(),
            required = groups.len(),
            "destination too small for groups"
        );
        return Err(DispatchError::CapacityExceeded {
            capacity: destination.len(),
            required: groups.len(),
        });
    }

    let count = groups.len();
    for (slot, (_, members)) in destination.iter_mut().zip(groups) {
        *slot = D::default();
        for member in members {
            reducer(slot, member);
        }
    }
    trace!(groups = count, "reduced groups");
    Ok(count)
}
