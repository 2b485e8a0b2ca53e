//! # fpkit
//!
//! Higher-order operations over dynamically shaped collections, and
//! field-mask fingerprinting for structural group-by.
//!
//! ## Overview
//!
//! - **Dispatch**: filter, map, zip, fold, reduce, flatten, unzip, curry,
//!   pipe and group-by over values whose shape is only known at run time
//! - **Values**: the [`Value`](value::Value) sum type and its conversions
//!   to and from typed Rust values
//! - **Fingerprinting**: comparable, hashable byte keys built from a
//!   mask-selected subset of a struct's fields
//! - **Derive**: `#[derive(Fields)]` and `#[derive(Record)]`
//!
//! ## Feature Flags
//!
//! - `fingerprint`: field masks and fingerprints
//! - `dispatch`: the dispatch core and the `value` module (enables
//!   `fingerprint`)
//! - `derive`: the `Fields` and `Record` derive macros
//! - `fxhash` / `ahash`: hasher of the grouping index (`fxhash` wins when
//!   both are enabled)
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use fpkit::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq, Fields, Record)]
//! struct Student {
//!     id: i64,
//!     name: String,
//! }
//!
//! let new_student = Callable::new(|id: i64, name: String| Student { id, name });
//! let students = zip_with(&new_student, vec![7, 3, 11], vec!["Jack", "John"]).unwrap();
//! assert_eq!(students.len(), 2);
//!
//! let first = Student::from_value(students[0].clone()).unwrap();
//! assert_eq!(first, Student { id: 7, name: "Jack".into() });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use fpkit::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "fingerprint")]
    pub use crate::fingerprint::*;

    #[cfg(feature = "dispatch")]
    pub use crate::dispatch::*;

    #[cfg(feature = "dispatch")]
    pub use crate::value::*;

    #[cfg(feature = "derive")]
    pub use fpkit_derive::{Fields, Record};
}

#[cfg(feature = "fingerprint")]
pub mod fingerprint;

#[cfg(feature = "dispatch")]
pub mod dispatch;

#[cfg(feature = "dispatch")]
pub mod value;

#[cfg(feature = "derive")]
pub use fpkit_derive::{Fields, Record};

#[cfg(feature = "dispatch")]
static_assertions::assert_impl_all!(value::Value: Send, Sync, Clone);

#[cfg(feature = "fingerprint")]
static_assertions::assert_impl_all!(fingerprint::Fingerprint: Send, Sync, Clone);
