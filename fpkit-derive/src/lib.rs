//! Derive macros for fpkit field tables and record conversions.
//!
//! This crate provides procedural macros that give a struct the run-time
//! shape information the `fpkit` crate works with.
//!
//! # Available Derive Macros
//!
//! - [`Fields`]: Positional field access, a static descriptor table, and a
//!   canonical byte encoding for field-mask fingerprinting
//! - [`Record`]: Conversions into and out of `fpkit::value::Value::Record`
//!
//! # Example: Fields
//!
//! ```rust,ignore
//! use fpkit::fingerprint::{FieldMask, compute_fingerprint};
//! use fpkit_derive::Fields;
//!
//! #[derive(Fields)]
//! struct Drug {
//!     name: String,
//!     price: f32,
//! }
//!
//! let first = Drug { name: "aspirin".into(), price: 1.5 };
//! let second = Drug { name: "aspirin".into(), price: 9.0 };
//!
//! // Bit 0 selects `name` only.
//! let mask = FieldMask::new(0b01);
//! assert_eq!(
//!     compute_fingerprint(mask, &first).unwrap(),
//!     compute_fingerprint(mask, &second).unwrap(),
//! );
//! ```
//!
//! # Example: Record
//!
//! ```rust,ignore
//! use fpkit::value::{FromValue, IntoValue};
//! use fpkit_derive::Record;
//!
//! #[derive(Debug, PartialEq, Record)]
//! struct Student {
//!     id: i32,
//!     name: String,
//! }
//!
//! let value = Student { id: 7, name: "Jack".into() }.into_value();
//! assert_eq!(Student::from_value(value).unwrap().id, 7);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod fields;
mod record;
mod shape;

use proc_macro::TokenStream;

/// Derive macro for field-mask fingerprinting support.
///
/// Generates three implementations for a struct:
///
/// - `fpkit::fingerprint::Fields`: field count and positional access, in
///   declaration order (bit `i` of a mask selects the `i`-th declared field)
/// - `fpkit::fingerprint::FieldTable`: a `&'static` table of
///   `FieldDescriptor { name, index, offset, size }`, built once per type
/// - `fpkit::fingerprint::FieldBytes`: the concatenated encoding of every
///   field, so the struct can itself be a field of another struct
///
/// # Requirements
///
/// - The type must be a struct with named or positional fields
/// - Every field type must implement `FieldBytes`
///
/// # Generics
///
/// Each type parameter receives a `FieldBytes` bound.
///
/// ```rust,ignore
/// #[derive(Fields)]
/// struct Tagged<T> {
///     tag: u8,
///     payload: T,
/// }
/// ```
#[proc_macro_derive(Fields)]
pub fn derive_fields(input: TokenStream) -> TokenStream {
    fields::derive_fields_impl(input)
}

/// Derive macro for converting a struct to and from `fpkit::value::Value`.
///
/// The struct becomes a `Value::Record` whose fields carry the struct's
/// field names (`"0"`, `"1"`, ... for tuple structs) in declaration order.
/// Converting back looks fields up by name, so a record built by hand only
/// needs to carry the right names.
///
/// # Requirements
///
/// - The type must be a struct with named or positional fields
/// - Every field type must implement `IntoValue` and `FromValue`
#[proc_macro_derive(Record)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record_impl(input)
}
