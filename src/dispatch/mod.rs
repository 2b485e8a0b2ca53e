//! Collection adapter and dispatch core.
//!
//! This module applies user functions to dynamically shaped collections.
//! Inputs are anything convertible with [`IntoValue`]; a scalar input
//! behaves like a one-element collection (see [`CollectionView`]). User
//! functions are wrapped in a [`Callable`], which records how many
//! arguments they take and how many values they return, so every shape
//! mismatch surfaces as a [`DispatchError`] instead of a panic.
//!
//! # Overview
//!
//! | Operation        | Fresh result                  | Typed destination         |
//! |------------------|-------------------------------|---------------------------|
//! | filter           | [`filter`]                    | [`filter_into`]           |
//! | map              | [`map`]                       | [`map_into`]              |
//! | zip with         | [`zip_with`]                  | [`zip_with_into`]         |
//! | fold             | [`fold`]                      | [`fold_into`]             |
//! | flatten one level| [`flat`]                      | [`flat_into`]             |
//! | unzip with       | [`unzip_with`]                | [`unzip_with_into`]       |
//! | reduce           |                               | [`reduce`]                |
//! | group            | [`group`], [`group_by`]       | [`group_reduce`]          |
//!
//! Function-level tools live on [`Callable`]: [`curry`](Callable::curry),
//! [`partial`](Callable::partial), [`pipe`](Callable::pipe) and
//! [`flip`](Callable::flip), with [`compose`] as the right-to-left form of
//! [`pipe`].
//!
//! # Examples
//!
//! ```rust
//! use fpkit::dispatch::{Callable, map, zip_with};
//! use fpkit::value::Value;
//!
//! let add = Callable::new(|first: i64, second: i64| first + second);
//! let add_seven = add.curry([Value::Int(7)]).unwrap();
//!
//! assert_eq!(map(&add_seven, vec![4, -3]).unwrap(), vec![Value::Int(11), Value::Int(4)]);
//! assert_eq!(zip_with(&add, vec![1, 2, 3], vec![10, 20]).unwrap().len(), 2);
//! ```
//!
//! [`IntoValue`]: crate::value::IntoValue

mod callable;
mod error;
mod group;
mod operations;
mod view;

pub use callable::{
    Arguments, Binding, Callable, IntoCallable, IntoReturns, Returns, Single, compose, curry, pipe,
};
pub use error::DispatchError;
pub use group::{Groups, Iter as GroupsIter, group, group_by, group_reduce};
pub use operations::{
    filter, filter_into, flat, flat_into, fold, fold_into, map, map_into, reduce, unzip_with,
    unzip_with_into, zip_with, zip_with_into,
};
pub use view::CollectionView;
