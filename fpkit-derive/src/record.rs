//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates `IntoValue` and `FromValue` so a struct can travel through the
//! dispatch core as a `Value::Record` and come back out typed.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input, parse_quote};

use crate::shape::{FieldShape, StructStyle, struct_fields, with_bound};

/// Main implementation of the Record derive macro.
pub fn derive_record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match struct_fields(&input, "Record") {
        Ok((style, fields)) => generate_record(&input, style, &fields),
        Err(error) => error,
    };

    TokenStream::from(expanded)
}

fn generate_record(input: &DeriveInput, style: StructStyle, fields: &[FieldShape]) -> TokenStream2 {
    let name = &input.ident;

    let into_generics = with_bound(&input.generics, &parse_quote!(::fpkit::value::IntoValue));
    let (into_impl_generics, into_type_generics, into_where_clause) =
        into_generics.split_for_impl();

    let from_generics = with_bound(&input.generics, &parse_quote!(::fpkit::value::FromValue));
    let (from_impl_generics, from_type_generics, from_where_clause) =
        from_generics.split_for_impl();

    let pushes = fields.iter().map(|field| {
        let member = &field.member;
        let label = &field.label;
        quote! {
            .with_field(#label, ::fpkit::value::IntoValue::into_value(self.#member))
        }
    });

    let takes: Vec<TokenStream2> = fields
        .iter()
        .map(|field| {
            let label = &field.label;
            quote! {
                ::fpkit::value::FromValue::from_value(record.take(#label)?)?
            }
        })
        .collect();

    let construct = match style {
        StructStyle::Named => {
            let members = fields.iter().map(|field| &field.member);
            quote! { Self { #(#members: #takes),* } }
        }
        StructStyle::Tuple => quote! { Self(#(#takes),*) },
    };

    quote! {
        impl #into_impl_generics ::fpkit::value::IntoValue for #name #into_type_generics #into_where_clause {
            fn into_value(self) -> ::fpkit::value::Value {
                ::fpkit::value::Value::Record(
                    ::fpkit::value::Record::new()
                        #(#pushes)*
                )
            }
        }

        impl #from_impl_generics ::fpkit::value::FromValue for #name #from_type_generics #from_where_clause {
            fn from_value(
                value: ::fpkit::value::Value,
            ) -> ::core::result::Result<Self, ::fpkit::dispatch::DispatchError> {
                let mut record =
                    <::fpkit::value::Record as ::fpkit::value::FromValue>::from_value(value)?;
                ::core::result::Result::Ok(#construct)
            }
        }
    }
}
