//! Implementation of the `#[derive(Fields)]` macro.
//!
//! Generates the positional field access used by fingerprinting, the
//! static descriptor table, and a `FieldBytes` encoding so the struct can be
//! nested inside other fingerprinted structs.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input, parse_quote};

use crate::shape::{FieldShape, struct_fields, with_bound};

/// Main implementation of the Fields derive macro.
pub fn derive_fields_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match struct_fields(&input, "Fields") {
        Ok((_, fields)) => generate_fields(&input, &fields),
        Err(error) => error,
    };

    TokenStream::from(expanded)
}

fn generate_fields(input: &DeriveInput, fields: &[FieldShape]) -> TokenStream2 {
    let name = &input.ident;
    let generics = with_bound(
        &input.generics,
        &parse_quote!(::fpkit::fingerprint::FieldBytes),
    );
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    let field_count = fields.len();

    let access_arms = fields.iter().enumerate().map(|(index, field)| {
        let member = &field.member;
        quote! {
            #index => ::core::option::Option::Some(&self.#member),
        }
    });

    let descriptors = fields.iter().enumerate().map(|(index, field)| {
        let member = &field.member;
        let label = &field.label;
        let field_type = &field.ty;
        quote! {
            ::fpkit::fingerprint::FieldDescriptor::new(
                #label,
                #index,
                ::core::mem::offset_of!(Self, #member),
                ::core::mem::size_of::<#field_type>(),
            )
        }
    });

    let members: Vec<_> = fields.iter().map(|field| &field.member).collect();

    quote! {
        impl #impl_generics ::fpkit::fingerprint::Fields for #name #type_generics #where_clause {
            #[inline]
            fn field_count(&self) -> usize {
                #field_count
            }

            fn field(
                &self,
                index: usize,
            ) -> ::core::option::Option<&dyn ::fpkit::fingerprint::FieldBytes> {
                match index {
                    #(#access_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::fpkit::fingerprint::FieldTable for #name #type_generics #where_clause {
            const FIELDS: &'static [::fpkit::fingerprint::FieldDescriptor] = &[
                #(#descriptors),*
            ];
        }

        impl #impl_generics ::fpkit::fingerprint::FieldBytes for #name #type_generics #where_clause {
            fn encoded_len(&self) -> usize {
                0 #(+ ::fpkit::fingerprint::FieldBytes::encoded_len(&self.#members))*
            }

            fn write_bytes(&self, sink: &mut ::std::vec::Vec<u8>) {
                #(::fpkit::fingerprint::FieldBytes::write_bytes(&self.#members, sink);)*
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(source: &str) -> String {
        let input: DeriveInput = syn::parse_str(source).expect("valid struct");
        let (_, fields) = struct_fields(&input, "Fields").expect("struct shape");
        generate_fields(&input, &fields)
            .to_string()
            .replace(' ', "")
    }

    #[test]
    fn test_named_struct_emits_all_three_impls() {
        let expanded = expand("struct Drug { name: String, price: f32 }");
        assert!(expanded.contains("FieldsforDrug"));
        assert!(expanded.contains("FieldTableforDrug"));
        assert!(expanded.contains("FieldBytesforDrug"));
        assert!(expanded.contains("\"price\""));
    }

    #[test]
    fn test_tuple_struct_uses_positional_labels() {
        let expanded = expand("struct Pair(u8, u16);");
        assert!(expanded.contains("\"0\""));
        assert!(expanded.contains("\"1\""));
    }

    #[test]
    fn test_generic_parameters_gain_field_bytes_bound() {
        let expanded = expand("struct Wrapper<T> { inner: T }");
        assert!(expanded.contains("T:::fpkit::fingerprint::FieldBytes"));
    }
}
