//! Struct shape extraction shared by the derive macros.
//!
//! Both derives walk the same positional field list, so the declaration
//! order seen by `Fields` and by `Record` can never disagree.

use proc_macro2::TokenStream as TokenStream2;
use syn::{Data, DeriveInput, Fields, Generics, Index, Member, Type, TypeParamBound, parse_quote};

/// A single struct field in declaration order.
pub struct FieldShape {
    /// How the field is accessed (`self.name` or `self.0`).
    pub member: Member,
    /// Field name as exposed at run time (`"name"` or `"0"`).
    pub label: String,
    /// Declared field type.
    pub ty: Type,
}

/// Whether the struct uses braces or parentheses.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StructStyle {
    Named,
    Tuple,
}

/// Extracts the field list of a struct, or a compile error for anything else.
pub fn struct_fields(
    input: &DeriveInput,
    derive_name: &str,
) -> Result<(StructStyle, Vec<FieldShape>), TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data_struct) => &data_struct.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive_name} can only be derived for structs, not enums."),
            )
            .to_compile_error());
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive_name} cannot be derived for unions."),
            )
            .to_compile_error());
        }
    };

    match fields {
        Fields::Named(named_fields) => Ok((
            StructStyle::Named,
            named_fields
                .named
                .iter()
                .filter_map(|field| {
                    field.ident.as_ref().map(|ident| FieldShape {
                        member: Member::Named(ident.clone()),
                        label: ident.to_string(),
                        ty: field.ty.clone(),
                    })
                })
                .collect(),
        )),
        Fields::Unnamed(unnamed_fields) => Ok((
            StructStyle::Tuple,
            unnamed_fields
                .unnamed
                .iter()
                .enumerate()
                .map(|(position, field)| FieldShape {
                    member: Member::Unnamed(Index::from(position)),
                    label: position.to_string(),
                    ty: field.ty.clone(),
                })
                .collect(),
        )),
        Fields::Unit => Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive_name} cannot be derived for unit structs (structs with no fields)."),
        )
        .to_compile_error()),
    }
}

/// Adds `bound` to every type parameter of `generics`.
pub fn with_bound(generics: &Generics, bound: &TypeParamBound) -> Generics {
    let mut generics = generics.clone();
    let parameters: Vec<_> = generics
        .type_params()
        .map(|parameter| parameter.ident.clone())
        .collect();
    let where_clause = generics.make_where_clause();
    for parameter in parameters {
        where_clause
            .predicates
            .push(parse_quote!(#parameter: #bound));
    }
    generics
}
