//! Code generation for the Populate derive macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result};

use crate::parse::{parse_field, ParsedField};

/// Generate the `Populate` and `Fields` impls for a struct.
pub fn derive_populate(input: DeriveInput) -> Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(parse_field)
                .collect::<Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "Populate can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "Populate can only be derived for structs",
            ));
        }
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let visits: Vec<TokenStream> = fields
        .iter()
        .filter(|f| !f.options.skip)
        .map(generate_field_visit)
        .collect();
    // Unit structs and all-skip structs never call `visit`.
    let unused_visit = visits.is_empty().then(|| quote! { let _ = &visit; });

    Ok(quote! {
        impl #impl_generics ::pathfig::Populate for #name #ty_generics #where_clause {
            fn shape(&mut self) -> ::pathfig::Shape<'_> {
                ::pathfig::Shape::Struct(self)
            }
        }

        impl #impl_generics ::pathfig::Fields for #name #ty_generics #where_clause {
            fn visit_fields(
                &mut self,
                visit: &mut dyn ::core::ops::FnMut(
                    ::pathfig::Field,
                    &mut dyn ::pathfig::Populate,
                ) -> ::core::result::Result<(), ::pathfig::PathfigError>,
            ) -> ::core::result::Result<(), ::pathfig::PathfigError> {
                #unused_visit
                #(#visits)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn generate_field_visit(field: &ParsedField) -> TokenStream {
    let ident = &field.ident;
    let declared = field.declared_name();
    let flatten = field.options.flatten;
    let tag = match &field.options.name {
        Some(tag) => quote! { ::core::option::Option::Some(#tag) },
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        visit(
            ::pathfig::Field {
                name: #declared,
                tag: #tag,
                flatten: #flatten,
            },
            &mut self.#ident,
        )?;
    }
}
