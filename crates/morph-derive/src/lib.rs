//! Derive macro for morph field-binding schemas.
//!
//! `#[derive(Bind)]` turns a struct with `#[bind(...)]` field tags into a
//! binding target: it generates the static key table each mapper consults at
//! plan time and the field setter the mapper writes through per request,
//! plus the argument glue that lets the struct appear as a handler
//! parameter.
//!
//! # Example
//!
//! ```rust
//! use morph::Bind;
//! use serde::Deserialize;
//!
//! #[derive(Bind, Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct OrderPizza {
//!     #[bind(form = "size", query = "size", path = "Size")]
//!     size: String,
//!     #[bind(form = "toppings", query = "toppings")]
//!     toppings: Vec<String>,
//! }
//! ```
//!
//! Each tag names the incoming key for one source; a field may carry any
//! subset of `form`, `path`, and `query`. Untagged fields are invisible to
//! the flat sources but still participate in whole-body JSON binding, which
//! is why bindable structs also derive `serde::Deserialize` (and `Default`,
//! the starting value for every argument slot).
//!
//! # Generated code
//!
//! The macro expands to roughly:
//!
//! ```rust,ignore
//! impl morph::fields::Bind for OrderPizza {
//!     fn keys(group: TagGroup) -> &'static [&'static str] { /* per group */ }
//!     fn set_field(&mut self, group: TagGroup, key: &str, values: &[&str])
//!         -> Result<(), FieldError> { /* match on (group, key) */ }
//! }
//!
//! impl morph::bind::BindArg for OrderPizza {
//!     fn classify(mappers: &MapperSet) -> ArgBinding { /* delegates */ }
//!     fn produce(cx: &mut BindCx<'_>, binding: &ArgBinding)
//!         -> Result<Self, BindError> { /* delegates */ }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr};

/// Derives the `Bind` schema and handler-argument glue for a struct.
///
/// See the crate docs for the attribute syntax.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[derive(Default)]
struct Groups {
    form: Vec<(String, Ident)>,
    path: Vec<(String, Ident)>,
    query: Vec<(String, Ident)>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Bind` can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Bind` requires named fields",
        ));
    };

    let mut groups = Groups::default();
    for field in &fields.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        for attr in &field.attrs {
            if !attr.path().is_ident("bind") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let target = if meta.path.is_ident("form") {
                    &mut groups.form
                } else if meta.path.is_ident("path") {
                    &mut groups.path
                } else if meta.path.is_ident("query") {
                    &mut groups.query
                } else {
                    return Err(meta.error("expected `form`, `path`, or `query`"));
                };
                let key: LitStr = meta.value()?.parse()?;
                target.push((key.value(), ident.clone()));
                Ok(())
            })?;
        }
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let key_lists = [&groups.form, &groups.path, &groups.query]
        .map(|group| group.iter().map(|(key, _)| key.clone()).collect::<Vec<_>>());
    let [form_keys, path_keys, query_keys] = key_lists;

    let set_arms = |group: &[(String, Ident)]| {
        group
            .iter()
            .map(|(key, field)| {
                quote! {
                    #key => ::morph::fields::Field::put(&mut self.#field, #key, values),
                }
            })
            .collect::<Vec<_>>()
    };
    let form_arms = set_arms(&groups.form);
    let path_arms = set_arms(&groups.path);
    let query_arms = set_arms(&groups.query);

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::morph::fields::Bind for #ident #ty_generics #where_clause {
            fn keys(group: ::morph::fields::TagGroup) -> &'static [&'static str] {
                match group {
                    ::morph::fields::TagGroup::Form => &[#(#form_keys),*],
                    ::morph::fields::TagGroup::Path => &[#(#path_keys),*],
                    ::morph::fields::TagGroup::Query => &[#(#query_keys),*],
                }
            }

            fn set_field(
                &mut self,
                group: ::morph::fields::TagGroup,
                key: &str,
                values: &[&str],
            ) -> ::core::result::Result<(), ::morph::FieldError> {
                match group {
                    ::morph::fields::TagGroup::Form => match key {
                        #(#form_arms)*
                        _ => ::core::result::Result::Ok(()),
                    },
                    ::morph::fields::TagGroup::Path => match key {
                        #(#path_arms)*
                        _ => ::core::result::Result::Ok(()),
                    },
                    ::morph::fields::TagGroup::Query => match key {
                        #(#query_arms)*
                        _ => ::core::result::Result::Ok(()),
                    },
                }
            }
        }

        #[automatically_derived]
        impl #impl_generics ::morph::bind::BindArg for #ident #ty_generics #where_clause {
            fn classify(
                mappers: &::morph::fields::MapperSet,
            ) -> ::morph::plan::ArgBinding {
                ::morph::bind::classify_value::<Self>(mappers)
            }

            fn produce(
                cx: &mut ::morph::bind::BindCx<'_>,
                binding: &::morph::plan::ArgBinding,
            ) -> ::core::result::Result<Self, ::morph::BindError> {
                ::morph::bind::produce_value::<Self>(cx, binding)
            }
        }
    })
}
