//! Derive macros for streamstore
//!
//! This crate provides procedural macros to reduce boilerplate when defining
//! routable event enums.
//!
//! # Available Macros
//!
//! - `#[derive(Partitioned)]` - Implements `streamstore_core::partition::Partitioned`
//!
//! # Example
//!
//! ```ignore
//! use streamstore_macros::Partitioned;
//!
//! #[derive(Partitioned, Clone, Debug)]
//! enum TodoEvent {
//!     #[opens]
//!     Create { #[key] id: TodoId, text: String },
//!
//!     Toggle { #[key] id: TodoId },
//! }
//!
//! // Generated methods:
//! assert!(TodoEvent::Create { id, text }.opens_partition());
//! assert_eq!(TodoEvent::Toggle { id }.kind(), "toggle");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, Type};

/// Derive macro for routable event enums
///
/// Implements `Partitioned` for an enum:
/// - `partition_key()` - Clones the field marked `#[key]` in the matched variant
/// - `opens_partition()` - Returns true for variants marked `#[opens]`
/// - `kind()` - Returns the variant name in `snake_case`
///
/// # Attributes
///
/// - `#[opens]` - Mark a variant as one that creates its partition
/// - `#[key]` - Mark the named field holding the partition key (exactly one per variant)
///
/// # Errors
///
/// This macro produces a compile error (not a runtime panic) if:
/// - Applied to a non-enum type, or to an enum without variants
/// - A variant has no named fields or no `#[key]` field
/// - A variant has more than one `#[key]` field
/// - Variants disagree on the key type
#[proc_macro_derive(Partitioned, attributes(opens, key))]
pub fn derive_partitioned(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_partitioned(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// One variant's contribution to the generated match arms
struct RoutedVariant<'a> {
    name: &'a Ident,
    key_field: &'a Ident,
    key_type: &'a Type,
    opens: bool,
}

fn expand_partitioned(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Partitioned)] can only be used on enums",
        ));
    };

    let variants = data_enum
        .variants
        .iter()
        .map(|variant| {
            let Fields::Named(fields) = &variant.fields else {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Partitioned variants must have named fields",
                ));
            };

            let mut keys = fields
                .named
                .iter()
                .filter(|field| has_attribute(&field.attrs, "key"));

            let (Some(key), None) = (keys.next(), keys.next()) else {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Each variant needs exactly one #[key] field",
                ));
            };

            let Some(key_field) = key.ident.as_ref() else {
                return Err(syn::Error::new_spanned(key, "#[key] field must be named"));
            };

            Ok(RoutedVariant {
                name: &variant.ident,
                key_field,
                key_type: &key.ty,
                opens: has_attribute(&variant.attrs, "opens"),
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let Some(first) = variants.first() else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Partitioned)] needs at least one variant",
        ));
    };
    let key_type = first.key_type;

    if let Some(mismatch) = variants.iter().find(|v| v.key_type != key_type) {
        return Err(syn::Error::new_spanned(
            mismatch.key_type,
            "All #[key] fields must have the same type",
        ));
    }

    let key_arms = variants.iter().map(|v| {
        let variant = v.name;
        let field = v.key_field;
        quote! { Self::#variant { #field, .. } => ::core::clone::Clone::clone(#field), }
    });

    let opens_arms = variants.iter().map(|v| {
        let variant = v.name;
        let opens = v.opens;
        quote! { Self::#variant { .. } => #opens, }
    });

    let kind_arms = variants.iter().map(|v| {
        let variant = v.name;
        let kind = snake_case(&variant.to_string());
        quote! { Self::#variant { .. } => #kind, }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::streamstore_core::partition::Partitioned for #name #ty_generics #where_clause {
            type Key = #key_type;

            fn partition_key(&self) -> Self::Key {
                match self {
                    #(#key_arms)*
                }
            }

            fn opens_partition(&self) -> bool {
                match self {
                    #(#opens_arms)*
                }
            }

            fn kind(&self) -> &'static str {
                match self {
                    #(#kind_arms)*
                }
            }
        }
    })
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// `CreateTodo` -> `create_todo`
fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
