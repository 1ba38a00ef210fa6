use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

mod record;
mod variants;

/// Attribute macro that derives all required traits for model types.
///
/// This is syntax sugar that expands to:
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Parsable)]
/// ```
///
/// Enums whose variants are all units (wire enums) additionally get
/// `Copy`, `Eq` and `Hash`.
///
/// # Example
///
/// ```ignore
/// use odata_core::{AdditionalData, model};
///
/// #[model]
/// pub struct Identity {
///     display_name: Option<String>,
///     id: Option<String>,
///     #[odata(additional_data)]
///     additional_data: AdditionalData,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let output = if is_unit_enum(&input) {
        quote! {
            #[derive(
                ::std::fmt::Debug,
                ::std::clone::Clone,
                ::std::marker::Copy,
                ::std::cmp::PartialEq,
                ::std::cmp::Eq,
                ::std::hash::Hash,
                ::odata_core::Parsable
            )]
            #input
        }
    } else {
        quote! {
            #[derive(
                ::std::fmt::Debug,
                ::std::clone::Clone,
                ::std::cmp::PartialEq,
                ::odata_core::Parsable
            )]
            #input
        }
    };

    output.into()
}

fn all_unit(data: &syn::DataEnum) -> bool {
    data.variants.iter().all(|v| matches!(v.fields, syn::Fields::Unit))
}

fn is_unit_enum(input: &DeriveInput) -> bool {
    match &input.data {
        syn::Data::Enum(data) => all_unit(data),
        _ => false,
    }
}

/// Derive macro for the model traits.
///
/// - a struct with named fields becomes a record: constructor, accessors,
///   field-deserializer table, `serialize`, factory, and `Deref` to its base
/// - an enum of unit variants becomes a wire enum
/// - an enum of single-record variants becomes a polymorphic family whose
///   factory dispatches on `@odata.type`
///
/// # Attributes
///
/// - `#[odata(type_tag = "#ns.name")]` on a record: discriminator set by `new()`
/// - `#[odata(base)]` on a field: the embedded base record
/// - `#[odata(additional_data)]` on a field: the bag (root records only)
/// - `#[odata(rename = "name")]` on a field or wire-enum variant: wire name
/// - `#[odata(skip)]` on a field: not on the wire (field must impl Default)
/// - `#[odata(fallback)]` on a family variant: the base type
#[proc_macro_derive(Parsable, attributes(odata))]
pub fn derive_parsable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_parsable_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_parsable_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Parsable cannot be derived for generic types",
        ));
    }

    match &input.data {
        syn::Data::Struct(data) => record::generate_record(input, data),
        syn::Data::Enum(data) if data.variants.is_empty() => Err(syn::Error::new_spanned(
            input,
            "Parsable cannot be derived for empty enums",
        )),
        syn::Data::Enum(data) if all_unit(data) => variants::generate_enum_value(input, data),
        syn::Data::Enum(data) => variants::generate_family(input, data),
        syn::Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Parsable cannot be derived for unions",
        )),
    }
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub skip: bool,
    pub rename: Option<String>,
    pub base: bool,
    pub additional_data: bool,
    pub fallback: bool,
    pub type_tag: Option<String>,
}

/// Parses every `#[odata(...)]` attribute in `attrs`.
pub(crate) fn parse_odata_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("odata") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("base") {
                result.base = true;
            } else if meta.path.is_ident("additional_data") {
                result.additional_data = true;
            } else if meta.path.is_ident("fallback") {
                result.fallback = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            } else if meta.path.is_ident("type_tag") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.type_tag = Some(value.value());
            } else {
                return Err(meta.error("unsupported odata attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// `created_date_time` -> `createdDateTime`, `AppsInListCompliant` -> `appsInListCompliant`.
pub(crate) fn lower_camel(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    let mut upper_next = false;
    for (i, c) in ident.chars().enumerate() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if i == 0 || out.is_empty() {
            out.extend(c.to_lowercase());
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Extract the single generic argument from angle brackets, e.g., T from Vec<T>.
pub(crate) fn extract_single_generic_arg(args: &syn::PathArguments) -> Option<syn::Type> {
    match args {
        syn::PathArguments::AngleBracketed(angle) => {
            if angle.args.len() == 1 {
                if let syn::GenericArgument::Type(ty) = &angle.args[0] {
                    return Some(ty.clone());
                }
            }
            None
        }
        _ => None,
    }
}

/// Last path segment of a type, e.g. `Option` for `std::option::Option<T>`.
pub(crate) fn last_segment(ty: &syn::Type) -> Option<&syn::PathSegment> {
    match ty {
        syn::Type::Path(type_path) if type_path.qself.is_none() => type_path.path.segments.last(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_cases_field_names() {
        assert_eq!(lower_camel("created_date_time"), "createdDateTime");
        assert_eq!(lower_camel("id"), "id");
        assert_eq!(lower_camel("windows10_setting"), "windows10Setting");
        assert_eq!(lower_camel("r#type"), "type");
    }

    #[test]
    fn camel_cases_variant_names() {
        assert_eq!(lower_camel("AppsInListCompliant"), "appsInListCompliant");
        assert_eq!(lower_camel("None"), "none");
    }

    #[test]
    fn parses_attributes() {
        let field: syn::Field = syn::parse_quote! {
            #[odata(rename = "@odata.type")]
            odata_type: Option<String>
        };
        let attrs = parse_odata_attrs(&field.attrs).unwrap();
        assert_eq!(attrs.rename.as_deref(), Some("@odata.type"));
        assert!(!attrs.base);

        let field: syn::Field = syn::parse_quote! {
            #[odata(base)]
            base: Entity
        };
        assert!(parse_odata_attrs(&field.attrs).unwrap().base);
    }

    #[test]
    fn rejects_unknown_attributes() {
        let field: syn::Field = syn::parse_quote! {
            #[odata(flatten)]
            x: Option<i32>
        };
        assert!(parse_odata_attrs(&field.attrs).is_err());
    }
}
