use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::{lower_camel, parse_odata_attrs};

/// Generates `EnumValue`, `FieldValue` and `Display` for a unit-only enum.
pub fn generate_enum_value(input: &DeriveInput, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let mut idents = Vec::new();
    let mut wires = Vec::new();
    for variant in &data.variants {
        let attrs = parse_odata_attrs(&variant.attrs)?;
        idents.push(&variant.ident);
        wires.push(attrs.rename.unwrap_or_else(|| lower_camel(&variant.ident.to_string())));
    }

    Ok(quote! {
        impl ::odata_core::EnumValue for #name {
            const NAME: &'static str = #name_str;

            fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #wires,)*
                }
            }

            fn parse(value: &str) -> ::std::option::Option<Self> {
                match value {
                    #(#wires => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::odata_core::FieldValue for #name {
            fn read(
                node: &dyn ::odata_core::ParseNode,
            ) -> ::std::result::Result<::std::option::Option<Self>, ::odata_core::DecodeError> {
                node.get_enum_value::<Self>()
            }

            fn write(
                &self,
                key: ::std::option::Option<&str>,
                writer: &mut dyn ::odata_core::SerializationWriter,
            ) -> ::std::result::Result<(), ::odata_core::EncodeError> {
                writer.write_enum_value(key, self)
            }

            fn write_absent(
                _key: ::std::option::Option<&str>,
                _writer: &mut dyn ::odata_core::SerializationWriter,
            ) -> ::std::result::Result<(), ::odata_core::EncodeError> {
                ::std::result::Result::Ok(())
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(::odata_core::EnumValue::as_str(self))
            }
        }
    })
}

/// Generates the factory and delegating impls for a polymorphic family:
/// an enum whose variants each wrap one record type.
pub fn generate_family(input: &DeriveInput, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let mut idents = Vec::new();
    let mut types = Vec::new();
    let mut fallback = None;

    for variant in &data.variants {
        let syn::Fields::Unnamed(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "family variants must wrap exactly one record",
            ));
        };
        if fields.unnamed.len() != 1 {
            return Err(syn::Error::new_spanned(
                variant,
                "family variants must wrap exactly one record",
            ));
        }
        let ty = &fields.unnamed[0].ty;
        let attrs = parse_odata_attrs(&variant.attrs)?;
        if attrs.fallback {
            if fallback.is_some() {
                return Err(syn::Error::new_spanned(
                    variant,
                    "only one variant can be the fallback",
                ));
            }
            fallback = Some((&variant.ident, ty));
        }
        idents.push(&variant.ident);
        types.push(ty);
    }

    let Some((fallback_ident, fallback_ty)) = fallback else {
        return Err(syn::Error::new_spanned(
            name,
            "families need an #[odata(fallback)] variant for the base type",
        ));
    };

    Ok(quote! {
        impl ::odata_core::AdditionalDataHolder for #name {
            fn additional_data(&self) -> &::odata_core::AdditionalData {
                match self {
                    #(Self::#idents(record) => {
                        ::odata_core::AdditionalDataHolder::additional_data(record)
                    })*
                }
            }

            fn additional_data_mut(&mut self) -> &mut ::odata_core::AdditionalData {
                match self {
                    #(Self::#idents(record) => {
                        ::odata_core::AdditionalDataHolder::additional_data_mut(record)
                    })*
                }
            }
        }

        impl ::odata_core::Serializable for #name {
            fn serialize_fields(
                &self,
                writer: &mut dyn ::odata_core::SerializationWriter,
            ) -> ::std::result::Result<(), ::odata_core::EncodeError> {
                match self {
                    #(Self::#idents(record) => {
                        ::odata_core::Serializable::serialize_fields(record, writer)
                    })*
                }
            }
        }

        impl ::odata_core::Parsable for #name {
            fn create_from_discriminator_value(
                node: ::std::option::Option<&dyn ::odata_core::ParseNode>,
            ) -> Self {
                if let ::std::option::Option::Some(tag) = ::odata_core::discriminator_value(node) {
                    #(
                        if <#types>::ODATA_TYPE == ::std::option::Option::Some(tag.as_str()) {
                            return Self::#idents(<#types>::new());
                        }
                    )*
                    ::odata_core::unknown_discriminator(#name_str, &tag);
                }
                Self::#fallback_ident(<#fallback_ty>::new())
            }

            fn deserialize_fields(
                &mut self,
                node: &dyn ::odata_core::ParseNode,
            ) -> ::std::result::Result<(), ::odata_core::DecodeError> {
                match self {
                    #(Self::#idents(record) => {
                        ::odata_core::Parsable::deserialize_fields(record, node)
                    })*
                }
            }

            fn type_name(&self) -> &'static str {
                match self {
                    #(Self::#idents(record) => ::odata_core::Parsable::type_name(record),)*
                }
            }
        }

        impl ::odata_core::FieldValue for #name {
            fn read(
                node: &dyn ::odata_core::ParseNode,
            ) -> ::std::result::Result<::std::option::Option<Self>, ::odata_core::DecodeError> {
                ::odata_core::parse_object(node)
            }

            fn write(
                &self,
                key: ::std::option::Option<&str>,
                writer: &mut dyn ::odata_core::SerializationWriter,
            ) -> ::std::result::Result<(), ::odata_core::EncodeError> {
                writer.write_object_value(key, self)
            }
        }

        #(
            impl ::std::convert::From<#types> for #name {
                fn from(record: #types) -> Self {
                    Self::#idents(record)
                }
            }
        )*
    })
}
