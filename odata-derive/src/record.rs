use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Ident, Type};

use crate::{extract_single_generic_arg, last_segment, lower_camel, parse_odata_attrs};

/// Where a record's additional data lives.
#[derive(Clone, Copy)]
enum Anchor<'a> {
    /// Embedded base record that (transitively) owns the bag.
    Base(&'a Ident, &'a Type),
    /// The bag field itself.
    Bag(&'a Ident),
}

struct DeclaredField<'a> {
    ident: &'a Ident,
    inner: Type,
    wire: String,
}

/// Wire name of the discriminator property; decoded leniently.
const ODATA_TYPE: &str = "@odata.type";

/// Types whose getters return the value itself rather than a reference.
const COPY_TYPES: &[&str] = &["bool", "u8", "i8", "i16", "i32", "i64", "f32", "f64"];

/// Generates the record impls for a struct with named fields.
pub fn generate_record(input: &DeriveInput, data: &syn::DataStruct) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let container = parse_odata_attrs(&input.attrs)?;

    let syn::Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &data.fields,
            "records must have named fields",
        ));
    };

    let mut base: Option<(&Ident, &Type)> = None;
    let mut bag: Option<&Ident> = None;
    let mut declared = Vec::new();
    let mut skipped = Vec::new();

    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_odata_attrs(&field.attrs)?;

        if attrs.base {
            if base.is_some() {
                return Err(syn::Error::new_spanned(field, "a record embeds at most one base"));
            }
            base = Some((ident, &field.ty));
        } else if attrs.additional_data {
            if bag.is_some() {
                return Err(syn::Error::new_spanned(field, "duplicate additional_data field"));
            }
            bag = Some(ident);
        } else if attrs.skip {
            skipped.push(ident);
        } else {
            let inner = option_inner(&field.ty).ok_or_else(|| {
                syn::Error::new_spanned(&field.ty, "record fields must be Option<T>")
            })?;
            let wire = attrs.rename.unwrap_or_else(|| lower_camel(&ident.to_string()));
            declared.push(DeclaredField { ident, inner, wire });
        }
    }

    let anchor = match (base, bag) {
        (Some((ident, ty)), None) => Anchor::Base(ident, ty),
        (None, Some(ident)) => Anchor::Bag(ident),
        (Some(_), Some(ident)) => {
            return Err(syn::Error::new_spanned(
                ident,
                "derived records reach the additional data through their base",
            ));
        }
        (None, None) => {
            return Err(syn::Error::new_spanned(
                name,
                "records need an #[odata(base)] or #[odata(additional_data)] field",
            ));
        }
    };

    let inherent = generate_inherent(name, &container.type_tag, anchor, &declared, &skipped);
    let deref = base.map(|(ident, ty)| generate_deref(name, ident, ty));
    let holder = generate_holder(name, anchor);
    let serializable = generate_serializable(name, base, &declared);
    let table = generate_table(name, base, &declared);

    Ok(quote! {
        #inherent
        #deref
        #holder
        #serializable
        #table

        impl ::odata_core::Parsable for #name {
            fn create_from_discriminator_value(
                _node: ::std::option::Option<&dyn ::odata_core::ParseNode>,
            ) -> Self {
                Self::new()
            }

            fn deserialize_fields(
                &mut self,
                node: &dyn ::odata_core::ParseNode,
            ) -> ::std::result::Result<(), ::odata_core::DecodeError> {
                ::odata_core::deserialize_record(self, node)
            }

            fn type_name(&self) -> &'static str {
                #name_str
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

        impl ::std::default::Default for #name {
            fn default() -> Self {
                Self::new()
            }
        }
    })
}

fn option_inner(ty: &Type) -> Option<Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    extract_single_generic_arg(&segment.arguments)
}

fn generate_inherent(
    name: &Ident,
    type_tag: &Option<String>,
    anchor: Anchor<'_>,
    declared: &[DeclaredField<'_>],
    skipped: &[&Ident],
) -> TokenStream {
    let tag_const = match type_tag {
        Some(tag) => quote! { ::std::option::Option::Some(#tag) },
        None => quote! { ::std::option::Option::None },
    };
    let tag_init = type_tag.as_ref().map(|tag| {
        quote! {
            record.set_odata_type(::std::option::Option::Some(::std::string::String::from(#tag)));
        }
    });

    let anchor_init = match anchor {
        Anchor::Base(ident, ty) => quote! { #ident: <#ty>::new(), },
        Anchor::Bag(ident) => quote! { #ident: ::odata_core::AdditionalData::new(), },
    };
    let declared_init = declared.iter().map(|f| {
        let ident = f.ident;
        quote! { #ident: ::std::option::Option::None, }
    });
    let skipped_init = skipped
        .iter()
        .map(|ident| quote! { #ident: ::std::default::Default::default(), });

    let accessors = declared.iter().map(generate_accessors);

    quote! {
        impl #name {
            /// Discriminator written by `new()`, if this type has one.
            pub const ODATA_TYPE: ::std::option::Option<&'static str> = #tag_const;

            pub fn new() -> Self {
                #[allow(unused_mut)]
                let mut record = Self {
                    #anchor_init
                    #(#declared_init)*
                    #(#skipped_init)*
                };
                #tag_init
                record
            }

            #(#accessors)*
        }
    }
}

fn generate_accessors(field: &DeclaredField<'_>) -> TokenStream {
    let ident = field.ident;
    let inner = &field.inner;
    let plain = ident.to_string();
    let plain = plain.strip_prefix("r#").unwrap_or(&plain);
    let setter = format_ident!("set_{}", plain);
    let segment = last_segment(inner);
    let kind = segment.map(|s| s.ident.to_string()).unwrap_or_default();

    let getter = match kind.as_str() {
        "String" => quote! {
            pub fn #ident(&self) -> ::std::option::Option<&str> {
                self.#ident.as_deref()
            }
        },
        "Vec" => {
            let elem = segment.and_then(|s| extract_single_generic_arg(&s.arguments));
            match elem {
                Some(elem) => quote! {
                    pub fn #ident(&self) -> ::std::option::Option<&[#elem]> {
                        self.#ident.as_deref()
                    }
                },
                None => quote! {
                    pub fn #ident(&self) -> ::std::option::Option<&#inner> {
                        self.#ident.as_ref()
                    }
                },
            }
        }
        k if COPY_TYPES.contains(&k) => quote! {
            pub fn #ident(&self) -> ::std::option::Option<#inner> {
                self.#ident
            }
        },
        _ => quote! {
            pub fn #ident(&self) -> ::std::option::Option<&#inner> {
                self.#ident.as_ref()
            }
        },
    };

    quote! {
        #getter

        pub fn #setter(&mut self, value: ::std::option::Option<#inner>) {
            self.#ident = value;
        }
    }
}

fn generate_deref(name: &Ident, ident: &Ident, ty: &Type) -> TokenStream {
    quote! {
        impl ::std::ops::Deref for #name {
            type Target = #ty;

            fn deref(&self) -> &#ty {
                &self.#ident
            }
        }

        impl ::std::ops::DerefMut for #name {
            fn deref_mut(&mut self) -> &mut #ty {
                &mut self.#ident
            }
        }
    }
}

fn generate_holder(name: &Ident, anchor: Anchor<'_>) -> TokenStream {
    let (get, get_mut) = match anchor {
        Anchor::Bag(bag) => (quote! { &self.#bag }, quote! { &mut self.#bag }),
        Anchor::Base(ident, _) => (
            quote! { ::odata_core::AdditionalDataHolder::additional_data(&self.#ident) },
            quote! { ::odata_core::AdditionalDataHolder::additional_data_mut(&mut self.#ident) },
        ),
    };

    quote! {
        impl ::odata_core::AdditionalDataHolder for #name {
            fn additional_data(&self) -> &::odata_core::AdditionalData {
                #get
            }

            fn additional_data_mut(&mut self) -> &mut ::odata_core::AdditionalData {
                #get_mut
            }
        }
    }
}

fn generate_serializable(
    name: &Ident,
    base: Option<(&Ident, &Type)>,
    declared: &[DeclaredField<'_>],
) -> TokenStream {
    let base_write = base.map(|(ident, _)| {
        quote! { ::odata_core::Serializable::serialize_fields(&self.#ident, writer)?; }
    });
    let writes = declared.iter().map(|f| {
        let ident = f.ident;
        let wire = &f.wire;
        quote! { ::odata_core::write_field(#wire, &self.#ident, writer)?; }
    });

    quote! {
        impl ::odata_core::Serializable for #name {
            fn serialize_fields(
                &self,
                writer: &mut dyn ::odata_core::SerializationWriter,
            ) -> ::std::result::Result<(), ::odata_core::EncodeError> {
                #base_write
                #(#writes)*
                ::std::result::Result::Ok(())
            }
        }
    }
}

fn generate_table(
    name: &Ident,
    base: Option<(&Ident, &Type)>,
    declared: &[DeclaredField<'_>],
) -> TokenStream {
    let init = match base {
        Some((ident, ty)) => quote! {
            ::odata_core::FieldDeserializers::inherit(
                <#ty as ::odata_core::Record>::field_deserializers(),
                |record: &mut Self| &mut record.#ident,
            )
        },
        None => quote! { ::odata_core::FieldDeserializers::new() },
    };
    let inserts = declared.iter().map(|f| {
        let ident = f.ident;
        let inner = &f.inner;
        let wire = &f.wire;
        let read = if wire == ODATA_TYPE {
            quote! { ::odata_core::type_tag_value(node) }
        } else {
            quote! { <#inner as ::odata_core::FieldValue>::read(node)? }
        };
        quote! {
            table.insert(#wire, |record: &mut Self, node: &dyn ::odata_core::ParseNode| {
                record.#ident = #read;
                ::std::result::Result::Ok(())
            });
        }
    });

    quote! {
        impl ::odata_core::Record for #name {
            fn field_deserializers() -> ::odata_core::FieldDeserializers<Self> {
                #[allow(unused_mut)]
                let mut table = #init;
                #(#inserts)*
                table
            }
        }
    }
}
