// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// One struct field as seen by the generated binding.
struct FieldInfo {
    /// `x` for named fields, `0` for tuple fields.
    member: syn::Member,
    /// Name exposed to the generic model.
    name: LitStr,
    ty: syn::Type,
}

/// Struct-level `#[bind(...)]` options.
#[derive(Default)]
struct BindAttrs {
    namespace: Option<LitStr>,
    name: Option<LitStr>,
}

/// `#[derive(Bind)]` macro: generates a `typebind::Bind` impl for a struct
///
/// The struct binds as a record. Its memberwise constructor is the only
/// constructor declared, and every field gets an accessor, so resolution
/// always finds exactly one pairing:
/// - named fields: parameters matched to accessors by name
/// - tuple fields: parameters matched by position (accessors `"0"`, `"1"`, ..)
/// - unit structs: an empty record
///
/// Every field type must itself implement `Bind`.
///
/// Attributes:
/// - `#[bind(namespace = "geo", name = "Point")]` on the struct sets the
///   typename (defaults: the crate name and the struct name)
/// - `#[bind(rename = "x_pos")]` on a named field sets its generic name
///
/// Example:
/// ```ignore
/// use typebind::Bind;
///
/// #[derive(Bind)]
/// #[bind(namespace = "geo")]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Bind cannot be derived for generic types",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Only structs are supported; declare unions with bind_union!",
        ));
    };

    let attrs = parse_struct_attrs(input)?;
    let namespace = match attrs.namespace {
        Some(lit) => quote!(#lit),
        None => quote!(::core::env!("CARGO_PKG_NAME")),
    };
    let type_name = attrs
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    let positional = matches!(data.fields, Fields::Unnamed(_));
    let fields = collect_fields(&data.fields)?;

    // Accessors: one nested fn per field, borrowing it out of `&dyn Any`.
    let getter_idents: Vec<_> = (0..fields.len())
        .map(|i| format_ident!("__typebind_get_{}", i))
        .collect();
    let getters = fields.iter().zip(&getter_idents).map(|(field, getter)| {
        let member = &field.member;
        quote! {
            fn #getter(
                value: &dyn ::core::any::Any,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                value
                    .downcast_ref::<#ident>()
                    .map(|v| &v.#member as &dyn ::core::any::Any)
            }
        }
    });
    let accessors = fields.iter().zip(&getter_idents).map(|(field, getter)| {
        let name = &field.name;
        let ty = &field.ty;
        quote! {
            .accessor(#name, ::typebind::TypeRef::of::<#ty>(), #getter)
        }
    });

    // Constructor: pop each field value in declaration order.
    let locals: Vec<_> = (0..fields.len())
        .map(|i| format_ident!("__typebind_f{}", i))
        .collect();
    let takes = fields.iter().zip(&locals).map(|(field, local)| {
        let name = &field.name;
        let ty = &field.ty;
        quote! {
            let #local = ::typebind::native::take_field::<#ty>(&mut __typebind_values, #name)?;
        }
    });
    let build = match &data.fields {
        Fields::Named(_) => {
            let members = fields.iter().map(|f| &f.member);
            quote!(#ident { #(#members: #locals),* })
        }
        Fields::Unnamed(_) => quote!(#ident ( #(#locals),* )),
        Fields::Unit => quote!(#ident),
    };
    let params = fields.iter().map(|field| {
        let ty = &field.ty;
        if positional {
            quote!(.positional(::typebind::TypeRef::of::<#ty>()))
        } else {
            let name = &field.name;
            quote!(.param(#name, ::typebind::TypeRef::of::<#ty>()))
        }
    });

    Ok(quote! {
        impl ::typebind::Bind for #ident {
            fn native_type() -> ::typebind::NativeType {
                #(#getters)*

                #[allow(unused_mut, unused_variables)]
                fn __typebind_construct(
                    values: ::std::vec::Vec<::typebind::NativeValue>,
                ) -> ::typebind::Result<::typebind::NativeValue> {
                    let mut __typebind_values = values.into_iter();
                    #(#takes)*
                    let value: ::typebind::NativeValue = ::std::boxed::Box::new(#build);
                    ::core::result::Result::Ok(value)
                }

                ::typebind::NativeType::record::<Self>(
                    ::typebind::Typename::from_static(#namespace, #type_name),
                    ::typebind::RecordShape::new()
                        .constructor(
                            ::typebind::Constructor::new(__typebind_construct)
                                #(#params)*
                        )
                        #(#accessors)*,
                )
            }
        }
    })
}

fn parse_struct_attrs(input: &DeriveInput) -> syn::Result<BindAttrs> {
    let mut attrs = BindAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("namespace") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "namespace must not be empty"));
                }
                attrs.namespace = Some(lit);
                Ok(())
            } else if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                let value = lit.value();
                if value.is_empty() || value.contains(':') {
                    return Err(syn::Error::new(
                        lit.span(),
                        "name must be non-empty and must not contain ':'",
                    ));
                }
                attrs.name = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unsupported bind attribute (expected `namespace` or `name`)"))
            }
        })?;
    }
    Ok(attrs)
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<FieldInfo>> {
    let mut infos = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let (member, default_name) = match &field.ident {
            Some(ident) => (syn::Member::Named(ident.clone()), ident.to_string()),
            None => (syn::Member::Unnamed(syn::Index::from(index)), index.to_string()),
        };

        let mut name = LitStr::new(&default_name, Span::call_site());
        for attr in &field.attrs {
            if !attr.path().is_ident("bind") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if field.ident.is_none() {
                        return Err(meta.error("tuple fields cannot be renamed"));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "field name must not be empty"));
                    }
                    name = lit;
                    Ok(())
                } else {
                    Err(meta.error("unsupported bind field attribute (expected `rename`)"))
                }
            })?;
        }

        infos.push(FieldInfo {
            member,
            name,
            ty: field.ty.clone(),
        });
    }
    Ok(infos)
}
