// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Union declaration macro.

/// Implement [`Bind`](crate::Bind) for a union type.
///
/// Two forms:
///
/// - `sealed dyn Trait = "namespace", "Name" { A, B, .. }` binds
///   `Box<dyn Trait>` as a sealed union with exactly the listed members.
///   `Trait` must have [`Variant`](crate::Variant) as a supertrait.
/// - `open Wrapper = "namespace", "Name" { A, .. }` binds a tuple struct
///   `Wrapper(Poly)` as an open union. The member list is an optional seed;
///   other bindable types are discovered on first encode.
///
/// Members must bind as records (for example through `#[derive(Bind)]`).
///
/// # Example
///
/// ```rust
/// use typebind::{bind_union, Bind, Codec, Error, Resolver, Variant};
///
/// trait Shape: Variant {}
///
/// #[derive(Bind, Debug, PartialEq)]
/// #[bind(namespace = "geo")]
/// struct Circle {
///     radius: f64,
/// }
/// impl Shape for Circle {}
///
/// #[derive(Bind, Debug, PartialEq)]
/// #[bind(namespace = "geo")]
/// struct Triangle {
///     base: f64,
/// }
/// impl Shape for Triangle {}
///
/// bind_union!(sealed dyn Shape = "geo", "Shape" { Circle });
///
/// let resolver = Resolver::new();
/// let codec = Codec::new(&resolver);
///
/// let circle: Box<dyn Shape> = Box::new(Circle { radius: 5.0 });
/// assert!(codec.encode(&circle).is_ok());
///
/// let triangle: Box<dyn Shape> = Box::new(Triangle { base: 1.0 });
/// assert!(matches!(codec.encode(&triangle), Err(Error::UnionMemberNotValid { .. })));
/// ```
#[macro_export]
macro_rules! bind_union {
    (sealed dyn $trait:ident = $namespace:literal, $name:literal { $($member:ty),+ $(,)? }) => {
        impl $crate::Bind for ::std::boxed::Box<dyn $trait> {
            fn native_type() -> $crate::NativeType {
                fn inspect(
                    value: &dyn ::std::any::Any,
                ) -> ::std::option::Option<$crate::VariantRef<'_>> {
                    let boxed = value.downcast_ref::<::std::boxed::Box<dyn $trait>>()?;
                    ::std::option::Option::Some($crate::VariantRef::new(
                        <dyn $trait as $crate::Variant>::as_any(&**boxed),
                        <dyn $trait as $crate::Variant>::variant_name(&**boxed),
                        ::std::option::Option::None,
                    ))
                }

                fn wrap(
                    value: $crate::NativeValue,
                    ty: $crate::TypeRef,
                ) -> $crate::Result<$crate::NativeValue> {
                    $(
                        if ty == $crate::TypeRef::of::<$member>() {
                            let member = value.downcast::<$member>().map_err(|_| {
                                $crate::Error::ValueMismatch {
                                    expected: ::std::any::type_name::<$member>().to_string(),
                                    found: "value of another type".to_string(),
                                }
                            })?;
                            let boxed: ::std::boxed::Box<dyn $trait> = member;
                            let wrapped: $crate::NativeValue = ::std::boxed::Box::new(boxed);
                            return ::std::result::Result::Ok(wrapped);
                        }
                    )+
                    ::std::result::Result::Err($crate::Error::UnionMemberNotValid {
                        union: $crate::Typename::from_static($namespace, $name),
                        member: ty.rust_name().to_string(),
                    })
                }

                $crate::NativeType::union::<Self>(
                    $crate::Typename::from_static($namespace, $name),
                    $crate::UnionShape::sealed(
                        ::std::vec![$($crate::TypeRef::of::<$member>()),+],
                        inspect,
                        wrap,
                    ),
                )
            }
        }
    };

    (open $wrapper:ident = $namespace:literal, $name:literal $({ $($member:ty),* $(,)? })?) => {
        impl $crate::Bind for $wrapper {
            fn native_type() -> $crate::NativeType {
                fn inspect(
                    value: &dyn ::std::any::Any,
                ) -> ::std::option::Option<$crate::VariantRef<'_>> {
                    value.downcast_ref::<$wrapper>().map(|wrapper| wrapper.0.variant())
                }

                fn wrap(
                    value: $crate::NativeValue,
                    ty: $crate::TypeRef,
                ) -> $crate::Result<$crate::NativeValue> {
                    let poly = $crate::Poly::from_parts(value, ty)?;
                    let wrapped: $crate::NativeValue = ::std::boxed::Box::new($wrapper(poly));
                    ::std::result::Result::Ok(wrapped)
                }

                $crate::NativeType::union::<Self>(
                    $crate::Typename::from_static($namespace, $name),
                    $crate::UnionShape::open(
                        ::std::vec![$($($crate::TypeRef::of::<$member>()),*)?],
                        inspect,
                        wrap,
                    ),
                )
            }
        }
    };
}
