// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native type descriptions.
//!
//! A native Rust type takes part in generic binding by implementing [`Bind`],
//! which returns a [`NativeType`]: the raw material the
//! [`Resolver`](crate::Resolver) turns into an immutable descriptor. Nothing
//! here is introspected at runtime; the description lists candidate
//! constructors and accessors explicitly (hand-written, or generated by
//! `#[derive(Bind)]`).
//!
//! Native values cross the binding layer type-erased, as [`NativeValue`]
//! (owned) or `&dyn Any` (borrowed). Exact concrete type identity is
//! [`TypeId`] equality.

use crate::bridge::NativeSequence;
use crate::error::{Error, Result};
use crate::model::{builtin, Atom, Typename};
use crate::value::Value;
use std::any::{type_name, Any, TypeId};
use std::collections::VecDeque;
use std::fmt;

/// Owned, type-erased native value.
pub type NativeValue = Box<dyn Any + Send>;

/// Builds a native instance from field values in constructor order.
pub type ConstructFn = fn(Vec<NativeValue>) -> Result<NativeValue>;

/// Borrows one field out of a native instance.
pub type AccessFn = fn(&dyn Any) -> Option<&dyn Any>;

/// Finds the concrete member behind a union value.
pub type InspectFn = for<'a> fn(&'a dyn Any) -> Option<VariantRef<'a>>;

/// Wraps a constructed member into the union's native representation.
pub type WrapFn = fn(NativeValue, TypeRef) -> Result<NativeValue>;

/// A native type that can be bound to the generic model.
///
/// # Example
///
/// ```rust
/// use typebind::{Bind, Codec, Resolver, Value};
///
/// #[derive(Bind, Debug, PartialEq)]
/// #[bind(namespace = "geo")]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let resolver = Resolver::new();
/// let codec = Codec::new(&resolver);
/// let value = codec.encode(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value, Value::record([("x", 1i32), ("y", 2i32)]));
/// assert_eq!(codec.decode::<Point>(value).unwrap(), Point { x: 1, y: 2 });
/// ```
pub trait Bind: Any + Send + Sized {
    /// Describe how to construct and decompose `Self`.
    fn native_type() -> NativeType;
}

/// Copyable handle on a bindable type.
///
/// Describing is lazy: holding a `TypeRef` to a field type never recurses,
/// so self-referential types can be described.
#[derive(Clone, Copy)]
pub struct TypeRef {
    type_id: TypeId,
    rust_name: &'static str,
    describe: fn() -> NativeType,
}

impl TypeRef {
    pub fn of<T: Bind>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            describe: T::native_type,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Produce the native description.
    pub fn describe(&self) -> NativeType {
        (self.describe)()
    }

    /// Exact identity check against a borrowed value.
    pub fn matches(&self, value: &dyn Any) -> bool {
        value.type_id() == self.type_id
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeRef {}

impl std::hash::Hash for TypeRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.rust_name)
    }
}

/// Primitive leaf kinds.
///
/// All but `String` get a dedicated array bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    /// byte
    U8,
    Char,
    /// short
    I16,
    /// int
    I32,
    /// long
    I64,
    /// float
    F32,
    /// double
    F64,
    String,
}

impl PrimitiveKind {
    /// Typename of the built-in atom for this kind.
    pub fn typename(self) -> Typename {
        builtin::typename_of(self)
    }

    pub fn atom(self) -> Atom {
        builtin::atom_of(self)
    }

    /// `true` if `Vec<kind>` is served by a dedicated primitive bridge.
    pub fn has_array_bridge(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Read a borrowed native primitive as a generic value.
    pub fn to_value(self, native: &dyn Any) -> Option<Value> {
        match self {
            Self::Bool => native.downcast_ref::<bool>().map(|v| Value::Bool(*v)),
            Self::U8 => native.downcast_ref::<u8>().map(|v| Value::U8(*v)),
            Self::Char => native.downcast_ref::<char>().map(|v| Value::Char(*v)),
            Self::I16 => native.downcast_ref::<i16>().map(|v| Value::I16(*v)),
            Self::I32 => native.downcast_ref::<i32>().map(|v| Value::I32(*v)),
            Self::I64 => native.downcast_ref::<i64>().map(|v| Value::I64(*v)),
            Self::F32 => native.downcast_ref::<f32>().map(|v| Value::F32(*v)),
            Self::F64 => native.downcast_ref::<f64>().map(|v| Value::F64(*v)),
            Self::String => native.downcast_ref::<String>().map(|v| Value::String(v.clone())),
        }
    }

    /// Turn a generic value into an owned native primitive.
    ///
    /// Hands the value back when its variant does not match this kind.
    pub fn from_value(self, value: Value) -> std::result::Result<NativeValue, Value> {
        match (self, value) {
            (Self::Bool, Value::Bool(v)) => Ok(Box::new(v)),
            (Self::U8, Value::U8(v)) => Ok(Box::new(v)),
            (Self::Char, Value::Char(v)) => Ok(Box::new(v)),
            (Self::I16, Value::I16(v)) => Ok(Box::new(v)),
            (Self::I32, Value::I32(v)) => Ok(Box::new(v)),
            (Self::I64, Value::I64(v)) => Ok(Box::new(v)),
            (Self::F32, Value::F32(v)) => Ok(Box::new(v)),
            (Self::F64, Value::F64(v)) => Ok(Box::new(v)),
            (Self::String, Value::String(v)) => Ok(Box::new(v)),
            (_, other) => Err(other),
        }
    }
}

/// Everything the resolver needs to know about one native type.
pub struct NativeType {
    pub type_id: TypeId,
    pub rust_name: &'static str,
    /// Schema identity; `None` for anonymous shapes such as containers.
    pub typename: Option<Typename>,
    pub shape: Shape,
}

impl NativeType {
    fn of<T: Any>(typename: Option<Typename>, shape: Shape) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            typename,
            shape,
        }
    }

    pub fn atom<T: Any>(kind: PrimitiveKind) -> Self {
        Self::of::<T>(Some(kind.typename()), Shape::Atom(kind))
    }

    pub fn record<T: Any>(typename: Typename, shape: RecordShape) -> Self {
        Self::of::<T>(Some(typename), Shape::Record(shape))
    }

    pub fn container<T: Any>(shape: ContainerShape) -> Self {
        Self::of::<T>(None, Shape::Container(shape))
    }

    pub fn union<T: Any>(typename: Typename, shape: UnionShape) -> Self {
        Self::of::<T>(Some(typename), Shape::Union(shape))
    }

    /// A type with no generic form.
    pub fn opaque<T: Any>() -> Self {
        Self::of::<T>(None, Shape::Opaque)
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self.shape, Shape::Opaque)
    }
}

impl fmt::Debug for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeType")
            .field("rust_name", &self.rust_name)
            .field("typename", &self.typename)
            .field("shape", &self.shape.kind_name())
            .finish()
    }
}

/// Classification of a native type.
pub enum Shape {
    Atom(PrimitiveKind),
    Record(RecordShape),
    Container(ContainerShape),
    Union(UnionShape),
    Opaque,
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Atom(_) => "atom",
            Self::Record(_) => "record",
            Self::Container(_) => "container",
            Self::Union(_) => "union",
            Self::Opaque => "opaque",
        }
    }
}

/// Candidate constructors and accessors of a record-like type.
#[derive(Clone, Default)]
pub struct RecordShape {
    pub constructors: Vec<Constructor>,
    pub accessors: Vec<Accessor>,
}

impl RecordShape {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn accessor(mut self, name: &'static str, ty: TypeRef, get: AccessFn) -> Self {
        self.accessors.push(Accessor { name, ty, get });
        self
    }
}

/// One construction contract: ordered parameters plus the build function.
#[derive(Clone)]
pub struct Constructor {
    pub params: Vec<Param>,
    pub build: ConstructFn,
}

impl Constructor {
    pub fn new(build: ConstructFn) -> Self {
        Self {
            params: Vec::new(),
            build,
        }
    }

    /// Add a named parameter (matched to an accessor by name).
    #[must_use]
    pub fn param(mut self, name: &'static str, ty: TypeRef) -> Self {
        self.params.push(Param {
            name: Some(name),
            ty,
        });
        self
    }

    /// Add a positional parameter (matched to an accessor by position).
    #[must_use]
    pub fn positional(mut self, ty: TypeRef) -> Self {
        self.params.push(Param { name: None, ty });
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: Option<&'static str>,
    pub ty: TypeRef,
}

#[derive(Clone, Copy)]
pub struct Accessor {
    pub name: &'static str,
    pub ty: TypeRef,
    pub get: AccessFn,
}

/// Whether a container is an array or a general collection.
///
/// Only arrays of primitives use the dedicated primitive bridges;
/// collections always go through the shared object bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFamily {
    Array,
    Collection,
}

#[derive(Clone, Copy)]
pub struct ContainerShape {
    pub element: TypeRef,
    pub family: ContainerFamily,
    pub sequence: SequenceOps,
}

/// Type-erased entry points into a concrete [`NativeSequence`] implementation.
#[derive(Clone, Copy)]
pub struct SequenceOps {
    pub view: fn(&dyn Any) -> Option<&dyn NativeSequence>,
    pub view_mut: fn(&mut dyn Any) -> Option<&mut dyn NativeSequence>,
    pub construct: fn(usize) -> NativeValue,
}

impl SequenceOps {
    pub fn of<C: NativeSequence>() -> Self {
        fn view<C: NativeSequence>(container: &dyn Any) -> Option<&dyn NativeSequence> {
            container.downcast_ref::<C>().map(|c| c as &dyn NativeSequence)
        }
        fn view_mut<C: NativeSequence>(container: &mut dyn Any) -> Option<&mut dyn NativeSequence> {
            container.downcast_mut::<C>().map(|c| c as &mut dyn NativeSequence)
        }
        fn construct<C: NativeSequence>(capacity: usize) -> NativeValue {
            Box::new(C::with_capacity(capacity))
        }

        Self {
            view: view::<C>,
            view_mut: view_mut::<C>,
            construct: construct::<C>,
        }
    }
}

/// Native polymorphism contract.
#[derive(Clone)]
pub struct UnionShape {
    pub sealed: bool,
    /// Declared members; the full set when sealed, a seed when open.
    pub members: Vec<TypeRef>,
    pub inspect: InspectFn,
    pub wrap: WrapFn,
}

impl UnionShape {
    pub fn sealed(members: Vec<TypeRef>, inspect: InspectFn, wrap: WrapFn) -> Self {
        Self {
            sealed: true,
            members,
            inspect,
            wrap,
        }
    }

    pub fn open(members: Vec<TypeRef>, inspect: InspectFn, wrap: WrapFn) -> Self {
        Self {
            sealed: false,
            members,
            inspect,
            wrap,
        }
    }
}

/// The concrete value behind a union, as seen by [`InspectFn`].
#[derive(Clone, Copy)]
pub struct VariantRef<'a> {
    pub value: &'a dyn Any,
    pub rust_name: &'static str,
    /// Binding handle, when the carrier knows it (open unions need it).
    pub ty: Option<TypeRef>,
}

impl<'a> VariantRef<'a> {
    pub fn new(value: &'a dyn Any, rust_name: &'static str, ty: Option<TypeRef>) -> Self {
        Self {
            value,
            rust_name,
            ty,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.value.type_id()
    }
}

/// Upcast helper for trait objects used as sealed unions.
///
/// Make it a supertrait of the union trait (`trait Shape: Variant {}`) so
/// the concrete value behind a `Box<dyn Shape>` can be identified.
///
/// Every `Any + Send` type implements `Variant`, the box included. Calling
/// `boxed.as_any()` on a `Box<dyn Shape>` therefore resolves to the box's
/// own impl and yields the box, not the member. Dereference first:
///
/// ```ignore
/// let shape: Box<dyn Shape> = Box::new(Circle { radius: 1.0 });
/// assert!((*shape).as_any().is::<Circle>());
/// assert!(shape.as_any().is::<Box<dyn Shape>>());
/// ```
pub trait Variant: Any + Send {
    fn as_any(&self) -> &dyn Any;

    fn variant_name(&self) -> &'static str;
}

impl<T: Any + Send> Variant for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn variant_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Owned carrier for an open union value.
///
/// Remembers the [`TypeRef`] of the concrete value so the union can
/// discover it as a new member and later construct it from a discriminator.
pub struct Poly {
    value: NativeValue,
    ty: TypeRef,
}

impl Poly {
    pub fn new<T: Bind>(value: T) -> Self {
        Self {
            value: Box::new(value),
            ty: TypeRef::of::<T>(),
        }
    }

    /// Reassemble from a type-erased value; `ty` must describe `value`.
    pub fn from_parts(value: NativeValue, ty: TypeRef) -> Result<Self> {
        if !ty.matches(&*value) {
            return Err(Error::mismatch(ty.rust_name(), "value of another type"));
        }
        Ok(Self { value, ty })
    }

    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn get(&self) -> &dyn Any {
        &*self.value
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn into_inner(self) -> NativeValue {
        self.value
    }

    /// View for an [`InspectFn`].
    pub fn variant(&self) -> VariantRef<'_> {
        VariantRef::new(self.get(), self.ty.rust_name(), Some(self.ty))
    }
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Poly({})", self.ty.rust_name())
    }
}

/// Pop the next constructor argument and downcast it.
///
/// Used by generated constructors.
pub fn take_field<T: Any>(
    fields: &mut impl Iterator<Item = NativeValue>,
    name: &str,
) -> Result<T> {
    let value = fields
        .next()
        .ok_or_else(|| Error::mismatch(format!("field `{}`", name), "end of fields"))?;
    value.downcast::<T>().map(|v| *v).map_err(|_| {
        Error::mismatch(
            type_name::<T>(),
            format!("value of another type for field `{}`", name),
        )
    })
}

macro_rules! bind_atom {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Bind for $ty {
                fn native_type() -> NativeType {
                    NativeType::atom::<$ty>(PrimitiveKind::$kind)
                }
            }
        )+
    };
}

bind_atom!(
    bool => Bool,
    u8 => U8,
    char => Char,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
);

impl<T: Bind> Bind for Vec<T> {
    fn native_type() -> NativeType {
        NativeType::container::<Self>(ContainerShape {
            element: TypeRef::of::<T>(),
            family: ContainerFamily::Array,
            sequence: SequenceOps::of::<Self>(),
        })
    }
}

impl<T: Bind> Bind for VecDeque<T> {
    fn native_type() -> NativeType {
        NativeType::container::<Self>(ContainerShape {
            element: TypeRef::of::<T>(),
            family: ContainerFamily::Collection,
            sequence: SequenceOps::of::<Self>(),
        })
    }
}
