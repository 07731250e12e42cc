// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typebind - bind native Rust types to a generic schema model
//!
//! typebind maps native values onto a language-neutral data model (atoms,
//! records, unions, sequences) so a generic codec can serialize them without
//! knowing their concrete types, and keeps a registry of named schema
//! definitions.
//!
//! ## Quick Start
//!
//! ```rust
//! use typebind::{Bind, Codec, Resolver, TypeLibrary, TypeRef, Value};
//!
//! #[derive(Bind, Debug, PartialEq)]
//! #[bind(namespace = "geo")]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let resolver = Resolver::new();
//! let codec = Codec::new(&resolver);
//!
//! let value = codec.encode(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(value, Value::record([("x", 1i32), ("y", 2i32)]));
//! assert_eq!(codec.decode::<Point>(value).unwrap(), Point { x: 1, y: 2 });
//!
//! // Publish the schema.
//! let library = TypeLibrary::new();
//! resolver.register_with(TypeRef::of::<Point>(), &library).unwrap();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +----------------------------------------------------------------+
//! |  Codec            encode / decode  (native <-> Value)          |
//! +----------------------------------------------------------------+
//! |  Resolver         TypeRef -> Arc<TypeDescriptor>  (cached)     |
//! |    RecordDescriptor   canonical constructor + accessors        |
//! |    ContainerDescriptor  ---------------> BridgeRegistry        |
//! |    UnionDescriptor    sealed / open member table               |
//! +----------------------------------------------------------------+
//! |  Bind             native description (derive or hand-written)  |
//! +----------------------------------------------------------------+
//! |  TypeLibrary      Typename -> Definition  (reserve/register)   |
//! +----------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bind`] | Native description of a type (derive with `#[derive(Bind)]`) |
//! | [`Resolver`] | Produces and caches binding descriptors |
//! | [`Bridge`] | Uniform sequence access over arrays and collections |
//! | [`UnionDescriptor`] | Sealed/open union member resolution |
//! | [`TypeLibrary`] | Registry of generic definitions |
//! | [`Codec`] | Reference encoder/decoder to [`Value`] |

// Allow the derive macro to work inside this crate's tests
extern crate self as typebind;

/// Sequence access over arrays and collections.
pub mod bridge;
/// Generic codec over the resolver.
pub mod codec;
/// Configuration (YAML loadable).
pub mod config;
mod error;
/// Type library (typename -> definition registry).
pub mod library;
mod macros;
/// Generic schema model.
pub mod model;
/// Native binding contract.
pub mod native;
/// Descriptor resolution and caching.
pub mod resolve;
/// Union member resolution.
pub mod union;
mod value;

pub use bridge::{
    Bridge, BridgeRegistry, Element, ElementForm, IterationState, NativeSequence, ObjectBridge,
    OwnedElement,
};
pub use codec::Codec;
pub use config::{BindConfig, DiscoveryPolicy, BUILTIN_NAMESPACE};
pub use error::{Error, Result};
pub use library::{DefinitionState, TypeLibrary, TypeLibraryEntry};
pub use model::builtin;
pub use model::{
    Atom, AtomAttribute, Definition, Field, FieldType, Record, Sequence, Typename, Union,
};
pub use native::{
    Bind, Constructor, ContainerFamily, ContainerShape, NativeType, NativeValue, Poly,
    PrimitiveKind, RecordShape, SequenceOps, Shape, TypeRef, UnionShape, Variant, VariantRef,
};
pub use resolve::{
    AtomDescriptor, ContainerDescriptor, DescriptorTag, FieldBinding, RecordDescriptor, Resolver,
    TypeDescriptor,
};
pub use union::{ResolvedMember, UnionDescriptor, UnionMember};
pub use value::Value;

// Derive macro (for #[derive(typebind::Bind)])
pub use typebind_codegen::Bind;
