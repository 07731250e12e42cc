// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptor resolution.
//!
//! The [`Resolver`] turns a [`TypeRef`] into an immutable, shared
//! [`TypeDescriptor`] the first time it is asked, and serves the cached
//! descriptor afterwards.
//!
//! ```text
//! resolve(ty)
//!   +-- cache hit                      -> Arc<TypeDescriptor>
//!   +-- describe ty
//!         Atom       -> AtomDescriptor
//!         Container  -> ContainerDescriptor (bridge from BridgeRegistry)
//!         Union      -> UnionDescriptor (declared members)
//!         Record     -> RecordDescriptor (canonical constructor/accessors)
//!         Opaque     -> UnsupportedType
//!   +-- cache.entry(type_id).or_insert  (first insert wins)
//! ```
//!
//! Resolution never recurses into field types, so self-referential types
//! resolve in one step; field types are resolved lazily when a codec or
//! schema walk reaches them.

mod descriptor;
mod record;

pub use descriptor::{
    AtomDescriptor, ContainerDescriptor, DescriptorTag, FieldBinding, RecordDescriptor,
    TypeDescriptor,
};

use crate::bridge::{Bridge, BridgeRegistry};
use crate::config::BindConfig;
use crate::error::{Error, Result};
use crate::library::{DefinitionState, TypeLibrary};
use crate::model::{Definition, Field, FieldType, Record, Sequence, Typename};
use crate::native::{Bind, ContainerFamily, NativeValue, Shape, TypeRef};
use crate::union::{ResolvedMember, UnionDescriptor};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Descriptor cache and factory.
///
/// Share one resolver (by reference or `Arc`) between every codec that
/// works on the same set of types.
pub struct Resolver {
    cache: DashMap<TypeId, Arc<TypeDescriptor>>,
    bridges: BridgeRegistry,
    config: BindConfig,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_config(BindConfig::default())
    }

    pub fn with_config(config: BindConfig) -> Self {
        Self {
            cache: DashMap::new(),
            bridges: BridgeRegistry::with_config(&config),
            config,
        }
    }

    /// Bridge registry; register custom container bridges here.
    pub fn bridges(&self) -> &BridgeRegistry {
        &self.bridges
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Cached or newly computed descriptor for `ty`.
    pub fn resolve(&self, ty: TypeRef) -> Result<Arc<TypeDescriptor>> {
        if let Some(hit) = self.cache.get(&ty.type_id()) {
            return Ok(Arc::clone(&hit));
        }

        let computed = Arc::new(self.compute(ty)?);
        let cached = Arc::clone(
            &self
                .cache
                .entry(ty.type_id())
                .or_insert_with(|| Arc::clone(&computed)),
        );
        if !Arc::ptr_eq(&cached, &computed) {
            log::debug!(
                "[resolver] concurrent resolution of {}, keeping first descriptor",
                ty.rust_name()
            );
        }
        Ok(cached)
    }

    /// Shorthand for `resolve(TypeRef::of::<T>())`.
    pub fn resolve_type<T: Bind>(&self) -> Result<Arc<TypeDescriptor>> {
        self.resolve(TypeRef::of::<T>())
    }

    pub fn is_cached(&self, ty: TypeRef) -> bool {
        self.cache.contains_key(&ty.type_id())
    }

    /// Number of cached descriptors.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Bridge serving the container type `ty`.
    pub fn bridge_for(&self, ty: TypeRef) -> Result<Arc<dyn Bridge>> {
        match &*self.resolve(ty)? {
            TypeDescriptor::Container(container) => Ok(Arc::clone(&container.bridge)),
            _ => Err(Error::unsupported(ty.rust_name())),
        }
    }

    fn compute(&self, ty: TypeRef) -> Result<TypeDescriptor> {
        let native = ty.describe();
        log::debug!(
            "[resolver] resolving {} ({})",
            native.rust_name,
            native.shape.kind_name()
        );

        if let Some(element) = self.bridges.custom_element(native.type_id) {
            let bridge = self.bridges.bridge_for(&native)?;
            let family = match &native.shape {
                Shape::Container(shape) => shape.family,
                _ => ContainerFamily::Collection,
            };
            return Ok(TypeDescriptor::Container(ContainerDescriptor {
                rust_name: native.rust_name,
                element,
                family,
                bridge,
            }));
        }

        match native.shape {
            Shape::Atom(kind) => Ok(TypeDescriptor::Atom(AtomDescriptor {
                kind,
                typename: kind.typename(),
                rust_name: native.rust_name,
            })),
            Shape::Container(ref shape) => {
                let bridge = self.bridges.bridge_for(&native)?;
                Ok(TypeDescriptor::Container(ContainerDescriptor {
                    rust_name: native.rust_name,
                    element: shape.element,
                    family: shape.family,
                    bridge,
                }))
            }
            Shape::Record(shape) => {
                let typename = native
                    .typename
                    .ok_or_else(|| Error::binding(native.rust_name, "record has no typename"))?;
                record::bind_record(native.type_id, native.rust_name, typename, shape)
                    .map(TypeDescriptor::Record)
            }
            Shape::Union(shape) => {
                let typename = native
                    .typename
                    .ok_or_else(|| Error::binding(native.rust_name, "union has no typename"))?;
                UnionDescriptor::new(typename, native.rust_name, shape, self.config.union_discovery)
                    .map(TypeDescriptor::Union)
            }
            Shape::Opaque => Err(Error::unsupported(native.rust_name)),
        }
    }

    // ------------------------------------------------------------------------
    // Unions
    // ------------------------------------------------------------------------

    /// Resolve a union value to its discriminator and member record view.
    pub fn resolve_union_member<'a>(
        &self,
        union: &UnionDescriptor,
        value: &'a dyn Any,
    ) -> Result<ResolvedMember<'a>> {
        union.resolve_member(self, value)
    }

    /// Construct the union member named by `member` from field values.
    pub fn construct_union_member(
        &self,
        union: &UnionDescriptor,
        member: &Typename,
        values: Vec<NativeValue>,
    ) -> Result<NativeValue> {
        union.construct_member(self, member, values)
    }

    // ------------------------------------------------------------------------
    // Schema derivation
    // ------------------------------------------------------------------------

    /// Generic schema form of `ty`.
    pub fn definition_of(&self, ty: TypeRef) -> Result<Definition> {
        match &*self.resolve(ty)? {
            TypeDescriptor::Atom(atom) => Ok(Definition::Atom(atom.kind.atom())),
            TypeDescriptor::Record(record) => {
                let fields = record
                    .fields()
                    .iter()
                    .map(|f| Ok(Field::new(f.name, self.field_type_of(f.ty)?, f.ordinal)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Definition::Record(Record::new(fields)?))
            }
            TypeDescriptor::Container(container) => Ok(Definition::Sequence(Sequence::new(
                self.field_type_of(container.element)?,
            ))),
            TypeDescriptor::Union(union) => union.definition(),
        }
    }

    /// Named reference when `ty` has a typename, inline definition otherwise.
    fn field_type_of(&self, ty: TypeRef) -> Result<FieldType> {
        match self.resolve(ty)?.typename() {
            Some(typename) => Ok(FieldType::Named(typename.clone())),
            None => Ok(FieldType::Inline(Box::new(self.definition_of(ty)?))),
        }
    }

    /// Register `ty` and every named type it reaches in `library`.
    ///
    /// Each typename is reserved before descending, so recursive types
    /// terminate. Types already reserved are left alone; a type already
    /// registered must match its registered definition or the call fails
    /// with [`Error::TypeAlreadyRegistered`]. Not transactional: on error, registrations made so far remain.
    pub fn register_with(&self, ty: TypeRef, library: &TypeLibrary) -> Result<()> {
        let descriptor = self.resolve(ty)?;

        let Some(typename) = descriptor.typename().cloned() else {
            for dependency in dependencies(&descriptor) {
                self.register_with(dependency, library)?;
            }
            return Ok(());
        };

        match library.definition_state(&typename) {
            DefinitionState::Unregistered => {}
            DefinitionState::Reserved => return Ok(()),
            // Equal definitions are idempotent, different ones conflict.
            DefinitionState::Registered => {
                return library.register(&typename, self.definition_of(ty)?);
            }
        }
        match library.reserve(&typename) {
            Ok(()) => {}
            // Lost a race with another registration of the same type.
            Err(Error::TypeReserved(_)) => match library.definition_state(&typename) {
                DefinitionState::Registered => {
                    return library.register(&typename, self.definition_of(ty)?);
                }
                _ => return Ok(()),
            },
            Err(e) => return Err(e),
        }

        for dependency in dependencies(&descriptor) {
            self.register_with(dependency, library)?;
        }
        library.register(&typename, self.definition_of(ty)?)
    }
}

/// Types a descriptor's schema refers to.
fn dependencies(descriptor: &TypeDescriptor) -> Vec<TypeRef> {
    match descriptor {
        TypeDescriptor::Atom(_) => Vec::new(),
        TypeDescriptor::Record(record) => record.fields().iter().map(|f| f.ty).collect(),
        TypeDescriptor::Container(container) => vec![container.element],
        TypeDescriptor::Union(union) => union.members().into_iter().map(|m| m.ty).collect(),
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("cached", &self.cache.len())
            .field("bridges", &self.bridges)
            .field("config", &self.config)
            .finish()
    }
}
