// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Union resolution.
//!
//! Membership is exact concrete-type identity ([`TypeId`] equality), never
//! "implements the union trait". A sealed union accepts only its declared
//! members. An open union appends a member the first time it sees a value
//! of a new concrete type:
//!
//! ```text
//! resolve_member(value)
//!   inspect(value) -> concrete TypeId
//!   read lock:  known member?                -> done
//!   sealed / discovery disabled?             -> UnionMemberNotValid
//!   write lock: re-check, then append member -> done
//! ```

use crate::config::DiscoveryPolicy;
use crate::error::{Error, Result};
use crate::model::{Definition, Typename, Union};
use crate::native::{InspectFn, NativeValue, TypeRef, UnionShape, VariantRef};
use crate::resolve::{DescriptorTag, Resolver, TypeDescriptor};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// One known member of a union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember {
    pub typename: Typename,
    pub ty: TypeRef,
}

/// A union value resolved to its concrete member.
#[derive(Debug)]
pub struct ResolvedMember<'a> {
    /// Discriminator carried alongside the generic payload.
    pub typename: Typename,
    pub ty: TypeRef,
    /// Record descriptor of the member type.
    pub descriptor: Arc<TypeDescriptor>,
    /// The concrete value behind the union.
    pub value: &'a dyn Any,
}

impl<'a> ResolvedMember<'a> {
    /// Record-compatible view of the member value, in ordinal order.
    pub fn fields(&self) -> Result<Vec<(&'static str, &'a dyn Any)>> {
        let record = self.descriptor.as_record().ok_or_else(|| {
            Error::binding(self.ty.rust_name(), "union members must bind as records")
        })?;
        record.decompose(self.value)
    }
}

/// Union descriptor: sealed flag plus the member table.
///
/// The member table only grows.
pub struct UnionDescriptor {
    typename: Typename,
    rust_name: &'static str,
    sealed: bool,
    discovery: DiscoveryPolicy,
    inspect: InspectFn,
    wrap: crate::native::WrapFn,
    members: RwLock<Vec<UnionMember>>,
}

impl UnionDescriptor {
    pub(crate) fn new(
        typename: Typename,
        rust_name: &'static str,
        shape: UnionShape,
        discovery: DiscoveryPolicy,
    ) -> Result<Self> {
        let mut members: Vec<UnionMember> = Vec::with_capacity(shape.members.len());
        for ty in shape.members {
            let native = ty.describe();
            if native.is_opaque() {
                return Err(Error::unsupported(ty.rust_name()));
            }
            let member = native.typename.ok_or_else(|| {
                Error::binding(
                    rust_name,
                    format!("member {} has no typename", ty.rust_name()),
                )
            })?;
            if members.iter().any(|m| m.ty == ty || m.typename == member) {
                return Err(Error::binding(
                    rust_name,
                    format!("duplicate union member {}", member),
                ));
            }
            members.push(UnionMember {
                typename: member,
                ty,
            });
        }

        log::debug!(
            "[union] {} bound ({}, {} declared members)",
            typename,
            if shape.sealed { "sealed" } else { "open" },
            members.len()
        );
        Ok(Self {
            typename,
            rust_name,
            sealed: shape.sealed,
            discovery,
            inspect: shape.inspect,
            wrap: shape.wrap,
            members: RwLock::new(members),
        })
    }

    pub fn typename(&self) -> &Typename {
        &self.typename
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn discovery(&self) -> DiscoveryPolicy {
        self.discovery
    }

    /// Snapshot of the member table, in declaration then discovery order.
    pub fn members(&self) -> Vec<UnionMember> {
        self.members.read().clone()
    }

    /// Member registered under `typename`.
    pub fn member(&self, typename: &Typename) -> Option<UnionMember> {
        self.members
            .read()
            .iter()
            .find(|m| &m.typename == typename)
            .cloned()
    }

    fn member_of(&self, type_id: TypeId) -> Option<UnionMember> {
        self.members
            .read()
            .iter()
            .find(|m| m.ty.type_id() == type_id)
            .cloned()
    }

    /// Schema form from the current member table.
    pub fn definition(&self) -> Result<Definition> {
        let members = self.members.read().iter().map(|m| m.typename.clone()).collect::<Vec<_>>();
        let union = if self.sealed {
            Union::sealed(members)?
        } else {
            Union::open(members)?
        };
        Ok(Definition::Union(union))
    }

    /// Resolve `value` (an instance of the union's native type) to its member.
    pub fn resolve_member<'a>(
        &self,
        resolver: &Resolver,
        value: &'a dyn Any,
    ) -> Result<ResolvedMember<'a>> {
        let variant = (self.inspect)(value)
            .ok_or_else(|| Error::mismatch(self.rust_name, "value of another type"))?;

        let member = match self.member_of(variant.type_id()) {
            Some(member) => member,
            None => self.admit(resolver, &variant)?,
        };

        let descriptor = resolver.resolve(member.ty)?;
        if descriptor.tag() != DescriptorTag::Record {
            return Err(Error::binding(
                member.ty.rust_name(),
                "union members must bind as records",
            ));
        }

        Ok(ResolvedMember {
            typename: member.typename,
            ty: member.ty,
            descriptor,
            value: variant.value,
        })
    }

    /// Add the concrete type behind `variant`, if the union allows it.
    ///
    /// The candidate must bind as a record; a rejected candidate leaves the
    /// member table unchanged.
    fn admit(&self, resolver: &Resolver, variant: &VariantRef<'_>) -> Result<UnionMember> {
        let rejected = || Error::UnionMemberNotValid {
            union: self.typename.clone(),
            member: variant.rust_name.to_string(),
        };

        if self.sealed || self.discovery == DiscoveryPolicy::Disabled {
            log::warn!(
                "[union] {} rejected {}: not a declared member",
                self.typename,
                variant.rust_name
            );
            return Err(rejected());
        }
        let Some(ty) = variant.ty else {
            return Err(rejected());
        };
        let typename = ty.describe().typename.ok_or_else(rejected)?;
        if resolver.resolve(ty)?.tag() != DescriptorTag::Record {
            log::warn!(
                "[union] {} rejected {}: union members must bind as records",
                self.typename,
                ty.rust_name()
            );
            return Err(Error::binding(
                ty.rust_name(),
                "union members must bind as records",
            ));
        }

        let mut members = self.members.write();
        // Another thread may have discovered it since the read check.
        if let Some(existing) = members.iter().find(|m| m.ty == ty) {
            return Ok(existing.clone());
        }
        if members.iter().any(|m| m.typename == typename) {
            return Err(Error::TypeAlreadyRegistered(typename));
        }

        log::debug!(
            "[union] {} discovered member {} ({})",
            self.typename,
            typename,
            ty.rust_name()
        );
        let member = UnionMember { typename, ty };
        members.push(member.clone());
        Ok(member)
    }

    /// Construct the member named by a discriminator from its field values
    /// (ordinal order) and wrap it into the union's native type.
    pub fn construct_member(
        &self,
        resolver: &Resolver,
        member: &Typename,
        values: Vec<NativeValue>,
    ) -> Result<NativeValue> {
        let entry = self
            .member(member)
            .ok_or_else(|| Error::TypeNotDefined(member.clone()))?;
        let descriptor = resolver.resolve(entry.ty)?;
        let record = descriptor.as_record().ok_or_else(|| {
            Error::binding(entry.ty.rust_name(), "union members must bind as records")
        })?;
        let value = record.construct(values)?;
        (self.wrap)(value, entry.ty)
    }
}

impl fmt::Debug for UnionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionDescriptor")
            .field("typename", &self.typename)
            .field("sealed", &self.sealed)
            .field("members", &*self.members.read())
            .finish()
    }
}
