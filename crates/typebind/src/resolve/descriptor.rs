// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved binding artifacts.

use crate::bridge::Bridge;
use crate::error::{Error, Result};
use crate::model::Typename;
use crate::native::{AccessFn, ConstructFn, ContainerFamily, NativeValue, PrimitiveKind, TypeRef};
use crate::union::UnionDescriptor;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Discriminant of a [`TypeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorTag {
    Atom,
    Record,
    Container,
    Union,
}

/// Binding artifact for one native type, produced once by the
/// [`Resolver`](crate::Resolver) and shared through its cache.
#[derive(Debug)]
pub enum TypeDescriptor {
    Atom(AtomDescriptor),
    Record(RecordDescriptor),
    Container(ContainerDescriptor),
    Union(UnionDescriptor),
}

impl TypeDescriptor {
    #[must_use]
    pub fn tag(&self) -> DescriptorTag {
        match self {
            Self::Atom(_) => DescriptorTag::Atom,
            Self::Record(_) => DescriptorTag::Record,
            Self::Container(_) => DescriptorTag::Container,
            Self::Union(_) => DescriptorTag::Union,
        }
    }

    /// Schema identity; `None` for containers.
    #[must_use]
    pub fn typename(&self) -> Option<&Typename> {
        match self {
            Self::Atom(d) => Some(&d.typename),
            Self::Record(d) => Some(&d.typename),
            Self::Container(_) => None,
            Self::Union(d) => Some(d.typename()),
        }
    }

    #[must_use]
    pub fn rust_name(&self) -> &'static str {
        match self {
            Self::Atom(d) => d.rust_name,
            Self::Record(d) => d.rust_name,
            Self::Container(d) => d.rust_name,
            Self::Union(d) => d.rust_name(),
        }
    }

    pub fn as_atom(&self) -> Option<&AtomDescriptor> {
        match self {
            Self::Atom(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match self {
            Self::Record(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerDescriptor> {
        match self {
            Self::Container(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionDescriptor> {
        match self {
            Self::Union(d) => Some(d),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Atom
// ---------------------------------------------------------------------------

/// Primitive leaf.
#[derive(Debug, Clone)]
pub struct AtomDescriptor {
    pub kind: PrimitiveKind,
    pub typename: Typename,
    pub rust_name: &'static str,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One field of a bound record, in construction order.
#[derive(Clone, Copy)]
pub struct FieldBinding {
    pub name: &'static str,
    pub ordinal: u32,
    pub ty: TypeRef,
    pub(crate) get: AccessFn,
}

impl FieldBinding {
    /// Borrow this field out of an instance of the record type.
    pub fn get<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(instance)
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .field("ty", &self.ty)
            .finish()
    }
}

/// The selected constructor plus its matching accessors.
pub struct RecordDescriptor {
    pub typename: Typename,
    pub rust_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) fields: Vec<FieldBinding>,
    pub(crate) construct: ConstructFn,
}

impl RecordDescriptor {
    /// Fields sorted by ordinal.
    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Borrow every field value, in ordinal order.
    pub fn decompose<'a>(&self, instance: &'a dyn Any) -> Result<Vec<(&'static str, &'a dyn Any)>> {
        if instance.type_id() != self.type_id {
            return Err(Error::mismatch(self.rust_name, "value of another type"));
        }
        self.fields
            .iter()
            .map(|field| {
                field.get(instance).map(|v| (field.name, v)).ok_or_else(|| {
                    Error::binding(self.rust_name, format!("accessor `{}` failed", field.name))
                })
            })
            .collect()
    }

    /// Build an instance from field values given in ordinal order.
    pub fn construct(&self, values: Vec<NativeValue>) -> Result<NativeValue> {
        if values.len() != self.fields.len() {
            return Err(Error::mismatch(
                format!("{} fields for {}", self.fields.len(), self.rust_name),
                format!("{} values", values.len()),
            ));
        }
        let instance = (self.construct)(values)?;
        if (*instance).type_id() != self.type_id {
            return Err(Error::binding(
                self.rust_name,
                "constructor produced a value of another type",
            ));
        }
        Ok(instance)
    }
}

impl fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("typename", &self.typename)
            .field("rust_name", &self.rust_name)
            .field("fields", &self.fields)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Bridge-backed array or collection.
#[derive(Debug, Clone)]
pub struct ContainerDescriptor {
    pub rust_name: &'static str,
    pub element: TypeRef,
    pub family: ContainerFamily,
    pub bridge: Arc<dyn Bridge>,
}
