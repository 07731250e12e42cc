// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic codec: native values to and from [`Value`].
//!
//! A thin walker over the resolver's descriptors. Records become ordered
//! `(name, value)` pairs, containers go through their bridge, unions carry
//! their member typename as discriminator.

use crate::bridge::{Element, ElementForm, OwnedElement};
use crate::error::{Error, Result};
use crate::native::{Bind, NativeValue, TypeRef};
use crate::resolve::{ContainerDescriptor, RecordDescriptor, Resolver, TypeDescriptor};
use crate::union::UnionDescriptor;
use crate::value::Value;
use std::any::{type_name, Any};

/// Encoder/decoder bound to one [`Resolver`].
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    resolver: &'r Resolver,
}

impl<'r> Codec<'r> {
    pub fn new(resolver: &'r Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &'r Resolver {
        self.resolver
    }

    pub fn encode<T: Bind>(&self, value: &T) -> Result<Value> {
        self.encode_any(value, TypeRef::of::<T>())
    }

    pub fn decode<T: Bind>(&self, value: Value) -> Result<T> {
        self.decode_any(value, TypeRef::of::<T>())?
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::mismatch(type_name::<T>(), "decoded value of another type"))
    }

    // ------------------------------------------------------------------------
    // Encode
    // ------------------------------------------------------------------------

    /// Encode a borrowed native value of type `ty`.
    pub fn encode_any(&self, value: &dyn Any, ty: TypeRef) -> Result<Value> {
        match &*self.resolver.resolve(ty)? {
            TypeDescriptor::Atom(atom) => atom
                .kind
                .to_value(value)
                .ok_or_else(|| Error::mismatch(atom.rust_name, "value of another type")),
            TypeDescriptor::Record(record) => self.encode_record(record, value),
            TypeDescriptor::Container(container) => self.encode_container(container, value),
            TypeDescriptor::Union(union) => self.encode_union(union, value),
        }
    }

    fn encode_record(&self, record: &RecordDescriptor, value: &dyn Any) -> Result<Value> {
        let fields = record
            .decompose(value)?
            .into_iter()
            .zip(record.fields())
            .map(|((name, field), binding)| Ok((name.to_string(), self.encode_any(field, binding.ty)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Record(fields))
    }

    fn encode_container(&self, container: &ContainerDescriptor, value: &dyn Any) -> Result<Value> {
        let bridge = &container.bridge;
        let size = bridge.size(value)?;
        let mut state = bridge.new_iteration_state(value);
        let mut items = Vec::with_capacity(size);
        for _ in 0..size {
            let item = match bridge.get(&mut state, value)? {
                Element::Atom(atom) => atom,
                Element::Native(element) => self.encode_any(element, container.element)?,
            };
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn encode_union(&self, union: &UnionDescriptor, value: &dyn Any) -> Result<Value> {
        let member = self.resolver.resolve_union_member(union, value)?;
        let record = member.descriptor.as_record().ok_or_else(|| {
            Error::binding(member.ty.rust_name(), "union members must bind as records")
        })?;
        let payload = self.encode_record(record, member.value)?;
        Ok(Value::Union {
            member: member.typename,
            value: Box::new(payload),
        })
    }

    // ------------------------------------------------------------------------
    // Decode
    // ------------------------------------------------------------------------

    /// Decode `value` into an owned native value of type `ty`.
    pub fn decode_any(&self, value: Value, ty: TypeRef) -> Result<NativeValue> {
        match &*self.resolver.resolve(ty)? {
            TypeDescriptor::Atom(atom) => atom
                .kind
                .from_value(value)
                .map_err(|other| Error::mismatch(atom.typename.to_string(), other.kind_name())),
            TypeDescriptor::Record(record) => self.decode_record(record, value),
            TypeDescriptor::Container(container) => self.decode_container(container, value),
            TypeDescriptor::Union(union) => self.decode_union(union, value),
        }
    }

    fn decode_record(&self, record: &RecordDescriptor, value: Value) -> Result<NativeValue> {
        let fields = match value {
            Value::Record(fields) => fields,
            other => {
                return Err(Error::mismatch(
                    format!("record {}", record.typename),
                    other.kind_name(),
                ));
            }
        };
        let values = self.decode_fields(record, fields)?;
        record.construct(values)
    }

    /// Field values in ordinal order, looked up by name.
    fn decode_fields(
        &self,
        record: &RecordDescriptor,
        fields: Vec<(String, Value)>,
    ) -> Result<Vec<NativeValue>> {
        let mut slots: Vec<Option<Value>> = record.fields().iter().map(|_| None).collect();
        for (name, value) in fields {
            let index = record
                .fields()
                .iter()
                .position(|f| f.name == name)
                .ok_or_else(|| {
                    Error::mismatch(
                        format!("a field of {}", record.typename),
                        format!("unknown field `{}`", name),
                    )
                })?;
            if slots[index].replace(value).is_some() {
                return Err(Error::mismatch(
                    format!("one `{}` field in {}", name, record.typename),
                    "duplicate field",
                ));
            }
        }

        record
            .fields()
            .iter()
            .zip(slots)
            .map(|(binding, slot)| {
                let value = slot.ok_or_else(|| {
                    Error::mismatch(
                        format!("field `{}` of {}", binding.name, record.typename),
                        "missing field",
                    )
                })?;
                self.decode_any(value, binding.ty)
            })
            .collect()
    }

    fn decode_container(&self, container: &ContainerDescriptor, value: Value) -> Result<NativeValue> {
        let items = match value {
            Value::Sequence(items) => items,
            other => {
                return Err(Error::mismatch(
                    format!("sequence for {}", container.rust_name),
                    other.kind_name(),
                ));
            }
        };

        let bridge = &container.bridge;
        let mut native = bridge.construct(items.len());
        let mut state = bridge.new_iteration_state(&*native);
        for item in items {
            let element = match bridge.element_form() {
                ElementForm::Atom(_) => OwnedElement::Atom(item),
                ElementForm::Native => OwnedElement::Native(self.decode_any(item, container.element)?),
            };
            bridge.put(&mut state, &mut *native, element)?;
        }
        Ok(native)
    }

    fn decode_union(&self, union: &UnionDescriptor, value: Value) -> Result<NativeValue> {
        let (member, payload) = match value {
            Value::Union { member, value } => (member, *value),
            other => {
                return Err(Error::mismatch(
                    format!("union {}", union.typename()),
                    other.kind_name(),
                ));
            }
        };
        let entry = union
            .member(&member)
            .ok_or_else(|| Error::TypeNotDefined(member.clone()))?;
        let descriptor = self.resolver.resolve(entry.ty)?;
        let record = descriptor.as_record().ok_or_else(|| {
            Error::binding(entry.ty.rust_name(), "union members must bind as records")
        })?;

        let fields = match payload {
            Value::Record(fields) => fields,
            other => {
                return Err(Error::mismatch(format!("record {}", member), other.kind_name()));
            }
        };
        let values = self.decode_fields(record, fields)?;
        self.resolver.construct_union_member(union, &member, values)
    }
}
