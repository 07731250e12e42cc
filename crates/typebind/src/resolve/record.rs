// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record binding: select the one canonical constructor/accessor pairing.
//!
//! A constructor is viable when it takes exactly one parameter per accessor
//! and every parameter pairs with an accessor of the same type, by name when
//! all parameters are named and by position when none are. Exactly one
//! viable constructor must remain; its parameter order defines the field
//! ordinals.

use super::descriptor::{FieldBinding, RecordDescriptor};
use crate::error::{Error, Result};
use crate::model::Typename;
use crate::native::{Accessor, Constructor, RecordShape};
use std::any::TypeId;
use std::collections::HashSet;

pub(crate) fn bind_record(
    type_id: TypeId,
    rust_name: &'static str,
    typename: Typename,
    shape: RecordShape,
) -> Result<RecordDescriptor> {
    let RecordShape {
        constructors,
        accessors,
    } = shape;

    let mut names = HashSet::with_capacity(accessors.len());
    for accessor in &accessors {
        if !names.insert(accessor.name) {
            return Err(Error::binding(
                rust_name,
                format!("duplicate accessor `{}`", accessor.name),
            ));
        }
        if accessor.ty.describe().is_opaque() {
            return Err(Error::unsupported(accessor.ty.rust_name()));
        }
    }

    if constructors.is_empty() {
        return Err(Error::binding(rust_name, "no constructor declared"));
    }

    let mut viable = Vec::new();
    let mut rejected = Vec::new();
    for (index, constructor) in constructors.iter().enumerate() {
        match pair(constructor, &accessors) {
            Ok(order) => viable.push((constructor, order)),
            Err(reason) => rejected.push(format!("constructor #{}: {}", index, reason)),
        }
    }

    let (constructor, order) = match viable.len() {
        0 => return Err(Error::binding(rust_name, rejected.join("; "))),
        1 => viable.swap_remove(0),
        n => {
            return Err(Error::binding(
                rust_name,
                format!("ambiguous: {} constructors match the accessors", n),
            ));
        }
    };

    let fields = order
        .into_iter()
        .enumerate()
        .map(|(ordinal, accessor)| {
            let accessor = &accessors[accessor];
            FieldBinding {
                name: accessor.name,
                ordinal: ordinal as u32,
                ty: accessor.ty,
                get: accessor.get,
            }
        })
        .collect();

    log::debug!("[resolver] bound record {} as {}", rust_name, typename);
    Ok(RecordDescriptor {
        typename,
        rust_name,
        type_id,
        fields,
        construct: constructor.build,
    })
}

/// Accessor index for each constructor parameter, or why there is none.
fn pair(constructor: &Constructor, accessors: &[Accessor]) -> std::result::Result<Vec<usize>, String> {
    let params = &constructor.params;
    if params.len() != accessors.len() {
        return Err(format!(
            "takes {} parameters but {} accessors are declared",
            params.len(),
            accessors.len()
        ));
    }

    let named = params.iter().filter(|p| p.name.is_some()).count();
    if named != 0 && named != params.len() {
        return Err("mixes named and positional parameters".to_string());
    }

    let mut order = Vec::with_capacity(params.len());
    let mut used = HashSet::with_capacity(params.len());
    for (position, param) in params.iter().enumerate() {
        let index = match param.name {
            Some(name) => accessors
                .iter()
                .position(|a| a.name == name)
                .ok_or_else(|| format!("no accessor for parameter `{}`", name))?,
            None => position,
        };
        if !used.insert(index) {
            return Err(format!("parameter #{} repeats accessor `{}`", position, accessors[index].name));
        }

        let accessor = &accessors[index];
        if accessor.ty != param.ty {
            return Err(format!(
                "parameter #{} is {} but accessor `{}` returns {}",
                position,
                param.ty.rust_name(),
                accessor.name,
                accessor.ty.rust_name()
            ));
        }
        order.push(index);
    }
    Ok(order)
}
