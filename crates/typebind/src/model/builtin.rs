// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in atoms registered before any user definition.

use super::{Atom, AtomAttribute, Definition, Typename};
use crate::config::BUILTIN_NAMESPACE;
use crate::native::PrimitiveKind;

/// 64-bit IEEE 754 real.
pub const FLOAT: Typename = Typename::from_static(BUILTIN_NAMESPACE, "float");
pub const BOOLEAN: Typename = Typename::from_static(BUILTIN_NAMESPACE, "boolean");
/// UTF-8 text.
pub const STRING: Typename = Typename::from_static(BUILTIN_NAMESPACE, "string");
pub const INT32: Typename = Typename::from_static(BUILTIN_NAMESPACE, "int32");

pub const UINT8: Typename = Typename::from_static(BUILTIN_NAMESPACE, "uint8");
/// One Unicode scalar value.
pub const CHAR: Typename = Typename::from_static(BUILTIN_NAMESPACE, "char");
pub const INT16: Typename = Typename::from_static(BUILTIN_NAMESPACE, "int16");
pub const INT64: Typename = Typename::from_static(BUILTIN_NAMESPACE, "int64");
/// 32-bit IEEE 754 real.
pub const FLOAT32: Typename = Typename::from_static(BUILTIN_NAMESPACE, "float32");

/// Every primitive kind the binding layer understands, in bootstrap order.
const BOOTSTRAP_ORDER: [PrimitiveKind; 9] = [
    PrimitiveKind::F64,
    PrimitiveKind::Bool,
    PrimitiveKind::String,
    PrimitiveKind::I32,
    PrimitiveKind::U8,
    PrimitiveKind::Char,
    PrimitiveKind::I16,
    PrimitiveKind::I64,
    PrimitiveKind::F32,
];

/// Typename of the atom a primitive binds to.
pub fn typename_of(kind: PrimitiveKind) -> Typename {
    match kind {
        PrimitiveKind::Bool => BOOLEAN,
        PrimitiveKind::U8 => UINT8,
        PrimitiveKind::Char => CHAR,
        PrimitiveKind::I16 => INT16,
        PrimitiveKind::I32 => INT32,
        PrimitiveKind::I64 => INT64,
        PrimitiveKind::F32 => FLOAT32,
        PrimitiveKind::F64 => FLOAT,
        PrimitiveKind::String => STRING,
    }
}

/// Atom describing a primitive's encoding intent.
pub fn atom_of(kind: PrimitiveKind) -> Atom {
    use AtomAttribute::*;

    match kind {
        PrimitiveKind::Bool => Atom::new([Boolean, FixedLength { bytes: 1 }]),
        PrimitiveKind::U8 => Atom::new([Integer, Unsigned, FixedLength { bytes: 1 }]),
        PrimitiveKind::Char => Atom::new([
            AtomAttribute::encoding("UTF-32"),
            FixedLength { bytes: 4 },
            BigEndian,
        ]),
        PrimitiveKind::I16 => Atom::new([Integer, Signed, FixedLength { bytes: 2 }, BigEndian]),
        PrimitiveKind::I32 => Atom::new([Integer, Signed, FixedLength { bytes: 4 }, BigEndian]),
        PrimitiveKind::I64 => Atom::new([Integer, Signed, FixedLength { bytes: 8 }, BigEndian]),
        PrimitiveKind::F32 => Atom::new([Real, Ieee754, FixedLength { bytes: 4 }, BigEndian]),
        PrimitiveKind::F64 => Atom::new([Real, Ieee754, FixedLength { bytes: 8 }, BigEndian]),
        PrimitiveKind::String => Atom::new([AtomAttribute::encoding("UTF-8")]),
    }
}

/// `(typename, definition)` pairs for the bootstrap, FLOAT/BOOLEAN/STRING/INT32 first.
pub fn definitions() -> Vec<(Typename, Definition)> {
    BOOTSTRAP_ORDER
        .iter()
        .map(|kind| (typename_of(*kind), Definition::Atom(atom_of(*kind))))
        .collect()
}
