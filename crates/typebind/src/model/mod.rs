// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Language-neutral schema model.
//!
//! [`Typename`] keys, [`Definition`] shapes ([`Atom`], [`Record`],
//! [`Union`], references and sequences) and the built-in atoms every
//! [`TypeLibrary`](crate::TypeLibrary) starts with. All values are immutable
//! once constructed.

mod atom;
pub mod builtin;
mod definition;
mod typename;

pub use atom::{Atom, AtomAttribute, ATTRIBUTE_TAG_KEY, ENCODING_FIELD};
pub use definition::{Definition, Field, FieldType, Record, Sequence, Union};
pub use typename::Typename;
