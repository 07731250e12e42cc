// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf type descriptions.
//!
//! An [`Atom`] does not describe a byte layout. Its attributes state the
//! encoding *intent* (integer, signed, 4 bytes, big endian, ...) that a
//! concrete codec may honor.

use serde::{Deserialize, Serialize};

/// Key under which an attribute's tag is stored in exchanged schemas.
pub const ATTRIBUTE_TAG_KEY: &str = "atom_attribute";

/// Payload field name of the string encoding attribute.
pub const ENCODING_FIELD: &str = "encoding";

/// Encoding intent attached to an [`Atom`].
///
/// Payload-free variants are singleton-equal; payload variants compare by
/// field. The serde form uses the stable `atom_*` tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "atom_attribute")]
pub enum AtomAttribute {
    #[serde(rename = "atom_fixed_length")]
    FixedLength { bytes: u8 },
    #[serde(rename = "atom_variable_length")]
    VariableLength { min_bytes: u8, max_bytes: u8 },
    #[serde(rename = "atom_big_endian")]
    BigEndian,
    #[serde(rename = "atom_little_endian")]
    LittleEndian,
    #[serde(rename = "atom_integer")]
    Integer,
    #[serde(rename = "atom_signed")]
    Signed,
    #[serde(rename = "atom_unsigned")]
    Unsigned,
    /// IEEE 754 floating point (tag spelling kept for wire compatibility).
    #[serde(rename = "atom_ieee756")]
    Ieee754,
    #[serde(rename = "atom_real")]
    Real,
    #[serde(rename = "atom_boolean")]
    Boolean,
    #[serde(rename = "atom_string")]
    StringEncoding { encoding: String },
}

impl AtomAttribute {
    /// Stable tag used in exchanged schemas.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::FixedLength { .. } => "atom_fixed_length",
            Self::VariableLength { .. } => "atom_variable_length",
            Self::BigEndian => "atom_big_endian",
            Self::LittleEndian => "atom_little_endian",
            Self::Integer => "atom_integer",
            Self::Signed => "atom_signed",
            Self::Unsigned => "atom_unsigned",
            Self::Ieee754 => "atom_ieee756",
            Self::Real => "atom_real",
            Self::Boolean => "atom_boolean",
            Self::StringEncoding { .. } => "atom_string",
        }
    }

    /// Shorthand for [`AtomAttribute::StringEncoding`].
    pub fn encoding(encoding: impl Into<String>) -> Self {
        Self::StringEncoding {
            encoding: encoding.into(),
        }
    }
}

/// Leaf type: an ordered attribute list (insertion order, duplicates kept).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Atom {
    attributes: Vec<AtomAttribute>,
}

impl Atom {
    pub fn new(attributes: impl IntoIterator<Item = AtomAttribute>) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Append an attribute.
    #[must_use]
    pub fn with(mut self, attribute: AtomAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(&self) -> &[AtomAttribute] {
        &self.attributes
    }

    pub fn contains(&self, attribute: &AtomAttribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// First fixed length declared, if any.
    pub fn fixed_length(&self) -> Option<u8> {
        self.attributes.iter().find_map(|a| match a {
            AtomAttribute::FixedLength { bytes } => Some(*bytes),
            _ => None,
        })
    }

    /// First string encoding declared, if any.
    pub fn string_encoding(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            AtomAttribute::StringEncoding { encoding } => Some(encoding.as_str()),
            _ => None,
        })
    }
}

impl FromIterator<AtomAttribute> for Atom {
    fn from_iter<I: IntoIterator<Item = AtomAttribute>>(iter: I) -> Self {
        Self::new(iter)
    }
}
