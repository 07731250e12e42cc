// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic schema definitions: atoms, records, unions, references.

use super::{Atom, Typename};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Generic schema shape of a type.
///
/// Equality is structural; the type library relies on it to tell an
/// idempotent re-registration from a conflicting one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    Atom(Atom),
    Record(Record),
    Union(Union),
    /// Alias for another registered typename.
    Reference(Typename),
    /// Homogeneous sequence (arrays and collections).
    Sequence(Sequence),
}

impl Definition {
    /// Short kind label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Atom(_) => "atom",
            Self::Record(_) => "record",
            Self::Union(_) => "union",
            Self::Reference(_) => "reference",
            Self::Sequence(_) => "sequence",
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&Union> {
        match self {
            Self::Union(union) => Some(union),
            _ => None,
        }
    }
}

impl From<Atom> for Definition {
    fn from(value: Atom) -> Self {
        Self::Atom(value)
    }
}

impl From<Record> for Definition {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Union> for Definition {
    fn from(value: Union) -> Self {
        Self::Union(value)
    }
}

/// Type of a record field or sequence element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Refers to a definition registered under this typename.
    Named(Typename),
    /// Anonymous definition carried in place.
    Inline(Box<Definition>),
}

impl From<Typename> for FieldType {
    fn from(value: Typename) -> Self {
        Self::Named(value)
    }
}

impl From<Definition> for FieldType {
    fn from(value: Definition) -> Self {
        Self::Inline(Box::new(value))
    }
}

/// One named, ordered record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Position in native construction order.
    pub ordinal: u32,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldType>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ordinal,
        }
    }
}

/// Ordered field list.
///
/// Invariants (checked by [`Record::new`]): field names are unique and the
/// ordinals are exactly `0..N`. Fields are kept sorted by ordinal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut fields = fields;
        fields.sort_by_key(|f| f.ordinal);

        let mut names = HashSet::with_capacity(fields.len());
        for (expected, field) in fields.iter().enumerate() {
            if field.ordinal as usize != expected {
                return Err(Error::InvalidDefinition(format!(
                    "record ordinals must be 0..{} without gaps, found {} for field `{}`",
                    fields.len(),
                    field.ordinal,
                    field.name
                )));
            }
            if !names.insert(field.name.as_str()) {
                return Err(Error::InvalidDefinition(format!(
                    "duplicate record field `{}`",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Build from `(name, type)` pairs, numbering ordinals in order.
    pub fn from_pairs<N, T>(pairs: impl IntoIterator<Item = (N, T)>) -> Result<Self>
    where
        N: Into<String>,
        T: Into<FieldType>,
    {
        let fields = pairs
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, ty))| Field::new(name, ty, ordinal as u32))
            .collect();
        Self::new(fields)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<Field>> for Record {
    type Error = Error;

    fn try_from(value: Vec<Field>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Record> for Vec<Field> {
    fn from(value: Record) -> Self {
        value.fields
    }
}

/// Polymorphic type with a closed (sealed) or open member set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnionRepr", into = "UnionRepr")]
pub struct Union {
    sealed: bool,
    members: Vec<Typename>,
}

#[derive(Serialize, Deserialize)]
struct UnionRepr {
    sealed: bool,
    members: Vec<Typename>,
}

impl Union {
    /// Closed union: `members` is fixed for the life of the definition.
    pub fn sealed(members: impl IntoIterator<Item = Typename>) -> Result<Self> {
        Self::with_members(true, members.into_iter().collect())
    }

    /// Open union: the listed members are the ones known so far.
    pub fn open(members: impl IntoIterator<Item = Typename>) -> Result<Self> {
        Self::with_members(false, members.into_iter().collect())
    }

    fn with_members(sealed: bool, members: Vec<Typename>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member) {
                return Err(Error::InvalidDefinition(format!(
                    "duplicate union member `{}`",
                    member
                )));
            }
        }
        Ok(Self { sealed, members })
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn members(&self) -> &[Typename] {
        &self.members
    }

    pub fn contains(&self, member: &Typename) -> bool {
        self.members.contains(member)
    }
}

impl TryFrom<UnionRepr> for Union {
    type Error = Error;

    fn try_from(value: UnionRepr) -> Result<Self> {
        Self::with_members(value.sealed, value.members)
    }
}

impl From<Union> for UnionRepr {
    fn from(value: Union) -> Self {
        Self {
            sealed: value.sealed,
            members: value.members,
        }
    }
}

/// Element type of a homogeneous sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub element: FieldType,
}

impl Sequence {
    pub fn new(element: impl Into<FieldType>) -> Self {
        Self {
            element: element.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    #[test]
    fn test_record_sorted_by_ordinal() {
        let record = Record::new(vec![
            Field::new("y", builtin::INT32, 1),
            Field::new("x", builtin::INT32, 0),
        ])
        .expect("valid record");
        let names: Vec<_> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(record.field("y").map(|f| f.ordinal), Some(1));
    }

    #[test]
    fn test_record_rejects_gaps_and_duplicates() {
        let gap = Record::new(vec![
            Field::new("x", builtin::INT32, 0),
            Field::new("y", builtin::INT32, 2),
        ]);
        assert!(matches!(gap, Err(Error::InvalidDefinition(_))));

        let repeated_ordinal = Record::new(vec![
            Field::new("x", builtin::INT32, 0),
            Field::new("y", builtin::INT32, 0),
        ]);
        assert!(matches!(repeated_ordinal, Err(Error::InvalidDefinition(_))));

        let dup = Record::new(vec![
            Field::new("x", builtin::INT32, 0),
            Field::new("x", builtin::FLOAT, 1),
        ]);
        assert!(matches!(dup, Err(Error::InvalidDefinition(_))));
    }

    #[test]
    fn test_union_rejects_duplicates() {
        let circle = Typename::new("geo", "Circle");
        assert!(Union::sealed([circle.clone(), circle.clone()]).is_err());

        let union = Union::open([circle.clone()]).expect("valid union");
        assert!(!union.is_sealed());
        assert!(union.contains(&circle));
    }

    #[test]
    fn test_structural_equality() {
        let a = Record::from_pairs([("x", builtin::INT32), ("y", builtin::INT32)]).expect("a");
        let b = Record::from_pairs([("x", builtin::INT32), ("y", builtin::INT32)]).expect("b");
        let c = Record::from_pairs([("x", builtin::INT32), ("y", builtin::FLOAT)]).expect("c");
        assert_eq!(Definition::from(a.clone()), Definition::from(b));
        assert_ne!(Definition::from(a), Definition::from(c));
    }
}
