// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the binding layer and the type library.

use crate::model::Typename;
use std::fmt;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by typebind operations.
///
/// Every variant names the offending [`Typename`] or Rust type so a failure
/// deep inside a nested encode can be traced back to its source.
///
/// # Example
///
/// ```rust
/// use typebind::{builtin, Error, TypeLibrary, Typename};
///
/// let library = TypeLibrary::new();
/// let missing = Typename::new("geo", "Point");
///
/// match library.definition(&missing) {
///     Err(Error::TypeNotDefined(name)) => assert_eq!(name, missing),
///     other => panic!("unexpected: {:?}", other),
/// }
/// assert!(library.definition(&builtin::INT32).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Binding Errors
    // ========================================================================
    /// No unique, complete constructor/accessor contract for a native type.
    Binding {
        /// Rust type name of the offending type.
        type_name: String,
        /// Why the contract could not be selected.
        reason: String,
    },
    /// A referenced native type has neither a Bridge nor a Record form.
    UnsupportedType {
        /// Rust type name of the offending type.
        type_name: String,
    },
    /// A union value whose concrete type is outside the member set.
    UnionMemberNotValid {
        /// The union being resolved.
        union: Typename,
        /// Rust type name of the rejected value.
        member: String,
    },
    /// A generic value or native value did not have the expected shape.
    ValueMismatch {
        /// What the binding expected.
        expected: String,
        /// What it got instead.
        found: String,
    },
    /// A bridge was read past its size.
    OutOfBounds {
        /// Requested position.
        index: usize,
        /// Container length.
        length: usize,
    },

    // ========================================================================
    // Type Library Errors
    // ========================================================================
    /// Lookup of a typename that is absent or only reserved.
    TypeNotDefined(Typename),
    /// Re-registration of a typename with a different definition.
    TypeAlreadyRegistered(Typename),
    /// `reserve` called for a typename that already has an entry.
    TypeReserved(Typename),
    /// A hand-written definition violates the model invariants.
    InvalidDefinition(String),
    /// A typename string is not of the form `namespace:name`.
    InvalidTypename(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration could not be read or parsed.
    Config(String),
}

impl Error {
    pub(crate) fn binding(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Binding {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ValueMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Binding
            Error::Binding { type_name, reason } => {
                write!(f, "Cannot bind {}: {}", type_name, reason)
            }
            Error::UnsupportedType { type_name } => {
                write!(f, "Unsupported type {}: no bridge or record form", type_name)
            }
            Error::UnionMemberNotValid { union, member } => {
                write!(f, "{} is not a member of union {}", member, union)
            }
            Error::ValueMismatch { expected, found } => {
                write!(f, "Value mismatch: expected {}, found {}", expected, found)
            }
            Error::OutOfBounds { index, length } => {
                write!(f, "Bridge position out of bounds: {} >= {}", index, length)
            }
            // Library
            Error::TypeNotDefined(name) => write!(f, "Type not defined: {}", name),
            Error::TypeAlreadyRegistered(name) => {
                write!(f, "Type already registered with a different definition: {}", name)
            }
            Error::TypeReserved(name) => write!(f, "Type already reserved or registered: {}", name),
            Error::InvalidDefinition(msg) => write!(f, "Invalid definition: {}", msg),
            Error::InvalidTypename(raw) => {
                write!(f, "Invalid typename {:?} (expected namespace:name)", raw)
            }
            // Config
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_typename() {
        let err = Error::TypeNotDefined(Typename::new("geo", "Point"));
        assert_eq!(err.to_string(), "Type not defined: geo:Point");

        let err = Error::UnionMemberNotValid {
            union: Typename::new("geo", "Shape"),
            member: "Triangle".into(),
        };
        assert!(err.to_string().contains("geo:Shape"));
        assert!(err.to_string().contains("Triangle"));
    }

    #[test]
    fn test_binding_helper() {
        let err = Error::binding("app::Point", "no constructor declared");
        assert_eq!(
            err,
            Error::Binding {
                type_name: "app::Point".into(),
                reason: "no constructor declared".into()
            }
        );
    }
}
