// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type library: typename -> definition registry.
//!
//! Each typename moves through `Unregistered -> Reserved -> Registered`
//! (or straight to `Registered`) and never back. `reserve` and `register`
//! are check-then-act writes and run under one write lock; lookups share a
//! read lock and never observe a half-built entry.
//!
//! # Example
//!
//! ```rust
//! use typebind::{builtin, Definition, DefinitionState, Error, Record, TypeLibrary, Typename};
//!
//! let library = TypeLibrary::new();
//! let point = Typename::new("geo", "Point");
//! let definition = Definition::Record(
//!     Record::from_pairs([("x", builtin::INT32), ("y", builtin::INT32)]).unwrap(),
//! );
//!
//! library.reserve(&point).unwrap();
//! assert!(matches!(library.definition(&point), Err(Error::TypeNotDefined(_))));
//!
//! library.register(&point, definition.clone()).unwrap();
//! assert_eq!(*library.definition(&point).unwrap(), definition);
//! assert_eq!(library.definition_state(&point), DefinitionState::Registered);
//! ```

use crate::config::BindConfig;
use crate::error::{Error, Result};
use crate::model::{builtin, Definition, Typename};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lifecycle of a typename in a [`TypeLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionState {
    Unregistered,
    /// Placeholder for a forward reference; not yet resolvable.
    Reserved,
    Registered,
}

/// Snapshot of one typename's entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeLibraryEntry {
    pub state: DefinitionState,
    pub typename: Typename,
    /// Present only when `state` is `Registered`.
    pub definition: Option<Arc<Definition>>,
}

/// Registry of generic definitions keyed by typename.
///
/// Pass it by reference to whatever builds or reads schemas; there is no
/// global instance.
pub struct TypeLibrary {
    entries: RwLock<HashMap<Typename, TypeLibraryEntry>>,
}

impl TypeLibrary {
    /// Library pre-populated with the built-in atoms.
    pub fn new() -> Self {
        Self::with_config(&BindConfig::default())
    }

    pub fn with_config(config: &BindConfig) -> Self {
        let library = Self::empty();
        if config.bootstrap_builtins {
            let builtins = builtin::definitions();
            let count = builtins.len();
            let mut entries = library.entries.write();
            for (typename, definition) in builtins {
                entries.insert(
                    typename.clone(),
                    TypeLibraryEntry {
                        state: DefinitionState::Registered,
                        typename,
                        definition: Some(Arc::new(definition)),
                    },
                );
            }
            drop(entries);
            log::debug!("[library] bootstrapped {} built-in atoms", count);
        }
        library
    }

    /// Library with no entries, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a `Reserved` placeholder for `typename`.
    ///
    /// Fails with [`Error::TypeReserved`] if any entry already exists.
    pub fn reserve(&self, typename: &Typename) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(typename) {
            return Err(Error::TypeReserved(typename.clone()));
        }
        entries.insert(
            typename.clone(),
            TypeLibraryEntry {
                state: DefinitionState::Reserved,
                typename: typename.clone(),
                definition: None,
            },
        );
        log::debug!("[library] reserved {}", typename);
        Ok(())
    }

    /// Register `definition` under `typename`.
    ///
    /// Re-registering a structurally equal definition is a no-op; a
    /// different one fails with [`Error::TypeAlreadyRegistered`] and leaves
    /// the existing entry untouched. A `Reserved` entry is promoted.
    pub fn register(&self, typename: &Typename, definition: Definition) -> Result<()> {
        let mut entries = self.entries.write();
        match entries.get_mut(typename) {
            Some(entry) if entry.state == DefinitionState::Registered => {
                if entry.definition.as_deref() == Some(&definition) {
                    return Ok(());
                }
                log::warn!(
                    "[library] rejected re-registration of {} with a different {} definition",
                    typename,
                    definition.kind_name()
                );
                Err(Error::TypeAlreadyRegistered(typename.clone()))
            }
            Some(entry) => {
                entry.state = DefinitionState::Registered;
                entry.definition = Some(Arc::new(definition));
                log::debug!("[library] registered reserved {}", typename);
                Ok(())
            }
            None => {
                log::debug!("[library] registered {} ({})", typename, definition.kind_name());
                entries.insert(
                    typename.clone(),
                    TypeLibraryEntry {
                        state: DefinitionState::Registered,
                        typename: typename.clone(),
                        definition: Some(Arc::new(definition)),
                    },
                );
                Ok(())
            }
        }
    }

    /// Register several definitions in order, stopping at the first failure.
    ///
    /// Not transactional: earlier registrations stay in place.
    pub fn register_all<I>(&self, definitions: I) -> Result<usize>
    where
        I: IntoIterator<Item = (Typename, Definition)>,
    {
        let mut count = 0;
        for (typename, definition) in definitions {
            self.register(&typename, definition)?;
            count += 1;
        }
        Ok(count)
    }

    /// Definition of a `Registered` typename.
    pub fn definition(&self, typename: &Typename) -> Result<Arc<Definition>> {
        self.entries
            .read()
            .get(typename)
            .and_then(|entry| entry.definition.clone())
            .ok_or_else(|| Error::TypeNotDefined(typename.clone()))
    }

    pub fn is_registered(&self, typename: &Typename) -> bool {
        self.definition_state(typename) == DefinitionState::Registered
    }

    pub fn definition_state(&self, typename: &Typename) -> DefinitionState {
        self.entries
            .read()
            .get(typename)
            .map_or(DefinitionState::Unregistered, |entry| entry.state)
    }

    /// Snapshot of the entry, `Unregistered` if absent.
    pub fn entry(&self, typename: &Typename) -> TypeLibraryEntry {
        self.entries
            .read()
            .get(typename)
            .cloned()
            .unwrap_or_else(|| TypeLibraryEntry {
                state: DefinitionState::Unregistered,
                typename: typename.clone(),
                definition: None,
            })
    }

    /// Every typename with an entry, sorted.
    pub fn typenames(&self) -> Vec<Typename> {
        let mut names: Vec<_> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TypeLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeLibrary")
            .field("entries", &self.len())
            .finish()
    }
}
