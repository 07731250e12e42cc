// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Namespaced type identity.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Immutable `(namespace, name)` identity; the sole type library key.
///
/// Rendered and parsed as `namespace:name`. The name part never contains a
/// colon, so namespaces such as `sensor_msgs::msg` survive a round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Typename {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl Typename {
    /// Create a typename from owned parts.
    ///
    /// Both parts must be non-empty and `name` must not contain `:`,
    /// otherwise the `namespace:name` form does not parse back to the same
    /// typename. Checked in debug builds only; use [`Typename::try_new`] for
    /// untrusted input.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let (namespace, name) = (namespace.into(), name.into());
        debug_assert!(
            valid_parts(&namespace, &name),
            "invalid typename parts {:?}, {:?}",
            namespace,
            name
        );
        Self {
            namespace: Cow::Owned(namespace),
            name: Cow::Owned(name),
        }
    }

    /// Create a typename, rejecting parts that do not round-trip.
    pub fn try_new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, Error> {
        let (namespace, name) = (namespace.into(), name.into());
        if !valid_parts(&namespace, &name) {
            return Err(Error::InvalidTypename(format!("{}:{}", namespace, name)));
        }
        Ok(Self {
            namespace: Cow::Owned(namespace),
            name: Cow::Owned(name),
        })
    }

    /// Create a typename from static parts (usable in `const` items).
    pub const fn from_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        }
    }

    /// Parse `namespace:name`.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw.rsplit_once(':') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Ok(Self::new(namespace, name))
            }
            _ => Err(Error::InvalidTypename(raw.to_string())),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn valid_parts(namespace: &str, name: &str) -> bool {
    !namespace.is_empty() && !name.is_empty() && !name.contains(':')
}

impl fmt::Display for Typename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for Typename {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Typename {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Typename> for String {
    fn from(value: Typename) -> Self {
        value.to_string()
    }
}
