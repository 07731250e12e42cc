// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding configuration, loadable from YAML.
//!
//! ```yaml
//! bootstrap_builtins: true
//! max_preallocation: 4096
//! union_discovery: serialized   # or: disabled
//! ```
//!
//! Every key is optional; missing keys take their default.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Namespace of the built-in atom typenames.
pub const BUILTIN_NAMESPACE: &str = "schema";

/// Default cap on the capacity hint passed to `Bridge::construct`.
pub const DEFAULT_MAX_PREALLOCATION: usize = 4096;

/// How unsealed unions treat a value of an undiscovered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryPolicy {
    /// Append the new member under the union's write lock.
    #[default]
    Serialized,
    /// Reject it with `UnionMemberNotValid` (frozen schemas).
    Disabled,
}

/// Knobs shared by the resolver, bridges and type library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Pre-register the built-in atoms in `TypeLibrary::with_config`.
    pub bootstrap_builtins: bool,
    /// Upper bound on container preallocation during decode.
    pub max_preallocation: usize,
    pub union_discovery: DiscoveryPolicy,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            bootstrap_builtins: true,
            max_preallocation: DEFAULT_MAX_PREALLOCATION,
            union_discovery: DiscoveryPolicy::Serialized,
        }
    }
}

impl BindConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Parse configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!("[config] loaded {} ({:?})", path.display(), config);
        Ok(config)
    }
}
