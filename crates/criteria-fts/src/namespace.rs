//! Field name resolution.
//!
//! Clients address fields by short names (`status`), while the backend
//! expects qualified identifiers (`cm:status`). A [`NamespaceResolver`] does
//! the translation and is injected into every operation that writes a field.
//!
//! [`PrefixResolver`] is the stock implementation. It resolves, in order:
//!
//! 1. An explicit entry in `fields`
//! 2. An already prefixed name (`sys:node`), if the prefix is known
//! 3. A bare name, qualified with `default_prefix` when one is set
//!
//! It can be loaded from YAML:
//!
//! ```yaml
//! default_prefix: cm
//! prefixes: [cm, sys, app]
//! fields:
//!   assignee: app:assignee
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use criteria::ConfigError;
use serde::{Deserialize, Serialize};

/// Translates short field names into backend identifiers.
pub trait NamespaceResolver: Send + Sync {
    /// Returns the qualified identifier for `field`, or `None` if it cannot
    /// be resolved.
    fn qualify(&self, field: &str) -> Option<String>;
}

/// Prefix-based resolver with optional per-field overrides.
///
/// The default value passes bare names through unchanged and accepts any
/// prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrefixResolver {
    /// Prefix applied to bare field names.
    pub default_prefix: Option<String>,
    /// Known prefixes. Empty means any prefix is accepted.
    pub prefixes: BTreeSet<String>,
    /// Explicit short name to qualified name mappings.
    pub fields: BTreeMap<String, String>,
}

impl PrefixResolver {
    pub fn new() -> Self {
        PrefixResolver::default()
    }

    /// Sets the prefix for bare names and marks it as known.
    pub fn with_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefixes.insert(prefix.clone());
        self.default_prefix = Some(prefix);
        self
    }

    /// Adds a known prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into());
        self
    }

    /// Maps a short name to a fixed qualified identifier.
    pub fn with_field(mut self, field: impl Into<String>, qualified: impl Into<String>) -> Self {
        self.fields.insert(field.into(), qualified.into());
        self
    }

    /// Parses and validates a resolver from a YAML document.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let resolver: PrefixResolver = serde_yaml::from_str(input)?;
        resolver.validate()?;
        Ok(resolver)
    }

    /// Reads, parses and validates a resolver from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.default_prefix {
            if !self.prefixes.is_empty() && !self.prefixes.contains(prefix) {
                return Err(ConfigError::Invalid(format!(
                    "default_prefix '{prefix}' is not listed in prefixes"
                )));
            }
        }
        if let Some((field, _)) = self.fields.iter().find(|(_, q)| q.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "field '{field}' maps to an empty identifier"
            )));
        }
        Ok(())
    }

    fn is_known(&self, prefix: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.contains(prefix)
    }
}

impl NamespaceResolver for PrefixResolver {
    fn qualify(&self, field: &str) -> Option<String> {
        if field.is_empty() {
            return None;
        }
        if let Some(qualified) = self.fields.get(field) {
            return Some(qualified.clone());
        }
        match field.split_once(':') {
            Some((prefix, local)) => {
                (!local.is_empty() && self.is_known(prefix)).then(|| field.to_string())
            }
            None => Some(match &self.default_prefix {
                Some(prefix) => format!("{prefix}:{field}"),
                None => field.to_string(),
            }),
        }
    }
}
