//! Target language syntax constants.
//!
//! [`QuerySyntax`] holds the tokens the compiler writes around rendered
//! clauses: group delimiters, junction keywords and boost markers, plus the
//! boost the target backend applies when a clause carries no marker.
//!
//! The defaults describe a Lucene/FTS-style language:
//!
//! | Setting | Default |
//! |---------|---------|
//! | `group_open` / `group_close` | `(` / `)` |
//! | `and_token` / `or_token` | `AND` / `OR` |
//! | `must_marker` | `+` |
//! | `should_marker` | empty (Lucene has no SHOULD token) |
//! | `exclude_marker` | `-` |
//! | `implicit_boost` | `SHOULD` |
//!
//! A syntax can be loaded from YAML; missing keys keep their default:
//!
//! ```yaml
//! and_token: "&&"
//! or_token: "||"
//! exclude_marker: "!"
//! implicit_boost: MUST
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::boost::QueryBoost;
use crate::error::ConfigError;
use crate::tree::Junction;

/// Tokens of a target query language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySyntax {
    pub group_open: String,
    pub group_close: String,
    pub and_token: String,
    pub or_token: String,
    pub must_marker: String,
    pub should_marker: String,
    pub exclude_marker: String,
    /// Boost the backend assumes for an unmarked clause.
    pub implicit_boost: QueryBoost,
}

impl Default for QuerySyntax {
    fn default() -> Self {
        QuerySyntax {
            group_open: "(".to_string(),
            group_close: ")".to_string(),
            and_token: "AND".to_string(),
            or_token: "OR".to_string(),
            must_marker: "+".to_string(),
            should_marker: String::new(),
            exclude_marker: "-".to_string(),
            implicit_boost: QueryBoost::Should,
        }
    }
}

impl QuerySyntax {
    /// Returns the keyword placed between children joined by `junction`.
    pub fn junction_token(&self, junction: Junction) -> &str {
        match junction {
            Junction::And => &self.and_token,
            Junction::Or => &self.or_token,
        }
    }

    /// Parses and validates a syntax from a YAML document.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let syntax: QuerySyntax = serde_yaml::from_str(input)?;
        syntax.validate()?;
        Ok(syntax)
    }

    /// Reads, parses and validates a syntax from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Checks that the tokens can produce an unambiguous query.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_open.is_empty() || self.group_close.is_empty() {
            return Err(ConfigError::Invalid(
                "group delimiters must not be empty".to_string(),
            ));
        }
        if self.group_open == self.group_close {
            return Err(ConfigError::Invalid(format!(
                "group delimiters must differ, both are '{}'",
                self.group_open
            )));
        }
        if self.and_token.trim().is_empty() || self.or_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "junction tokens must not be blank".to_string(),
            ));
        }
        // Negation is never implicit, so it always needs a marker.
        if self.exclude_marker.is_empty() {
            return Err(ConfigError::Invalid(
                "exclude_marker must not be empty".to_string(),
            ));
        }
        if self.implicit_boost == QueryBoost::Exclude {
            return Err(ConfigError::Invalid(
                "implicit_boost cannot be EXCLUDE".to_string(),
            ));
        }
        Ok(())
    }
}
