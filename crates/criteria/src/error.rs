//! Error types for the criteria crate.

use thiserror::Error;

use crate::tree::{Rule, ValueType};

/// Errors that can occur when building a registry, loading a tree, or
/// compiling it.
///
/// Every variant aborts the whole compilation. The only way a leaf is
/// dropped without an error is when the rule is explicitly flagged
/// `optional` and no operation matches it.
#[derive(Debug, Error)]
pub enum CompileError {
    /// No registered operation matches the rule's type and operation name.
    #[error("no operation '{operation}' registered for {value_type} values (field '{field}')")]
    UnknownOperator {
        field: String,
        operation: String,
        value_type: ValueType,
    },

    /// Two operations claim the same signature at the same priority.
    ///
    /// Raised by [`RegistryBuilder::build`](crate::RegistryBuilder::build), never
    /// during compilation.
    #[error(
        "operations '{first}' and '{second}' both claim '{operation}' on {value_type} values at priority {priority}"
    )]
    AmbiguousOperator {
        value_type: ValueType,
        operation: String,
        priority: i32,
        first: String,
        second: String,
    },

    /// The matched operation rejected the rule's values.
    #[error("malformed rule for field '{field}' ({operation}): {reason}")]
    MalformedRule {
        field: String,
        operation: String,
        reason: String,
    },

    /// A node in the input document is neither a rule nor a condition.
    #[error("unsupported node type '{node_type}' (node '{id}')")]
    UnsupportedNodeType { id: String, node_type: String },

    /// Two nodes in the same tree share an id.
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    /// The input document could not be decoded into a tree.
    #[error("invalid criteria tree: {0}")]
    InvalidTree(#[from] serde_json::Error),
}

impl CompileError {
    /// Builds an [`CompileError::UnknownOperator`] naming the rule's field,
    /// operation and type.
    pub fn unknown_operator(rule: &Rule) -> Self {
        CompileError::UnknownOperator {
            field: rule.field.clone(),
            operation: rule.operation.clone(),
            value_type: rule.value_type,
        }
    }

    /// Builds a [`CompileError::MalformedRule`] for the given rule.
    pub fn malformed(rule: &Rule, reason: impl Into<String>) -> Self {
        CompileError::MalformedRule {
            field: rule.field.clone(),
            operation: rule.operation.clone(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML document is not valid for the target type.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but describes an unusable configuration.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for criteria operations.
pub type Result<T> = std::result::Result<T, CompileError>;
