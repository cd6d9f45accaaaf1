//! Lucene/FTS-style operations for the criteria compiler.
//!
//! This crate is a backend module: it defines how each `(value type,
//! operation)` pair is written in a full-text query language with
//! `field:value` clauses, bracketed ranges and `+`/`|`/`-` markers, and
//! registers those operations with a [`criteria::RegistryBuilder`].
//!
//! # Operations
//!
//! | Type | Operations |
//! |------|------------|
//! | string | `equals`, `not_equals`, `contains`, `starts_with`, `in` |
//! | uri | `equals`, `not_equals`, `set_to_query`, `not_set_to_query` |
//! | numeric, date | `equals`, `greater_than`, `greater_or_equal`, `less_than`, `less_or_equal`, `between` |
//! | boolean | `equals`, `is_not` |
//! | all | `is_set`, `is_not_set` |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use criteria::{Compiler, Rule, ValueType};
//! use criteria_fts::PrefixResolver;
//!
//! let resolver = Arc::new(PrefixResolver::new().with_default_prefix("cm"));
//! let registry = criteria_fts::registry(resolver)?;
//! let compiler = Compiler::new(Arc::new(registry));
//!
//! let rule = Rule::new("r1", "active", ValueType::Boolean, "is_not").value("true");
//! assert_eq!(compiler.compile(&rule.into())?, "cm:active:false");
//! # Ok::<(), criteria::CompileError>(())
//! ```

mod boolean;
mod literal;
mod namespace;
mod presence;
mod range;
mod relation;
mod text;

use std::sync::Arc;

use criteria::{OperationRegistry, RegistryBuilder, Result, ValueType, DEFAULT_PRIORITY};

pub use boolean::BooleanOperation;
pub use literal::{escape_term, quote};
pub use namespace::{NamespaceResolver, PrefixResolver};
pub use presence::PresenceOperation;
pub use range::{RangeKind, RangeOperation};
pub use relation::{RelationOperation, TraversalTemplate};
pub use text::{TextKind, TextOperation};

/// Adds every operation of this backend to `builder` at [`DEFAULT_PRIORITY`].
///
/// Operations registered at a lower priority, before or after this call,
/// take precedence over the ones added here.
pub fn register_operations(
    builder: RegistryBuilder,
    resolver: Arc<dyn NamespaceResolver>,
) -> RegistryBuilder {
    register_operations_with(builder, resolver, TraversalTemplate::default())
}

/// Like [`register_operations`], with a custom relation traversal template.
pub fn register_operations_with(
    mut builder: RegistryBuilder,
    resolver: Arc<dyn NamespaceResolver>,
    traversal: TraversalTemplate,
) -> RegistryBuilder {
    let before = builder.len();
    let r = &resolver;

    for kind in [
        TextKind::Equals,
        TextKind::NotEquals,
        TextKind::Contains,
        TextKind::StartsWith,
        TextKind::AnyOf,
    ] {
        builder = builder.register(TextOperation::new(kind, ValueType::String, r.clone()), DEFAULT_PRIORITY);
    }
    for kind in [TextKind::Equals, TextKind::NotEquals] {
        builder = builder.register(TextOperation::new(kind, ValueType::Uri, r.clone()), DEFAULT_PRIORITY);
    }

    for value_type in [ValueType::Numeric, ValueType::Date] {
        for kind in RangeKind::ALL {
            builder = builder.register(RangeOperation::new(kind, value_type, r.clone()), DEFAULT_PRIORITY);
        }
    }

    builder = builder
        .register(BooleanOperation::equals(r.clone()), DEFAULT_PRIORITY)
        .register(BooleanOperation::is_not(r.clone()), DEFAULT_PRIORITY);

    for value_type in ValueType::ALL {
        builder = builder
            .register(PresenceOperation::is_set(value_type, r.clone()), DEFAULT_PRIORITY)
            .register(PresenceOperation::is_not_set(value_type, r.clone()), DEFAULT_PRIORITY);
    }

    builder = builder
        .register(
            RelationOperation::set_to_query(r.clone()).with_template(traversal.clone()),
            DEFAULT_PRIORITY,
        )
        .register(
            RelationOperation::not_set_to_query(r.clone()).with_template(traversal),
            DEFAULT_PRIORITY,
        );

    tracing::debug!(added = builder.len() - before, "registered fts operations");
    builder
}

/// Builds a registry holding only this backend's operations.
pub fn registry(resolver: Arc<dyn NamespaceResolver>) -> Result<OperationRegistry> {
    register_operations(OperationRegistry::builder(), resolver).build()
}
