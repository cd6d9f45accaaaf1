//! Criteria - compile search criteria trees into query language fragments.
//!
//! A client describes a search as a nested boolean tree of predicates. This
//! crate turns that backend-agnostic tree into a textual fragment for one
//! specific query backend. It provides:
//!
//! - A closed tree model: [`SearchNode`] is either a [`Rule`] or a [`Condition`]
//! - A pluggable set of [`Operation`] strategies, one per (value type, operator)
//! - An immutable [`OperationRegistry`] built once at startup
//! - A recursive [`Compiler`] that composes grouping, junction and boost syntax
//! - A shared [`BoostPolicy`] for required/optional/excluded markers
//!
//! The crate ships no operators of its own. Backend crates register theirs
//! through [`RegistryBuilder::register`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use criteria::{
//!     Compiler, Condition, Operation, OperationRegistry, RenderContext, Result, Rule,
//!     Signature, ValueType,
//! };
//!
//! struct Equals {
//!     signature: Signature,
//! }
//!
//! impl Operation for Equals {
//!     fn name(&self) -> &str {
//!         "equals"
//!     }
//!
//!     fn signature(&self) -> &Signature {
//!         &self.signature
//!     }
//!
//!     fn render(&self, out: &mut String, rule: &Rule, _cx: &RenderContext<'_>) -> Result<()> {
//!         out.push_str(&format!("{}:\"{}\"", rule.field, rule.literal(0).unwrap_or_default()));
//!         Ok(())
//!     }
//! }
//!
//! let registry = OperationRegistry::builder()
//!     .register(Equals { signature: Signature::new(ValueType::String, "equals") }, 100)
//!     .build()?;
//! let compiler = Compiler::new(Arc::new(registry));
//!
//! let tree = Condition::and("root")
//!     .child(Rule::new("r1", "status", ValueType::String, "equals").value("ACTIVE"))
//!     .child(Rule::new("r2", "priority", ValueType::String, "equals").value("HIGH"));
//!
//! assert_eq!(
//!     compiler.compile(&tree.into())?,
//!     r#"(status:"ACTIVE" AND priority:"HIGH")"#
//! );
//! # Ok::<(), criteria::CompileError>(())
//! ```
//!
//! # Compilation Semantics
//!
//! | Node | Output |
//! |------|--------|
//! | Rule | whatever the first applicable operation renders |
//! | Condition | `[marker](child JUNCTION child ...)` |
//! | Empty condition | `()` |
//! | Optional rule, no operation | nothing, and no junction around it |
//! | Other rule, no operation | [`CompileError::UnknownOperator`] |
//!
//! Compilation is a pure function of tree, registry and [`QuerySyntax`]: the
//! same input always yields the same string.

mod boost;
mod emitter;
mod error;
mod operation;
mod registry;
mod syntax;
pub mod tree;

// Re-export public API
pub use boost::{BoostPolicy, Position, QueryBoost};
pub use emitter::{Compiler, RenderContext};
pub use error::{CompileError, ConfigError, Result};
pub use operation::{Arity, Operation, Signature};
pub use registry::{OperationRegistry, RegisteredOperation, RegistryBuilder, DEFAULT_PRIORITY};
pub use syntax::QuerySyntax;
pub use tree::{from_json, Condition, Junction, NodeType, Rule, RuleValue, SearchNode, ValueType};
