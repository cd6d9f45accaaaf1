//! Query emitter.
//!
//! [`Compiler`] walks a criteria tree and writes the target-language
//! fragment into a single owned buffer:
//!
//! - A [`Condition`] writes its boost prefix, the opening delimiter, its
//!   children separated by the junction token, then the closing delimiter.
//! - A [`Rule`] is handed to the first applicable [`Operation`] from the
//!   registry.
//!
//! A junction token only appears between two children that both produced
//! output, so a skipped optional rule never leaves a dangling `AND`/`OR`.
//! An empty condition still renders its delimiters.
//!
//! # Example
//!
//! ```ignore
//! let compiler = Compiler::new(Arc::new(registry));
//! let query = compiler.compile(&tree)?;
//! ```

use std::sync::Arc;

use crate::boost::BoostPolicy;
use crate::error::{CompileError, Result};
use crate::registry::OperationRegistry;
use crate::syntax::QuerySyntax;
use crate::tree::{Condition, Rule, SearchNode};

/// Compiles criteria trees for one target syntax.
///
/// Holds no per-call state; a single compiler can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: Arc<OperationRegistry>,
    syntax: QuerySyntax,
}

impl Compiler {
    /// Creates a compiler using the default [`QuerySyntax`].
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Compiler::with_syntax(registry, QuerySyntax::default())
    }

    pub fn with_syntax(registry: Arc<OperationRegistry>, syntax: QuerySyntax) -> Self {
        Compiler { registry, syntax }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn syntax(&self) -> &QuerySyntax {
        &self.syntax
    }

    /// Compiles `root` into a query fragment.
    ///
    /// Fails with [`CompileError::DuplicateNodeId`] before writing anything
    /// if two nodes of the tree share an id. Embedded sub-queries are
    /// checked as trees of their own.
    pub fn compile(&self, root: &SearchNode) -> Result<String> {
        root.check_unique_ids()?;
        self.compile_checked(root)
    }

    // Ids of embedded trees were checked along with their outer tree.
    fn compile_checked(&self, root: &SearchNode) -> Result<String> {
        let mut out = String::new();
        self.emit(root, &mut out)?;
        tracing::debug!(root = root.id(), len = out.len(), "compiled criteria tree");
        Ok(out)
    }

    fn emit(&self, node: &SearchNode, out: &mut String) -> Result<()> {
        match node {
            SearchNode::Rule(rule) => self.emit_rule(rule, out),
            SearchNode::Condition(condition) => self.emit_condition(condition, out),
        }
    }

    fn emit_condition(&self, condition: &Condition, out: &mut String) -> Result<()> {
        BoostPolicy::new(&self.syntax).write_prefix(out, condition.boost);
        out.push_str(&self.syntax.group_open);

        let group_start = out.len();
        let junction = self.syntax.junction_token(condition.junction);
        for child in &condition.children {
            let mark = out.len();
            if mark > group_start {
                out.push(' ');
                out.push_str(junction);
                out.push(' ');
            }
            let body = out.len();
            self.emit(child, out)?;
            if out.len() == body {
                out.truncate(mark);
            }
        }

        out.push_str(&self.syntax.group_close);
        Ok(())
    }

    fn emit_rule(&self, rule: &Rule, out: &mut String) -> Result<()> {
        let Some(operation) = self.registry.find_applicable(rule) else {
            if rule.optional {
                tracing::trace!(
                    id = %rule.id,
                    field = %rule.field,
                    operation = %rule.operation,
                    "skipping optional rule with no matching operation"
                );
                return Ok(());
            }
            return Err(CompileError::unknown_operator(rule));
        };

        let arity = operation.arity();
        if !arity.accepts(rule.values.len()) {
            return Err(CompileError::malformed(
                rule,
                format!("expected {arity}, got {}", rule.values.len()),
            ));
        }

        tracing::trace!(id = %rule.id, operation = operation.name(), "rendering rule");
        operation.render(out, rule, &RenderContext { compiler: self })
    }
}

/// What an [`Operation`](crate::Operation) sees of the compiler while rendering.
pub struct RenderContext<'a> {
    compiler: &'a Compiler,
}

impl<'a> RenderContext<'a> {
    pub fn syntax(&self) -> &'a QuerySyntax {
        &self.compiler.syntax
    }

    pub fn boost_policy(&self) -> BoostPolicy<'a> {
        BoostPolicy::new(self.syntax())
    }

    /// Compiles an embedded tree with the same registry and syntax, into a
    /// buffer of its own.
    pub fn compile_nested(&self, node: &SearchNode) -> Result<String> {
        self.compiler.compile_checked(node)
    }
}
