//! Relation traversal with embedded sub-queries.
//!
//! `set_to_query` matches nodes whose relation `field` points at something
//! matching a nested criteria tree. The nested tree is compiled by the same
//! compiler, then placed into a [`TraversalTemplate`]:
//!
//! ```text
//! $field:{$query}   ->   app:assignee:{(cm:status:"ACTIVE")}
//! ```
//!
//! `not_set_to_query` writes the same traversal inside an excluded group, so
//! only the outer existence test is negated:
//!
//! ```text
//! -(app:assignee:{(cm:status:"ACTIVE")})
//! ```

use std::sync::Arc;

use criteria::{
    CompileError, ConfigError, Operation, RenderContext, Result, Rule, RuleValue, Signature,
    ValueType,
};

use crate::literal::field_ref;
use crate::namespace::NamespaceResolver;

const FIELD: &str = "$field";
const QUERY: &str = "$query";

/// Text wrapped around a compiled sub-query.
///
/// `$field` is replaced by the qualified relation name and `$query` by the
/// nested compilation. `$query` must appear exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalTemplate {
    before: String,
    after: String,
}

impl TraversalTemplate {
    pub fn new(template: &str) -> std::result::Result<Self, ConfigError> {
        let mut parts = template.split(QUERY);
        let (Some(before), Some(after), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ConfigError::Invalid(format!(
                "traversal template '{template}' must contain {QUERY} exactly once"
            )));
        };
        if !template.contains(FIELD) {
            return Err(ConfigError::Invalid(format!(
                "traversal template '{template}' must contain {FIELD}"
            )));
        }
        Ok(TraversalTemplate {
            before: before.to_string(),
            after: after.to_string(),
        })
    }

    /// Writes the traversal for `field` around `query`.
    pub fn write(&self, out: &mut String, field: &str, query: &str) {
        out.push_str(&self.before.replace(FIELD, field));
        out.push_str(query);
        out.push_str(&self.after.replace(FIELD, field));
    }
}

impl Default for TraversalTemplate {
    fn default() -> Self {
        TraversalTemplate {
            before: format!("{FIELD}:{{"),
            after: "}".to_string(),
        }
    }
}

/// Relation test against an embedded criteria tree.
pub struct RelationOperation {
    negated: bool,
    signature: Signature,
    template: TraversalTemplate,
    resolver: Arc<dyn NamespaceResolver>,
}

impl RelationOperation {
    /// `set_to_query` on uri fields.
    pub fn set_to_query(resolver: Arc<dyn NamespaceResolver>) -> Self {
        RelationOperation {
            negated: false,
            signature: Signature::new(ValueType::Uri, "set_to_query"),
            template: TraversalTemplate::default(),
            resolver,
        }
    }

    /// `not_set_to_query` on uri fields.
    pub fn not_set_to_query(resolver: Arc<dyn NamespaceResolver>) -> Self {
        RelationOperation {
            negated: true,
            signature: Signature::new(ValueType::Uri, "not_set_to_query"),
            template: TraversalTemplate::default(),
            resolver,
        }
    }

    pub fn with_template(mut self, template: TraversalTemplate) -> Self {
        self.template = template;
        self
    }
}

impl Operation for RelationOperation {
    fn name(&self) -> &str {
        if self.negated {
            "relation-not-set-to-query"
        } else {
            "relation-set-to-query"
        }
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn render(&self, out: &mut String, rule: &Rule, cx: &RenderContext<'_>) -> Result<()> {
        let field = field_ref(self.resolver.as_ref(), rule)?;
        let nested = rule
            .values
            .first()
            .and_then(RuleValue::as_query)
            .ok_or_else(|| CompileError::malformed(rule, "expected an embedded query"))?;
        let query = cx.compile_nested(nested)?;
        if query.is_empty() {
            return Err(CompileError::malformed(rule, "embedded query compiled to nothing"));
        }

        if self.negated {
            cx.boost_policy().write_negated(out, |out| {
                self.template.write(out, &field, &query);
                Ok(())
            })
        } else {
            self.template.write(out, &field, &query);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template() {
        let mut out = String::new();
        TraversalTemplate::default().write(&mut out, "app:owner", "(x:1)");
        assert_eq!(out, "app:owner:{(x:1)}");
    }

    #[test]
    fn custom_template() {
        let template = TraversalTemplate::new("EXISTS($field -> $query)").unwrap();
        let mut out = String::new();
        template.write(&mut out, "owner", "name:bob");
        assert_eq!(out, "EXISTS(owner -> name:bob)");
    }

    #[test]
    fn template_needs_one_query_slot() {
        assert!(TraversalTemplate::new("$field:{}").is_err());
        assert!(TraversalTemplate::new("$field:$query|$query").is_err());
        assert!(TraversalTemplate::new("owner:{$query}").is_err());
    }
}
