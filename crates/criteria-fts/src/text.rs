//! Operations on string and uri values.

use std::sync::Arc;

use criteria::{Arity, Operation, QueryBoost, RenderContext, Result, Rule, Signature, ValueType};

use crate::literal::{escape_term, field_ref, literal_at, quote};
use crate::namespace::NamespaceResolver;

/// Which text comparison an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// `field:"value"`
    Equals,
    /// `-field:"value"`
    NotEquals,
    /// `field:*value*`
    Contains,
    /// `field:value*`
    StartsWith,
    /// `field:("a" OR "b")`
    AnyOf,
}

impl TextKind {
    pub fn operation(self) -> &'static str {
        match self {
            TextKind::Equals => "equals",
            TextKind::NotEquals => "not_equals",
            TextKind::Contains => "contains",
            TextKind::StartsWith => "starts_with",
            TextKind::AnyOf => "in",
        }
    }
}

/// Text comparison on a string or uri field.
pub struct TextOperation {
    kind: TextKind,
    signature: Signature,
    resolver: Arc<dyn NamespaceResolver>,
}

impl TextOperation {
    pub fn new(kind: TextKind, value_type: ValueType, resolver: Arc<dyn NamespaceResolver>) -> Self {
        TextOperation {
            kind,
            signature: Signature::new(value_type, kind.operation()),
            resolver,
        }
    }
}

impl Operation for TextOperation {
    fn name(&self) -> &str {
        match self.kind {
            TextKind::Equals => "text-equals",
            TextKind::NotEquals => "text-not-equals",
            TextKind::Contains => "text-contains",
            TextKind::StartsWith => "text-starts-with",
            TextKind::AnyOf => "text-any-of",
        }
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn arity(&self) -> Arity {
        match self.kind {
            TextKind::AnyOf => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    fn render(&self, out: &mut String, rule: &Rule, cx: &RenderContext<'_>) -> Result<()> {
        let field = field_ref(self.resolver.as_ref(), rule)?;
        match self.kind {
            TextKind::Equals => {
                let value = literal_at(rule, 0)?;
                out.push_str(&format!("{field}:{}", quote(value)));
            }
            TextKind::NotEquals => {
                let value = literal_at(rule, 0)?;
                cx.boost_policy().write_prefix(out, QueryBoost::Exclude);
                out.push_str(&format!("{field}:{}", quote(value)));
            }
            TextKind::Contains => {
                let value = literal_at(rule, 0)?;
                out.push_str(&format!("{field}:*{}*", escape_term(value)));
            }
            TextKind::StartsWith => {
                let value = literal_at(rule, 0)?;
                out.push_str(&format!("{field}:{}*", escape_term(value)));
            }
            TextKind::AnyOf => {
                let syntax = cx.syntax();
                let values = (0..rule.values.len())
                    .map(|i| literal_at(rule, i).map(quote))
                    .collect::<Result<Vec<_>>>()?;
                let separator = format!(" {} ", syntax.or_token);
                out.push_str(&field);
                out.push(':');
                out.push_str(&syntax.group_open);
                out.push_str(&values.join(&separator));
                out.push_str(&syntax.group_close);
            }
        }
        Ok(())
    }
}
