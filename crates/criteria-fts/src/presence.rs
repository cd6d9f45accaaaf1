//! Unary presence tests.

use std::sync::Arc;

use criteria::{Arity, Operation, RenderContext, Result, Rule, Signature, ValueType};

use crate::literal::{field_ref, quote};
use crate::namespace::NamespaceResolver;

/// `is_set` writes `ISNOTNULL:"field"`, `is_not_set` writes `ISNULL:"field"`.
pub struct PresenceOperation {
    present: bool,
    signature: Signature,
    resolver: Arc<dyn NamespaceResolver>,
}

impl PresenceOperation {
    pub fn is_set(value_type: ValueType, resolver: Arc<dyn NamespaceResolver>) -> Self {
        PresenceOperation {
            present: true,
            signature: Signature::new(value_type, "is_set"),
            resolver,
        }
    }

    pub fn is_not_set(value_type: ValueType, resolver: Arc<dyn NamespaceResolver>) -> Self {
        PresenceOperation {
            present: false,
            signature: Signature::new(value_type, "is_not_set"),
            resolver,
        }
    }
}

impl Operation for PresenceOperation {
    fn name(&self) -> &str {
        if self.present {
            "is-set"
        } else {
            "is-not-set"
        }
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn arity(&self) -> Arity {
        Arity::UNARY
    }

    fn render(&self, out: &mut String, rule: &Rule, _cx: &RenderContext<'_>) -> Result<()> {
        let field = field_ref(self.resolver.as_ref(), rule)?;
        let keyword = if self.present { "ISNOTNULL" } else { "ISNULL" };
        out.push_str(keyword);
        out.push(':');
        out.push_str(&quote(&field));
        Ok(())
    }
}
