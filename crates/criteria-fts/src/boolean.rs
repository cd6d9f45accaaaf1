//! Operations on boolean values.

use std::sync::Arc;

use criteria::{Operation, RenderContext, Result, Rule, Signature, ValueType};

use crate::literal::{field_ref, literal_at, parse_bool};
use crate::namespace::NamespaceResolver;

/// `equals` asserts the literal, `is_not` asserts its inverse.
pub struct BooleanOperation {
    inverted: bool,
    signature: Signature,
    resolver: Arc<dyn NamespaceResolver>,
}

impl BooleanOperation {
    pub fn equals(resolver: Arc<dyn NamespaceResolver>) -> Self {
        BooleanOperation {
            inverted: false,
            signature: Signature::new(ValueType::Boolean, "equals"),
            resolver,
        }
    }

    pub fn is_not(resolver: Arc<dyn NamespaceResolver>) -> Self {
        BooleanOperation {
            inverted: true,
            signature: Signature::new(ValueType::Boolean, "is_not"),
            resolver,
        }
    }
}

impl Operation for BooleanOperation {
    fn name(&self) -> &str {
        if self.inverted {
            "boolean-is-not"
        } else {
            "boolean-equals"
        }
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn render(&self, out: &mut String, rule: &Rule, _cx: &RenderContext<'_>) -> Result<()> {
        let field = field_ref(self.resolver.as_ref(), rule)?;
        let value = parse_bool(rule, literal_at(rule, 0)?)?;
        out.push_str(&format!("{field}:{}", value != self.inverted));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::PrefixResolver;
    use criteria::{CompileError, Compiler, OperationRegistry};

    fn compiler() -> Compiler {
        let resolver: Arc<dyn NamespaceResolver> = Arc::new(PrefixResolver::new());
        let registry = OperationRegistry::builder()
            .register(BooleanOperation::equals(resolver.clone()), 100)
            .register(BooleanOperation::is_not(resolver), 100)
            .build()
            .unwrap();
        Compiler::new(Arc::new(registry))
    }

    #[test]
    fn is_not_inverts_literal() {
        let rule = Rule::new("r", "active", ValueType::Boolean, "is_not").value("true");
        assert_eq!(compiler().compile(&rule.into()).unwrap(), "active:false");

        let rule = Rule::new("r", "active", ValueType::Boolean, "is_not").value("FALSE");
        assert_eq!(compiler().compile(&rule.into()).unwrap(), "active:true");
    }

    #[test]
    fn equals_keeps_literal() {
        let rule = Rule::new("r", "active", ValueType::Boolean, "equals").value("True");
        assert_eq!(compiler().compile(&rule.into()).unwrap(), "active:true");
    }

    #[test]
    fn is_not_requires_exactly_one_boolean() {
        let none = Rule::new("r", "active", ValueType::Boolean, "is_not");
        assert!(matches!(
            compiler().compile(&none.into()),
            Err(CompileError::MalformedRule { .. })
        ));

        let two = Rule::new("r", "active", ValueType::Boolean, "is_not")
            .value("true")
            .value("false");
        assert!(matches!(
            compiler().compile(&two.into()),
            Err(CompileError::MalformedRule { .. })
        ));

        let word = Rule::new("r", "active", ValueType::Boolean, "is_not").value("yes");
        assert!(matches!(
            compiler().compile(&word.into()),
            Err(CompileError::MalformedRule { .. })
        ));
    }
}
