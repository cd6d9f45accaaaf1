//! Operations on numeric and date values.
//!
//! Ranges use square brackets for inclusive and angle brackets for
//! exclusive bounds, with `MIN`/`MAX` for open ends:
//!
//! | Operation | Output |
//! |-----------|--------|
//! | `equals` | `field:v` |
//! | `greater_than` | `field:<v TO MAX]` |
//! | `greater_or_equal` | `field:[v TO MAX]` |
//! | `less_than` | `field:[MIN TO v>` |
//! | `less_or_equal` | `field:[MIN TO v]` |
//! | `between` | `field:[a TO b]` |

use std::sync::Arc;

use criteria::{Arity, CompileError, Operation, RenderContext, Result, Rule, Signature, ValueType};

use crate::literal::{field_ref, literal_at, scalar};
use crate::namespace::NamespaceResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Between,
}

impl RangeKind {
    pub const ALL: [RangeKind; 6] = [
        RangeKind::Equals,
        RangeKind::GreaterThan,
        RangeKind::GreaterOrEqual,
        RangeKind::LessThan,
        RangeKind::LessOrEqual,
        RangeKind::Between,
    ];

    pub fn operation(self) -> &'static str {
        match self {
            RangeKind::Equals => "equals",
            RangeKind::GreaterThan => "greater_than",
            RangeKind::GreaterOrEqual => "greater_or_equal",
            RangeKind::LessThan => "less_than",
            RangeKind::LessOrEqual => "less_or_equal",
            RangeKind::Between => "between",
        }
    }
}

/// Comparison on an ordered (numeric or date) field.
pub struct RangeOperation {
    kind: RangeKind,
    signature: Signature,
    resolver: Arc<dyn NamespaceResolver>,
}

impl RangeOperation {
    pub fn new(kind: RangeKind, value_type: ValueType, resolver: Arc<dyn NamespaceResolver>) -> Self {
        RangeOperation {
            kind,
            signature: Signature::new(value_type, kind.operation()),
            resolver,
        }
    }
}

impl Operation for RangeOperation {
    fn name(&self) -> &str {
        match self.kind {
            RangeKind::Equals => "range-equals",
            RangeKind::GreaterThan => "range-greater-than",
            RangeKind::GreaterOrEqual => "range-greater-or-equal",
            RangeKind::LessThan => "range-less-than",
            RangeKind::LessOrEqual => "range-less-or-equal",
            RangeKind::Between => "range-between",
        }
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn arity(&self) -> Arity {
        match self.kind {
            RangeKind::Between => Arity::Exactly(2),
            _ => Arity::Exactly(1),
        }
    }

    fn render(&self, out: &mut String, rule: &Rule, _cx: &RenderContext<'_>) -> Result<()> {
        let field = field_ref(self.resolver.as_ref(), rule)?;
        let value = scalar(rule, literal_at(rule, 0)?)?;
        let clause = match self.kind {
            RangeKind::Equals => format!("{field}:{value}"),
            RangeKind::GreaterThan => format!("{field}:<{value} TO MAX]"),
            RangeKind::GreaterOrEqual => format!("{field}:[{value} TO MAX]"),
            RangeKind::LessThan => format!("{field}:[MIN TO {value}>"),
            RangeKind::LessOrEqual => format!("{field}:[MIN TO {value}]"),
            RangeKind::Between => {
                let upper = scalar(rule, literal_at(rule, 1)?)?;
                check_order(rule, &value, &upper)?;
                format!("{field}:[{value} TO {upper}]")
            }
        };
        out.push_str(&clause);
        Ok(())
    }
}

// Only numbers are compared; date bounds may mix formats and keywords.
fn check_order(rule: &Rule, lower: &str, upper: &str) -> Result<()> {
    if rule.value_type != ValueType::Numeric {
        return Ok(());
    }
    match (lower.parse::<f64>(), upper.parse::<f64>()) {
        (Ok(lo), Ok(hi)) if lo > hi => Err(CompileError::malformed(
            rule,
            format!("lower bound {lower} is greater than upper bound {upper}"),
        )),
        _ => Ok(()),
    }
}
