//! Operation strategies.
//!
//! An [`Operation`] renders one `(value type, operation name)` pair into the
//! target language. Backends provide operations and register them with a
//! [`RegistryBuilder`](crate::RegistryBuilder); the compiler never knows any
//! operator by name.

use std::fmt;

use crate::emitter::RenderContext;
use crate::error::Result;
use crate::tree::{Rule, ValueType};

/// The `(value type, operation name)` pair an operation answers for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub value_type: ValueType,
    pub operation: String,
}

impl Signature {
    pub fn new(value_type: ValueType, operation: impl Into<String>) -> Self {
        Signature {
            value_type,
            operation: operation.into(),
        }
    }

    /// Returns `true` if the rule carries exactly this type and operation.
    pub fn matches(&self, rule: &Rule) -> bool {
        self.value_type == rule.value_type && self.operation == rule.operation
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value_type, self.operation)
    }
}

/// Number of values an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    /// No values at all.
    pub const UNARY: Arity = Arity::Exactly(0);

    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (qualifier, n) = match self {
            Arity::Exactly(n) => ("exactly", n),
            Arity::AtLeast(n) => ("at least", n),
        };
        let noun = if *n == 1 { "value" } else { "values" };
        write!(f, "{qualifier} {n} {noun}")
    }
}

/// A pluggable rendering strategy for one operator.
///
/// Operations are shared across threads once the registry is built, so
/// implementations must not keep per-call state.
///
/// # Example
///
/// ```
/// use criteria::{Operation, RenderContext, Result, Rule, Signature, ValueType};
///
/// struct Exists {
///     signature: Signature,
/// }
///
/// impl Operation for Exists {
///     fn name(&self) -> &str {
///         "exists"
///     }
///
///     fn signature(&self) -> &Signature {
///         &self.signature
///     }
///
///     fn arity(&self) -> criteria::Arity {
///         criteria::Arity::UNARY
///     }
///
///     fn render(&self, out: &mut String, rule: &Rule, _cx: &RenderContext<'_>) -> Result<()> {
///         out.push_str("EXISTS:");
///         out.push_str(&rule.field);
///         Ok(())
///     }
/// }
///
/// let op = Exists { signature: Signature::new(ValueType::String, "exists") };
/// assert!(op.is_applicable(&Rule::new("r", "title", ValueType::String, "exists")));
/// ```
pub trait Operation: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// The type and operation name this strategy handles.
    fn signature(&self) -> &Signature;

    /// Accepted number of values. Checked after the operation is selected.
    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }

    /// Returns `true` if this operation handles the rule.
    fn is_applicable(&self, rule: &Rule) -> bool {
        self.signature().matches(rule)
    }

    /// Appends the rendered clause to `out`.
    fn render(&self, out: &mut String, rule: &Rule, cx: &RenderContext<'_>) -> Result<()>;
}

impl fmt::Debug for dyn Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name())
            .field("signature", self.signature())
            .finish()
    }
}
