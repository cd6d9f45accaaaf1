//! Operation registry.
//!
//! The registry is assembled once at startup through [`RegistryBuilder`] and
//! is immutable afterwards. Lookups walk the operations in ascending priority
//! order (registration order breaks ties) and return the first one whose
//! [`Operation::is_applicable`] accepts the rule.
//!
//! # Collision Handling
//!
//! Two operations declaring the same [`Signature`] at the same priority make
//! the lookup depend on registration order. [`RegistryBuilder::build`]
//! rejects that with [`CompileError::AmbiguousOperator`]. The same signature
//! at different priorities is allowed: the lower priority wins, which is how
//! a backend module overrides a stock operation.
//!
//! # Example
//!
//! ```ignore
//! let registry = OperationRegistry::builder()
//!     .register(StringEquals::new(resolver.clone()), 100)
//!     .register(CaseInsensitiveEquals::new(resolver), 10)
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CompileError, Result};
use crate::operation::{Operation, Signature};
use crate::tree::Rule;

/// Priority given to operations registered without an explicit one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// An operation together with the priority it was registered at.
#[derive(Clone)]
pub struct RegisteredOperation {
    priority: i32,
    operation: Arc<dyn Operation>,
}

impl RegisteredOperation {
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn operation(&self) -> &dyn Operation {
        self.operation.as_ref()
    }

    pub fn signature(&self) -> &Signature {
        self.operation.signature()
    }

    pub fn name(&self) -> &str {
        self.operation.name()
    }
}

impl fmt::Debug for RegisteredOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredOperation")
            .field("priority", &self.priority)
            .field("name", &self.name())
            .field("signature", self.signature())
            .finish()
    }
}

/// Collects operations before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<RegisteredOperation>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Adds an operation at `priority`. Lower priorities are consulted first.
    pub fn register(self, operation: impl Operation + 'static, priority: i32) -> Self {
        self.register_arc(Arc::new(operation), priority)
    }

    /// Adds an already shared operation at `priority`.
    pub fn register_arc(mut self, operation: Arc<dyn Operation>, priority: i32) -> Self {
        self.entries.push(RegisteredOperation {
            priority,
            operation,
        });
        self
    }

    /// Number of operations registered so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Orders the operations and freezes them into a registry.
    ///
    /// Fails with [`CompileError::AmbiguousOperator`] when two operations
    /// share both signature and priority.
    pub fn build(self) -> Result<OperationRegistry> {
        let mut entries = self.entries;
        // Stable: equal priorities keep registration order.
        entries.sort_by_key(RegisteredOperation::priority);

        check_collisions(&entries)?;

        tracing::debug!(operations = entries.len(), "operation registry built");
        Ok(OperationRegistry { entries })
    }
}

/// Immutable, ordered set of operations.
///
/// Safe to share across threads behind an `Arc`; lookups take no locks.
pub struct OperationRegistry {
    entries: Vec<RegisteredOperation>,
}

impl OperationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the first operation, in priority order, that handles `rule`.
    pub fn find_applicable(&self, rule: &Rule) -> Option<&dyn Operation> {
        self.entries
            .iter()
            .map(RegisteredOperation::operation)
            .find(|op| op.is_applicable(rule))
    }

    /// Iterates over the operations in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredOperation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

fn check_collisions(entries: &[RegisteredOperation]) -> Result<()> {
    let mut claimed: HashMap<(i32, &Signature), &str> = HashMap::new();
    for entry in entries {
        let key = (entry.priority, entry.signature());
        if let Some(first) = claimed.insert(key, entry.name()) {
            return Err(CompileError::AmbiguousOperator {
                value_type: entry.signature().value_type,
                operation: entry.signature().operation.clone(),
                priority: entry.priority,
                first: first.to_string(),
                second: entry.name().to_string(),
            });
        }
    }
    Ok(())
}
