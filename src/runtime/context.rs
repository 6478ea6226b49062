//! Named registry of finalized schemas

use crate::errors::Error;
use crate::schema::types::Schema;
use dashmap::DashMap;
use std::sync::Arc;

/// Holds finalized schemas by name and derives children from them.
///
/// Registration freezes a schema behind an `Arc`; further declarations
/// happen on derived copies, never on registered state. That makes the
/// declaration-time single-threadedness assumption a property of the
/// types rather than a locking protocol.
pub struct SchemaContext {
    schemas: DashMap<String, Arc<Schema>>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self {
            schemas: DashMap::new(),
        }
    }

    /// Register a schema under its own name, returning the shared
    /// handle used for construction.
    pub fn register(&self, schema: Schema) -> Arc<Schema> {
        let shared = schema.shared();
        tracing::debug!(schema = %shared.name(), "registering schema");
        self.schemas.insert(shared.name().to_string(), shared.clone());
        shared
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).map(|entry| entry.value().clone())
    }

    /// Derive a child from a registered parent. The child starts from
    /// the parent's cloned state and is returned unregistered, open for
    /// further declarations.
    pub fn derive(&self, parent: &str, child: impl Into<String>) -> Result<Schema, Error> {
        match self.get(parent) {
            Some(schema) => Ok(schema.derive(child)),
            None => Err(Error::UnknownSchema {
                name: parent.to_string(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaContext {
    fn default() -> Self {
        Self::new()
    }
}
