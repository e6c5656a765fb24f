//! # Type Registry
//!
//! Runtime map from type name to handler. Registration is open: new types
//! can be added or replaced at any point without disturbing existing
//! handlers or subscriptions.
//!
//! The registry itself carries no lock; the broker facade guards it and the
//! subscription registry behind one shared mutex so the two stay consistent
//! under concurrent registration.

use crate::handlers::MessageHandler;
use std::collections::HashMap;
use tracing::debug;

/// Mapping from type name to its validate/process strategy.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    handlers: HashMap<String, MessageHandler>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the handler for its type name.
    pub fn register(&mut self, handler: MessageHandler) {
        let type_name = handler.type_name().to_string();
        let replaced = self.handlers.insert(type_name.clone(), handler).is_some();
        debug!(message_type = %type_name, replaced, "Handler registered");
    }

    /// Remove the handler for a type name.
    ///
    /// Returns whether a mapping existed. Subscriptions for the type are
    /// untouched, so re-registration does not require re-subscribing.
    pub fn unregister(&mut self, type_name: &str) -> bool {
        let removed = self.handlers.remove(type_name).is_some();
        debug!(message_type = %type_name, removed, "Handler unregistered");
        removed
    }

    /// Look up the handler for a type name.
    ///
    /// Handlers are stateless, so callers clone the resolved handler and run
    /// validate/process outside the broker lock.
    #[must_use]
    pub fn resolve(&self, type_name: &str) -> Option<&MessageHandler> {
        self.handlers.get(type_name)
    }

    /// All currently registered type names.
    #[must_use]
    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    /// Drop every registered handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
