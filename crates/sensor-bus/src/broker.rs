//! # Broker Facade
//!
//! The single coordination point exposing publish/subscribe/unsubscribe and
//! runtime type registration. Owns the type registry and subscription
//! registry behind one mutex; validate/process and callback delivery run
//! outside that lock, so a slow or reentrant subscriber never blocks
//! registration operations.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──get──→ Running ──shutdown()──→ ShuttingDown ──→ Stopped
//! ```
//!
//! `Uninitialized` is the absence of an instance. After `shutdown`, calls
//! fail fast with [`BrokerError::Stopped`]; the process-wide [`shared`]
//! accessor re-initializes a fresh instance on the next call.

use crate::handlers::MessageHandler;
use crate::registry::TypeRegistry;
use crate::subscriptions::{deliver, SubscriberCallback, SubscriptionRegistry};
use shared_types::{BrokerError, BrokerStats, MessageData, Payload, PublishResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Broker lifecycle states once an instance exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    ShuttingDown,
    Stopped,
}

/// State guarded by the single broker mutex.
///
/// Keeping both registries behind one lock keeps type registration and
/// subscription state mutually consistent under concurrent callers.
struct BrokerInner {
    lifecycle: Lifecycle,
    types: TypeRegistry,
    subscriptions: SubscriptionRegistry,
}

/// Thread-safe publish/subscribe router for sensor facts.
///
/// All operations execute synchronously on the caller's thread; there is no
/// internal event loop or background worker. Construct directly for test
/// isolation, or use [`shared`] for the process-wide instance.
pub struct MessageBroker {
    inner: Mutex<BrokerInner>,
    messages_published: AtomicU64,
    messages_failed: AtomicU64,
}

impl MessageBroker {
    /// Create a broker with the built-in direction, angle, and alert
    /// handlers registered.
    #[must_use]
    pub fn new() -> Self {
        let mut types = TypeRegistry::new();
        types.register(MessageHandler::Direction);
        types.register(MessageHandler::Angle);
        types.register(MessageHandler::AiAlert);

        Self {
            inner: Mutex::new(BrokerInner {
                lifecycle: Lifecycle::Running,
                types,
                subscriptions: SubscriptionRegistry::new(),
            }),
            messages_published: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
        }
    }

    /// Create a broker with no handlers registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Mutex::new(BrokerInner {
                lifecycle: Lifecycle::Running,
                types: TypeRegistry::new(),
                subscriptions: SubscriptionRegistry::new(),
            }),
            messages_published: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
        }
    }

    // Callbacks never run under the lock, so poisoning can only come from a
    // panic in registry bookkeeping; recover the guard rather than cascade.
    fn lock(&self) -> MutexGuard<'_, BrokerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate, process, and deliver one message.
    ///
    /// Returns a [`PublishResult`] in every case; there is no silent failure
    /// path. Validation and configuration failures are rejected without
    /// retry and without notifying any subscriber.
    pub fn publish(&self, type_name: &str, data: Payload) -> PublishResult {
        let handler = {
            let inner = self.lock();
            if inner.lifecycle != Lifecycle::Running {
                drop(inner);
                self.messages_failed.fetch_add(1, Ordering::Relaxed);
                return PublishResult::rejected(vec![BrokerError::Stopped.to_string()]);
            }
            let resolved = inner.types.resolve(type_name).cloned();
            drop(inner);
            match resolved {
                Some(handler) => handler,
                None => {
                    self.messages_failed.fetch_add(1, Ordering::Relaxed);
                    return PublishResult::rejected(vec![
                        BrokerError::UnknownType(type_name.to_string()).to_string(),
                    ]);
                }
            }
        };

        let validation = handler.validate(&data);
        for warning in &validation.warnings {
            warn!(message_type = type_name, warning = %warning, "Validation warning");
        }
        if !validation.valid {
            self.messages_failed.fetch_add(1, Ordering::Relaxed);
            debug!(
                message_type = type_name,
                errors = ?validation.errors,
                "Publish rejected by validation"
            );
            return PublishResult::rejected(validation.errors);
        }

        let processed = handler.process(data);
        let message = processed.original;

        // Snapshot inside the lock, deliver outside it.
        let snapshot = self.lock().subscriptions.snapshot(type_name);
        let notified = deliver(&snapshot, &message);

        self.messages_published.fetch_add(1, Ordering::Relaxed);
        debug!(
            message_type = type_name,
            message_id = %message.message_id,
            subscribers = notified,
            "Message published"
        );
        PublishResult::delivered(message.message_id, notified)
    }

    /// Register a subscriber callback for a type name.
    ///
    /// The type does not need a registered handler yet; the callback simply
    /// receives nothing until a publish for that type succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Stopped`] after shutdown.
    pub fn subscribe(
        &self,
        type_name: &str,
        callback: SubscriberCallback,
    ) -> Result<String, BrokerError> {
        let mut inner = self.lock();
        if inner.lifecycle != Lifecycle::Running {
            return Err(BrokerError::Stopped);
        }
        Ok(inner.subscriptions.subscribe(type_name, callback))
    }

    /// Convenience wrapper over [`Self::subscribe`] for plain closures.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Stopped`] after shutdown.
    pub fn subscribe_fn<F>(&self, type_name: &str, callback: F) -> Result<String, BrokerError>
    where
        F: Fn(&MessageData) + Send + Sync + 'static,
    {
        self.subscribe(type_name, Arc::new(callback))
    }

    /// Remove a subscription by id. Idempotent; false if not found.
    pub fn unsubscribe(&self, type_name: &str, subscription_id: &str) -> bool {
        self.lock()
            .subscriptions
            .unsubscribe(type_name, subscription_id)
    }

    /// Register or replace the handler for its type name at runtime.
    ///
    /// Never disturbs existing subscriptions or other handlers.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Stopped`] after shutdown.
    pub fn register_message_type(&self, handler: MessageHandler) -> Result<(), BrokerError> {
        let mut inner = self.lock();
        if inner.lifecycle != Lifecycle::Running {
            return Err(BrokerError::Stopped);
        }
        inner.types.register(handler);
        Ok(())
    }

    /// Remove the handler for a type name; subscriptions persist.
    ///
    /// Returns whether a mapping existed.
    pub fn unregister_message_type(&self, type_name: &str) -> bool {
        self.lock().types.unregister(type_name)
    }

    /// All currently registered type names, sorted.
    #[must_use]
    pub fn list_types(&self) -> Vec<String> {
        self.lock().types.list_types()
    }

    /// Subscriber count for one type, or the total across all types.
    #[must_use]
    pub fn subscriber_count(&self, type_name: Option<&str>) -> usize {
        let inner = self.lock();
        match type_name {
            Some(name) => inner.subscriptions.count_for(name),
            None => inner.subscriptions.total(),
        }
    }

    /// Current broker counters.
    #[must_use]
    pub fn get_stats(&self) -> BrokerStats {
        BrokerStats {
            messages_published: self.messages_published.load(Ordering::Relaxed),
            messages_failed: self.messages_failed.load(Ordering::Relaxed),
            subscribers_count: self.lock().subscriptions.total(),
        }
    }

    /// Whether this instance still accepts calls.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().lifecycle == Lifecycle::Running
    }

    /// Stop the broker: later publishes fail fast, all subscriptions and
    /// handler registrations are released.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.lifecycle == Lifecycle::Stopped {
            return;
        }
        inner.lifecycle = Lifecycle::ShuttingDown;
        let dropped_subscriptions = inner.subscriptions.total();
        inner.subscriptions.clear();
        inner.types.clear();
        inner.lifecycle = Lifecycle::Stopped;
        info!(dropped_subscriptions, "Broker shut down");
    }
}

impl Default for MessageBroker {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PROCESS-WIDE SHARED INSTANCE
// =============================================================================

static SHARED: Mutex<Option<Arc<MessageBroker>>> = Mutex::new(None);

/// Get the process-wide broker, lazily constructing it on first use.
///
/// Every call between initialization and [`shutdown_shared`] returns the
/// same instance. Tests that need isolation should construct
/// [`MessageBroker::new`] directly instead.
#[must_use]
pub fn shared() -> Arc<MessageBroker> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(|| {
        info!("Shared broker initialized");
        Arc::new(MessageBroker::new())
    })
    .clone()
}

/// Shut down and release the process-wide broker.
///
/// A subsequent [`shared`] call re-initializes a fresh instance.
pub fn shutdown_shared() {
    let released = SHARED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if let Some(broker) = released {
        broker.shutdown();
    }
}
