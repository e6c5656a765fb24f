//! # Subscription Registry and Notification Pipeline
//!
//! Ordered per-type subscriber lists with stable uuid identifiers, plus the
//! guarded delivery step that isolates failing callbacks.
//!
//! The registry carries no lock of its own; the broker facade snapshots the
//! subscriber list for a type under its mutex, releases it, and only then
//! invokes callbacks. A subscriber added mid-notify may miss the in-flight
//! message; no durability is promised.

use shared_types::MessageData;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Callback invoked once per successfully published message of its type.
pub type SubscriberCallback = Arc<dyn Fn(&MessageData) + Send + Sync>;

/// A registered subscriber entry.
#[derive(Clone)]
pub struct Subscription {
    /// Unique identifier handed back by `subscribe`, used for removal.
    pub subscription_id: String,
    /// Type name this subscription is keyed under.
    pub message_type: String,
    /// The consumer callback.
    pub callback: SubscriberCallback,
}

/// Mapping from type name to its ordered subscriber list.
#[derive(Default)]
pub struct SubscriptionRegistry {
    by_type: HashMap<String, Vec<Subscription>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber to the list for a type.
    ///
    /// Subscriptions may exist before any handler is registered for the
    /// type; they simply receive nothing until a publish succeeds.
    pub fn subscribe(&mut self, message_type: &str, callback: SubscriberCallback) -> String {
        let subscription_id = uuid::Uuid::new_v4().to_string();
        self.by_type
            .entry(message_type.to_string())
            .or_default()
            .push(Subscription {
                subscription_id: subscription_id.clone(),
                message_type: message_type.to_string(),
                callback,
            });
        debug!(message_type, subscription_id = %subscription_id, "Subscription created");
        subscription_id
    }

    /// Remove a subscriber by id. Idempotent; returns false if not found.
    pub fn unsubscribe(&mut self, message_type: &str, subscription_id: &str) -> bool {
        let Some(list) = self.by_type.get_mut(message_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|sub| sub.subscription_id != subscription_id);
        let removed = list.len() < before;
        if list.is_empty() {
            self.by_type.remove(message_type);
        }
        debug!(message_type, subscription_id, removed, "Unsubscribe");
        removed
    }

    /// Copy the current subscriber list for a type, in registration order.
    ///
    /// Taken under the broker lock so delivery can run without holding it.
    #[must_use]
    pub fn snapshot(&self, message_type: &str) -> Vec<Subscription> {
        self.by_type.get(message_type).cloned().unwrap_or_default()
    }

    /// Subscriber count for one type.
    #[must_use]
    pub fn count_for(&self, message_type: &str) -> usize {
        self.by_type.get(message_type).map_or(0, Vec::len)
    }

    /// Total subscriber count across all types.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.by_type.clear();
    }
}

/// Invoke every snapshot entry once, in order, isolating failures.
///
/// A panic inside one callback is caught and logged with the subscriber and
/// message identifiers; iteration continues with the next subscriber.
/// Returns the number of callbacks that completed without panicking.
#[must_use]
pub fn deliver(snapshot: &[Subscription], message: &MessageData) -> usize {
    let mut delivered = 0;
    for subscription in snapshot {
        let outcome = catch_unwind(AssertUnwindSafe(|| (subscription.callback)(message)));
        match outcome {
            Ok(()) => delivered += 1,
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                error!(
                    subscription_id = %subscription.subscription_id,
                    message_type = %subscription.message_type,
                    message_id = %message.message_id,
                    reason,
                    "Subscriber callback failed; continuing with remaining subscribers"
                );
            }
        }
    }
    delivered
}

fn panic_reason(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
