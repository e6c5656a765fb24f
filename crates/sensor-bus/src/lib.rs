//! # Sensor Bus - Publish/Subscribe Broker for Sensor Facts
//!
//! Process-wide, thread-safe router that notifies interested consumers
//! whenever a new sensor-derived fact (a movement direction, a measured
//! angle, or an AI alert) becomes known.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐                       ┌──────────────┐
//! │  Publisher   │                       │  Subscriber  │
//! │ (motion calc)│    publish()          │  (gateway)   │
//! │              │ ──────┐               │              │
//! └──────────────┘       │               └──────────────┘
//!                        ▼                      ↑
//!                  ┌──────────────┐            │
//!                  │ MessageBroker│ ───────────┘
//!                  │ validate →   │   notify(), in
//!                  │ process →    │   subscription order
//!                  │ notify       │
//!                  └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Type isolation:** subscribers registered for one type are never
//!   invoked for another.
//! - **Ordering:** subscribers for a type fire in registration order, and a
//!   single publisher thread's messages are observed in publish order.
//! - **Failure isolation:** a panicking subscriber is caught and logged;
//!   other subscribers and the publish result are unaffected.
//!
//! Notification is synchronous on the caller's thread. A callback that
//! blocks will block its publisher for the duration; consumers needing
//! non-blocking behavior must offload work themselves before returning.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod broker;
pub mod handlers;
pub mod registry;
pub mod subscriptions;

// Re-export main types
pub use broker::{shared, shutdown_shared, MessageBroker};
pub use handlers::{CustomHandler, MessageHandler};
pub use registry::TypeRegistry;
pub use subscriptions::{SubscriberCallback, SubscriptionRegistry};

/// Registered type name for movement direction facts.
pub const DIRECTION_TYPE: &str = "direction_result";

/// Registered type name for measured angle facts.
pub const ANGLE_TYPE: &str = "angle_value";

/// Registered type name for AI alert facts (reserved).
pub const AI_ALERT_TYPE: &str = "ai_alert";
