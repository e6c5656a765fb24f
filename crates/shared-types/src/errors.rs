//! # Error Types
//!
//! The error taxonomy shared across the broker and mapping crates.
//!
//! Validation failures are NOT errors in this taxonomy: they are surfaced in
//! `PublishResult.errors` as values. Subscriber callback failures are caught
//! and logged at the notification boundary and never reach the publisher.

use thiserror::Error;

/// Configuration and lifecycle errors returned by broker operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// No handler registered under this type name.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// The broker has been shut down; calls fail fast.
    #[error("broker stopped")]
    Stopped,
}

/// Failures from the external camera store.
///
/// Contained within the camera mapper boundary: after bounded retries the
/// mapper degrades to an empty camera list rather than propagating these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CameraStoreError {
    /// The store could not be reached.
    #[error("camera store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the query.
    #[error("camera store query failed: {0}")]
    Query(String),
}
