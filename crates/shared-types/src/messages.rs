//! # Broker Message Types
//!
//! The value types that flow through a publish call: the normalized message
//! envelope, per-call validation output, the processed shell, and the result
//! returned synchronously to the publisher.

use crate::entities::CameraInfo;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Raw payload shape accepted by `publish`.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Current wall-clock time as fractional epoch seconds.
#[must_use]
pub fn epoch_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// A normalized message produced by a handler's `process` step.
///
/// Immutable once constructed. The `message_id` is a v4 UUID and is never
/// reused within one broker lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    /// Registered type name this message was published under.
    pub message_type: String,
    /// Normalized payload fields.
    pub data: Payload,
    /// Envelope timestamp, fractional epoch seconds.
    pub timestamp: f64,
    /// Unique message identifier.
    pub message_id: String,
}

impl MessageData {
    /// Wrap a normalized payload into a new envelope.
    ///
    /// A numeric `timestamp` field in the payload is adopted as the envelope
    /// timestamp; otherwise the envelope defaults to now. Non-numeric
    /// timestamps (e.g. ISO strings) stay in the payload untouched.
    #[must_use]
    pub fn new(message_type: impl Into<String>, data: Payload) -> Self {
        let timestamp = data
            .get("timestamp")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or_else(epoch_now);
        Self {
            message_type: message_type.into(),
            data,
            timestamp,
            message_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Outcome of a handler's `validate` step. Transient, one per publish call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the payload passed validation.
    pub valid: bool,
    /// Hard failures; non-empty iff `valid` is false.
    pub errors: Vec<String>,
    /// Advisory findings that do not fail the publish.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no findings.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a hard failure, marking the result invalid.
    pub fn push_error(&mut self, error: impl Into<String>) {
        self.valid = false;
        self.errors.push(error.into());
    }

    /// Record an advisory finding.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// A validated message plus processing metadata.
///
/// The camera list is populated on demand by the camera mapper, not by the
/// handler that produced this shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedMessage {
    /// The normalized envelope.
    pub original: MessageData,
    /// Whether validation ran and passed before processing.
    pub validated: bool,
    /// Cameras relevant to this message, filled in by consumers.
    pub cameras: Vec<CameraInfo>,
    /// Handler processing time in seconds.
    pub processing_time_secs: f64,
    /// Processing-stage errors, if any.
    pub errors: Vec<String>,
}

impl ProcessedMessage {
    /// Build a shell around a freshly normalized envelope.
    #[must_use]
    pub fn new(original: MessageData, processing_time_secs: f64) -> Self {
        Self {
            original,
            validated: true,
            cameras: Vec::new(),
            processing_time_secs,
            errors: Vec::new(),
        }
    }
}

/// Synchronous outcome of a publish call.
///
/// There is no silent failure path: every publish returns one of these with
/// an explicit `success` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Whether the message was validated, processed, and delivered.
    pub success: bool,
    /// Identifier of the published message; `None` when rejected before
    /// an envelope was created.
    pub message_id: Option<String>,
    /// Number of subscriber callbacks invoked without error.
    pub subscribers_notified: usize,
    /// Rejection reasons; non-empty iff `success` is false.
    pub errors: Vec<String>,
}

impl PublishResult {
    /// A successful publish.
    #[must_use]
    pub fn delivered(message_id: String, subscribers_notified: usize) -> Self {
        Self {
            success: true,
            message_id: Some(message_id),
            subscribers_notified,
            errors: Vec::new(),
        }
    }

    /// A rejected publish with the given reasons.
    #[must_use]
    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            subscribers_notified: 0,
            errors,
        }
    }
}

/// Counters exposed by the broker's `get_stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerStats {
    /// Messages accepted and delivered (including zero-subscriber publishes).
    pub messages_published: u64,
    /// Publishes rejected by validation or configuration errors.
    pub messages_failed: u64,
    /// Current total subscription count across all types.
    pub subscribers_count: usize,
}
