//! # Outbound Port - UpdateSink
//!
//! Where serialized camera-update frames go. Transport implementations
//! (WebSocket broadcast, SSE, test collectors) live behind this port.

use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors from pushing a frame downstream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The remote side went away.
    #[error("client disconnected: {0}")]
    Disconnected(String),

    /// The transport failed to send.
    #[error("send failed: {0}")]
    Send(String),
}

/// Consumer of serialized update frames.
///
/// A failing sink never propagates back into the broker; the gateway logs
/// and drops the frame.
pub trait UpdateSink: Send + Sync {
    /// Push one serialized frame downstream.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when delivery fails; the frame is lost.
    fn send(&self, frame: &str) -> Result<(), SinkError>;
}

/// Collecting sink for tests and diagnostics.
#[derive(Default)]
pub struct MemorySink {
    frames: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames received so far, in delivery order.
    #[must_use]
    pub fn frames(&self) -> Vec<String> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UpdateSink for MemorySink {
    fn send(&self, frame: &str) -> Result<(), SinkError> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.to_string());
        Ok(())
    }
}
