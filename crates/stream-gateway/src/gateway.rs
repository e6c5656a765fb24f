//! # Streaming Gateway
//!
//! Subscribes to every registered message type on the broker and turns each
//! delivered message into a serialized camera-list update frame. Camera
//! lookup happens here, on demand per delivered message, never inside the
//! broker.

use crate::query::MappingQuery;
use crate::sink::{SinkError, UpdateSink};
use camera_mapper::CameraMapper;
use sensor_bus::{MessageBroker, AI_ALERT_TYPE, ANGLE_TYPE, DIRECTION_TYPE};
use serde::{Deserialize, Serialize};
use shared_types::{BrokerError, CameraInfo, MessageData};
use std::sync::Arc;
use tracing::{debug, warn};

/// Wire projection of a camera, without the directions set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraEndpoint {
    /// Store-assigned camera identifier.
    pub id: String,
    /// Human-readable camera name.
    pub name: String,
    /// Stream endpoint URL.
    pub url: String,
    /// Current operational status.
    pub status: shared_types::CameraStatus,
}

impl From<CameraInfo> for CameraEndpoint {
    fn from(info: CameraInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            url: info.url,
            status: info.status,
        }
    }
}

/// One rebroadcast frame: the fact type, its matching cameras, and the
/// message timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraUpdate {
    /// Message type the update was derived from.
    #[serde(rename = "type")]
    pub message_type: String,
    /// Cameras relevant to the fact.
    pub cameras: Vec<CameraEndpoint>,
    /// Envelope timestamp of the originating message.
    pub timestamp: f64,
}

/// Handle over the gateway's broker subscriptions, for later detachment.
#[derive(Debug, Clone, Default)]
pub struct GatewayAttachment {
    /// `(message_type, subscription_id)` pairs created by `attach`.
    pub subscriptions: Vec<(String, String)>,
}

/// Rebroadcasts camera-list updates for every published sensor fact.
pub struct StreamGateway {
    mapper: Arc<CameraMapper>,
    sink: Arc<dyn UpdateSink>,
}

impl StreamGateway {
    /// Create a gateway over a mapper and a downstream sink.
    #[must_use]
    pub fn new(mapper: Arc<CameraMapper>, sink: Arc<dyn UpdateSink>) -> Self {
        Self { mapper, sink }
    }

    /// Subscribe to every type currently registered on the broker.
    ///
    /// Types registered after this call are not picked up; call `attach`
    /// again (after `detach`) to refresh.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Stopped`] if the broker has shut down.
    pub fn attach(&self, broker: &MessageBroker) -> Result<GatewayAttachment, BrokerError> {
        let mut attachment = GatewayAttachment::default();
        for message_type in broker.list_types() {
            let mapper = self.mapper.clone();
            let sink = self.sink.clone();
            let subscription_id = broker.subscribe_fn(&message_type, move |message| {
                forward(&mapper, sink.as_ref(), message);
            })?;
            attachment.subscriptions.push((message_type, subscription_id));
        }
        Ok(attachment)
    }

    /// Remove the subscriptions created by a previous `attach`.
    pub fn detach(&self, broker: &MessageBroker, attachment: &GatewayAttachment) {
        for (message_type, subscription_id) in &attachment.subscriptions {
            broker.unsubscribe(message_type, subscription_id);
        }
    }

    /// Send the connect-time snapshot: current mappings for every known
    /// direction and angle range.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the downstream send fails.
    pub fn send_snapshot(&self) -> Result<(), SinkError> {
        let snapshot = MappingQuery::new(self.mapper.clone()).snapshot();
        let frame = serde_json::to_string(&snapshot)
            .map_err(|e| SinkError::Send(format!("snapshot serialization: {e}")))?;
        self.sink.send(&frame)
    }
}

/// Map one delivered message to cameras and push the frame downstream.
///
/// Sink failures are logged and dropped; they never propagate back into
/// the broker's notify loop.
fn forward(mapper: &CameraMapper, sink: &dyn UpdateSink, message: &MessageData) {
    let Some(update) = update_for(mapper, message) else {
        debug!(
            message_type = %message.message_type,
            message_id = %message.message_id,
            "No camera mapping for message type; frame skipped"
        );
        return;
    };

    let frame = match serde_json::to_string(&update) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(message_id = %message.message_id, %error, "Frame serialization failed");
            return;
        }
    };

    if let Err(error) = sink.send(&frame) {
        warn!(
            message_id = %message.message_id,
            %error,
            "Downstream send failed; frame dropped"
        );
    }
}

/// Build the update frame for one message, if its type has a mapping rule.
fn update_for(mapper: &CameraMapper, message: &MessageData) -> Option<CameraUpdate> {
    let cameras = match message.message_type.as_str() {
        DIRECTION_TYPE => {
            let command = message.data.get("command")?.as_str()?;
            mapper.cameras_by_direction(command)
        }
        ANGLE_TYPE => {
            let angle = message.data.get("angle")?.as_f64()?;
            mapper.cameras_by_angle(angle)
        }
        AI_ALERT_TYPE => mapper.cameras_by_alert(&message.data),
        _ => return None,
    };

    Some(CameraUpdate {
        message_type: message.message_type.clone(),
        cameras: cameras.into_iter().map(CameraEndpoint::from).collect(),
        timestamp: message.timestamp,
    })
}
