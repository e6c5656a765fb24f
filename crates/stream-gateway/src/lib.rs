//! # Stream Gateway
//!
//! The broker's downstream consumers, modeled as adapters so the actual
//! transport (WebSocket, SSE, whatever the deployment uses) stays out of
//! the core:
//!
//! - [`gateway::StreamGateway`] subscribes to every registered message type
//!   and rebroadcasts camera-list updates as serialized frames through an
//!   [`sink::UpdateSink`].
//! - [`query::MappingQuery`] is the read-side service an HTTP endpoint
//!   calls to fetch current mappings directly, bypassing publish/subscribe.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod gateway;
pub mod query;
pub mod sink;

pub use gateway::{CameraEndpoint, CameraUpdate, GatewayAttachment, StreamGateway};
pub use query::{AngleRangeMapping, MappingQuery, MappingSnapshot};
pub use sink::{MemorySink, SinkError, UpdateSink};
