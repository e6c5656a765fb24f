//! # Camera Mapper
//!
//! Translates a published sensor fact (movement direction, measured angle,
//! or AI alert) into the list of camera endpoints relevant to it, by
//! querying an external camera store through the [`ports::CameraStore`]
//! outbound port.
//!
//! ## Degradation Contract
//!
//! Store failures are retried with bounded backoff and then contained: a
//! lookup that keeps failing returns an empty list instead of propagating,
//! so a flaky store degrades to "no camera found" rather than crashing a
//! subscriber.
//!
//! No caching: every call performs a fresh lookup so camera enable/disable
//! state is always current.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod mapper;
pub mod ports;

pub use adapters::memory::InMemoryCameraStore;
pub use mapper::{CameraMapper, RetryPolicy};
pub use ports::CameraStore;
