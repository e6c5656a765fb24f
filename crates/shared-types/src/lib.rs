//! # Shared Types Crate
//!
//! This crate contains all domain types shared between the broker core
//! (`sensor-bus`), the camera mapping layer (`camera-mapper`), and the
//! streaming gateway (`stream-gateway`).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Explicit Results**: Validation and publish outcomes are returned as
//!   values (`ValidationResult`, `PublishResult`), never signaled through
//!   exceptions or panics across crate boundaries.
//! - **Read-Only Projections**: `CameraInfo` is a projection of the external
//!   camera store; the broker never owns or mutates camera records.

pub mod entities;
pub mod errors;
pub mod messages;

pub use entities::*;
pub use errors::*;
pub use messages::*;
