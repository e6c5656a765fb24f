//! # Read-Side Mapping Queries
//!
//! Direct lookups against the camera mapper, used by the HTTP query surface
//! and by the gateway's connect-time snapshot. These never go through
//! publish/subscribe.

use crate::gateway::CameraEndpoint;
use camera_mapper::CameraMapper;
use serde::{Deserialize, Serialize};
use shared_types::epoch_now;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One angle range and the cameras currently attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRangeMapping {
    /// Store-assigned range identifier.
    pub range_id: String,
    /// Inclusive lower bound in degrees.
    pub start: f64,
    /// Exclusive upper bound in degrees.
    pub end: f64,
    /// Enabled cameras attached to the range.
    pub cameras: Vec<CameraEndpoint>,
}

/// Full current mapping state, sent to clients on connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSnapshot {
    /// Enabled cameras per covered direction.
    pub directions: BTreeMap<String, Vec<CameraEndpoint>>,
    /// All configured angle ranges with their cameras.
    pub angle_ranges: Vec<AngleRangeMapping>,
    /// Snapshot build time, fractional epoch seconds.
    pub timestamp: f64,
}

/// Read-side service over the camera mapper.
pub struct MappingQuery {
    mapper: Arc<CameraMapper>,
}

impl MappingQuery {
    /// Create a query service over a mapper.
    #[must_use]
    pub fn new(mapper: Arc<CameraMapper>) -> Self {
        Self { mapper }
    }

    /// Enabled cameras covering a direction.
    #[must_use]
    pub fn by_direction(&self, direction: &str) -> Vec<CameraEndpoint> {
        self.mapper
            .cameras_by_direction(direction)
            .into_iter()
            .map(CameraEndpoint::from)
            .collect()
    }

    /// Enabled cameras for the range containing an angle.
    #[must_use]
    pub fn by_angle(&self, angle: f64) -> Vec<CameraEndpoint> {
        self.mapper
            .cameras_by_angle(angle)
            .into_iter()
            .map(CameraEndpoint::from)
            .collect()
    }

    /// Build the full mapping snapshot: every known direction and every
    /// configured angle range.
    #[must_use]
    pub fn snapshot(&self) -> MappingSnapshot {
        let directions = self
            .mapper
            .known_directions()
            .into_iter()
            .map(|direction| {
                let cameras = self.by_direction(&direction);
                (direction, cameras)
            })
            .collect();

        let angle_ranges = self
            .mapper
            .known_angle_ranges()
            .into_iter()
            .map(|range| {
                // Probe at the inclusive lower bound; any point inside the
                // half-open interval resolves the same camera set.
                let cameras = self.by_angle(range.start);
                AngleRangeMapping {
                    range_id: range.id,
                    start: range.start,
                    end: range.end,
                    cameras,
                }
            })
            .collect();

        MappingSnapshot {
            directions,
            angle_ranges,
            timestamp: epoch_now(),
        }
    }
}
