//! # Mapping Service
//!
//! Resolves directions, angles, and alerts to camera lists, with bounded
//! retry against the store and graceful degradation to empty results.

use crate::ports::CameraStore;
use shared_types::{AngleRange, CameraInfo, CameraStoreError, Payload};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry schedule for store lookups.
///
/// Backoff doubles after each failed attempt, starting from
/// `initial_backoff`. With the defaults a fully failing lookup costs three
/// attempts and 75ms of sleep before degrading to an empty result.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per lookup, including the first.
    pub attempts: u32,
    /// Sleep before the second attempt; doubles thereafter.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    /// A policy with no sleeping, for tests.
    #[must_use]
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            initial_backoff: Duration::ZERO,
        }
    }
}

/// Translates sensor facts into camera endpoint lists.
pub struct CameraMapper {
    store: Arc<dyn CameraStore>,
    retry: RetryPolicy,
}

impl CameraMapper {
    /// Create a mapper over a store with the default retry policy.
    #[must_use]
    pub fn new(store: Arc<dyn CameraStore>) -> Self {
        Self::with_retry(store, RetryPolicy::default())
    }

    /// Create a mapper with an explicit retry policy.
    #[must_use]
    pub fn with_retry(store: Arc<dyn CameraStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// All enabled cameras covering a movement direction.
    ///
    /// Empty list (not an error) when no camera matches or the store stays
    /// unreachable through the retry budget.
    #[must_use]
    pub fn cameras_by_direction(&self, direction: &str) -> Vec<CameraInfo> {
        let Some(records) = self.fetch("cameras", || self.store.cameras()) else {
            return Vec::new();
        };
        let matched: Vec<CameraInfo> = records
            .into_iter()
            .filter(|record| record.enabled)
            .filter(|record| record.info.directions.iter().any(|d| d == direction))
            .map(|record| record.info)
            .collect();
        debug!(direction, cameras = matched.len(), "Direction mapped");
        matched
    }

    /// All enabled cameras attached to the angle range containing `angle`.
    ///
    /// Empty list when the angle falls outside every configured range.
    #[must_use]
    pub fn cameras_by_angle(&self, angle: f64) -> Vec<CameraInfo> {
        let Some(ranges) = self.fetch("angle ranges", || self.store.angle_ranges()) else {
            return Vec::new();
        };
        let Some(range) = ranges.into_iter().find(|r| r.contains(angle)) else {
            debug!(angle, "No angle range matched");
            return Vec::new();
        };

        let Some(records) = self.fetch("cameras", || self.store.cameras()) else {
            return Vec::new();
        };
        let matched: Vec<CameraInfo> = records
            .into_iter()
            .filter(|record| record.enabled)
            .filter(|record| range.camera_ids.iter().any(|id| *id == record.info.id))
            .map(|record| record.info)
            .collect();
        debug!(angle, range_id = %range.id, cameras = matched.len(), "Angle mapped");
        matched
    }

    /// Cameras relevant to an AI alert.
    ///
    /// Reserved extension point: association rules between alerts and
    /// cameras are not configured yet, so this always returns empty.
    #[must_use]
    pub fn cameras_by_alert(&self, _alert: &Payload) -> Vec<CameraInfo> {
        Vec::new()
    }

    /// Distinct directions covered by enabled cameras, sorted.
    ///
    /// Used by consumers building a full mapping snapshot.
    #[must_use]
    pub fn known_directions(&self) -> Vec<String> {
        let Some(records) = self.fetch("cameras", || self.store.cameras()) else {
            return Vec::new();
        };
        let mut directions: Vec<String> = records
            .into_iter()
            .filter(|record| record.enabled)
            .flat_map(|record| record.info.directions)
            .collect();
        directions.sort();
        directions.dedup();
        directions
    }

    /// All configured angle ranges, or empty on store failure.
    #[must_use]
    pub fn known_angle_ranges(&self) -> Vec<AngleRange> {
        self.fetch("angle ranges", || self.store.angle_ranges())
            .unwrap_or_default()
    }

    /// Run a store query through the retry budget.
    ///
    /// Returns `None` once every attempt has failed; callers degrade to an
    /// empty result.
    fn fetch<T>(
        &self,
        what: &str,
        query: impl Fn() -> Result<T, CameraStoreError>,
    ) -> Option<T> {
        let mut backoff = self.retry.initial_backoff;
        for attempt in 1..=self.retry.attempts {
            match query() {
                Ok(value) => return Some(value),
                Err(error) => {
                    warn!(what, attempt, error = %error, "Camera store lookup failed");
                    if attempt < self.retry.attempts && !backoff.is_zero() {
                        std::thread::sleep(backoff);
                        backoff *= 2;
                    }
                }
            }
        }
        warn!(
            what,
            attempts = self.retry.attempts,
            "Camera store lookup exhausted retries; degrading to empty result"
        );
        None
    }
}
