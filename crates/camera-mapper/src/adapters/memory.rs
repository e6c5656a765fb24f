//! In-memory camera store adapter.
//!
//! Backs tests and single-process deployments. A database-backed adapter
//! implements the same [`CameraStore`] port against the CRUD persistence
//! layer.

use crate::ports::CameraStore;
use shared_types::{AngleRange, CameraRecord, CameraStoreError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Default)]
struct StoreState {
    cameras: Vec<CameraRecord>,
    angle_ranges: Vec<AngleRange>,
}

/// Thread-safe in-memory implementation of [`CameraStore`].
///
/// Cloning yields a handle to the same underlying state. `fail_next`
/// injects transient failures to exercise the mapper's retry path.
#[derive(Clone, Default)]
pub struct InMemoryCameraStore {
    state: Arc<RwLock<StoreState>>,
    failures_remaining: Arc<AtomicU32>,
}

impl InMemoryCameraStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the camera set.
    pub fn set_cameras(&self, cameras: Vec<CameraRecord>) {
        self.write().cameras = cameras;
    }

    /// Replace the angle range set.
    pub fn set_angle_ranges(&self, ranges: Vec<AngleRange>) {
        self.write().angle_ranges = ranges;
    }

    /// Toggle a camera's enablement. No-op for unknown ids.
    pub fn set_camera_enabled(&self, camera_id: &str, enabled: bool) {
        let mut state = self.write();
        if let Some(record) = state.cameras.iter_mut().find(|r| r.info.id == camera_id) {
            record.enabled = enabled;
        }
    }

    /// Make the next `count` queries fail with `Unavailable`.
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>, CameraStoreError> {
        if self.consume_failure() {
            return Err(CameraStoreError::Unavailable("injected failure".into()));
        }
        Ok(self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn consume_failure(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok()
    }
}

impl CameraStore for InMemoryCameraStore {
    fn cameras(&self) -> Result<Vec<CameraRecord>, CameraStoreError> {
        Ok(self.read()?.cameras.clone())
    }

    fn angle_ranges(&self) -> Result<Vec<AngleRange>, CameraStoreError> {
        Ok(self.read()?.angle_ranges.clone())
    }
}
