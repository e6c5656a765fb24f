//! # Outbound Port - CameraStore
//!
//! Read-only access to the external camera persistence layer. The mapper
//! never writes through this port; enablement and status changes are owned
//! by the CRUD side of the system.

use shared_types::{AngleRange, CameraRecord, CameraStoreError};

/// Read-only view of the external camera store.
///
/// Implementations must be safe to call from multiple threads; the mapper
/// issues a fresh query per lookup.
pub trait CameraStore: Send + Sync {
    /// All camera records, including disabled ones.
    ///
    /// # Errors
    ///
    /// Returns [`CameraStoreError`] when the store is unreachable or the
    /// query fails. The mapper retries and then degrades to an empty list.
    fn cameras(&self) -> Result<Vec<CameraRecord>, CameraStoreError>;

    /// All configured angle ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CameraStoreError`] when the store is unreachable or the
    /// query fails.
    fn angle_ranges(&self) -> Result<Vec<AngleRange>, CameraStoreError>;
}
