//! Store adapters for the camera mapper.

pub mod memory;
