//! # CamView Test Suite
//!
//! Unified test crate containing cross-crate integration flows:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── broker_flows.rs   # publish/subscribe contracts end to end
//!     └── gateway_flows.rs  # broker → mapper → gateway → sink
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p camview-tests
//!
//! # One flow
//! cargo test -p camview-tests broker_flows
//! ```

pub mod integration;
