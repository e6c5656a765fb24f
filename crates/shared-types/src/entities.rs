//! # Camera Domain Entities
//!
//! Projections of the external camera store plus the typed vocabularies
//! (movement commands, alert severities) that handlers validate against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational status of a camera endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    /// Camera is reachable and streaming.
    Online,
    /// Camera is registered but not currently reachable.
    Offline,
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Read-only projection of a camera endpoint.
///
/// Sourced from the external camera store; the broker and its consumers
/// never mutate these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Store-assigned camera identifier.
    pub id: String,
    /// Human-readable camera name.
    pub name: String,
    /// Stream endpoint URL.
    pub url: String,
    /// Current operational status.
    pub status: CameraStatus,
    /// Movement directions this camera covers.
    pub directions: Vec<String>,
}

/// A camera row as held by the external store.
///
/// Carries the enablement flag that is filtered out of the `CameraInfo`
/// projection handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// The consumer-facing projection.
    pub info: CameraInfo,
    /// Disabled cameras are excluded from every mapping result.
    pub enabled: bool,
}

/// An angle interval mapped to a set of cameras.
///
/// Intervals are half-open: `start <= angle < end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    /// Store-assigned range identifier.
    pub id: String,
    /// Inclusive lower bound in degrees.
    pub start: f64,
    /// Exclusive upper bound in degrees.
    pub end: f64,
    /// Camera ids attached to this range.
    pub camera_ids: Vec<String>,
}

impl AngleRange {
    /// Check whether an angle falls inside this range.
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

/// Movement commands accepted by the direction handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionCommand {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Stationary,
}

impl DirectionCommand {
    /// All accepted command spellings, for error messages.
    pub const ALL: [Self; 5] = [
        Self::Forward,
        Self::Backward,
        Self::TurnLeft,
        Self::TurnRight,
        Self::Stationary,
    ];

    /// The wire spelling of this command.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::TurnLeft => "turn_left",
            Self::TurnRight => "turn_right",
            Self::Stationary => "stationary",
        }
    }
}

impl FromStr for DirectionCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "turn_left" => Ok(Self::TurnLeft),
            "turn_right" => Ok(Self::TurnRight),
            "stationary" => Ok(Self::Stationary),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DirectionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity levels accepted by the AI alert handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for AlertSeverity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(()),
        }
    }
}
