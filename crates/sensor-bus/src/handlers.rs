//! # Message Type Handlers
//!
//! Per-type validate/process strategies. Handlers form a closed set of
//! variants selected by type name at publish time; they are stateless and
//! safe to share across threads.
//!
//! `validate` is a pure check of required fields and domain ranges.
//! `process` assumes validation passed and wraps the payload into a
//! normalized [`MessageData`] envelope.

use shared_types::{
    AlertSeverity, DirectionCommand, MessageData, Payload, ProcessedMessage, ValidationResult,
};
use std::str::FromStr;
use std::time::Instant;

use crate::{AI_ALERT_TYPE, ANGLE_TYPE, DIRECTION_TYPE};

/// Inclusive lower bound for accepted angles, in degrees.
pub const ANGLE_MIN: f64 = -180.0;

/// Exclusive upper bound for accepted angles, in degrees.
///
/// The source instrumentation reports both signed (-180..180) and unsigned
/// (0..360) angles, so the accepted interval is the union [-180, 360).
pub const ANGLE_MAX: f64 = 360.0;

/// Per-type validation and processing strategy.
#[derive(Debug, Clone)]
pub enum MessageHandler {
    /// Movement direction facts (`direction_result`).
    Direction,
    /// Measured angle facts (`angle_value`).
    Angle,
    /// AI alert facts (`ai_alert`, reserved).
    AiAlert,
    /// Runtime-registered type with a configurable field contract.
    Custom(CustomHandler),
}

/// Handler for types registered at runtime.
///
/// Validates presence of the configured required fields; everything else in
/// the payload passes through untouched.
#[derive(Debug, Clone)]
pub struct CustomHandler {
    type_name: String,
    required_fields: Vec<String>,
}

impl CustomHandler {
    /// Create a handler for a runtime-registered type.
    #[must_use]
    pub fn new(type_name: impl Into<String>, required_fields: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            required_fields,
        }
    }
}

impl MessageHandler {
    /// Stable identifier used as registry and subscription key.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Direction => DIRECTION_TYPE,
            Self::Angle => ANGLE_TYPE,
            Self::AiAlert => AI_ALERT_TYPE,
            Self::Custom(custom) => &custom.type_name,
        }
    }

    /// Check required fields and domain ranges for this type.
    ///
    /// Pure function: no side effects, no payload mutation.
    #[must_use]
    pub fn validate(&self, data: &Payload) -> ValidationResult {
        let mut result = ValidationResult::ok();

        match self {
            Self::Direction => validate_direction(data, &mut result),
            Self::Angle => validate_angle(data, &mut result),
            Self::AiAlert => validate_alert(data, &mut result),
            Self::Custom(custom) => {
                for field in &custom.required_fields {
                    if !data.contains_key(field.as_str()) {
                        result.push_error(format!("missing required field: {field}"));
                    }
                }
            }
        }

        if !data.contains_key("timestamp") {
            result.push_warning("timestamp absent, defaulting to now");
        }

        result
    }

    /// Normalize a validated payload into a [`ProcessedMessage`] shell.
    ///
    /// The camera list on the returned shell is empty; mapping to cameras is
    /// performed on demand by consumers, not by handlers.
    #[must_use]
    pub fn process(&self, data: Payload) -> ProcessedMessage {
        let started = Instant::now();
        let message = MessageData::new(self.type_name(), data);
        ProcessedMessage::new(message, started.elapsed().as_secs_f64())
    }
}

fn validate_direction(data: &Payload, result: &mut ValidationResult) {
    match data.get("command") {
        None => result.push_error("missing required field: command"),
        Some(value) => match value.as_str() {
            None => result.push_error("field command must be a string"),
            Some(raw) => {
                if DirectionCommand::from_str(raw).is_err() {
                    let allowed: Vec<&str> =
                        DirectionCommand::ALL.iter().map(|c| c.as_str()).collect();
                    result.push_error(format!(
                        "unknown command {raw:?}, expected one of: {}",
                        allowed.join(", ")
                    ));
                }
            }
        },
    }

    for field in ["intensity", "angular_intensity"] {
        if let Some(value) = data.get(field) {
            match value.as_f64() {
                None => result.push_error(format!("field {field} must be numeric")),
                Some(v) if v < 0.0 => {
                    result.push_warning(format!("field {field} is negative: {v}"));
                }
                Some(_) => {}
            }
        }
    }
}

fn validate_angle(data: &Payload, result: &mut ValidationResult) {
    match data.get("angle") {
        None => result.push_error("missing required field: angle"),
        Some(value) => match value.as_f64() {
            None => result.push_error("field angle must be numeric"),
            Some(angle) if !(ANGLE_MIN..ANGLE_MAX).contains(&angle) => {
                result.push_error(format!(
                    "angle {angle} out of range [{ANGLE_MIN}, {ANGLE_MAX})"
                ));
            }
            Some(_) => {}
        },
    }
}

fn validate_alert(data: &Payload, result: &mut ValidationResult) {
    match data.get("alert_type") {
        None => result.push_error("missing required field: alert_type"),
        Some(value) => {
            if value.as_str().is_none() {
                result.push_error("field alert_type must be a string");
            }
        }
    }

    match data.get("severity") {
        None => result.push_error("missing required field: severity"),
        Some(value) => match value.as_str() {
            None => result.push_error("field severity must be a string"),
            Some(raw) => {
                if AlertSeverity::from_str(raw).is_err() {
                    result.push_error(format!(
                        "unknown severity {raw:?}, expected one of: low, medium, high, critical"
                    ));
                }
            }
        },
    }

    if let Some(metadata) = data.get("metadata") {
        if !metadata.is_object() {
            result.push_error("field metadata must be an object");
        }
    }
}
