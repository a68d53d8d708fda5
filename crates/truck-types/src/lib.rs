use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Topic carrying the infrared distance readings published by the sampler.
pub const IR_DISTANCE: &str = "ir.distance";

/// A single reading routed over the bus, tagged with the topic it was
/// published on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub body: i32,
}

impl Message {
    pub fn new(topic: impl Into<String>, body: i32) -> Self {
        Self {
            topic: topic.into(),
            body,
        }
    }
}

/// Drive state chosen by the motion controller for the latest distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    /// Both drive motors are running backward at the cruise speed.
    Moving,
    /// Both drive motors have been told to stop.
    Stopped,
}

/// A command issued to a regulated motor.
///
/// Real drivers translate these into device writes; the simulated drivers in
/// `truck-hal` record them so behavior can be asserted in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum MotorCommand {
    SetSpeed(i32),
    Backward,
    Stop,
    ResetTachoCount,
    Rotate { angle: i32, immediate_return: bool },
}

/// Workspace-wide error type spanning device faults, bad readings and task
/// deployment failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TruckError {
    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("Invalid reading from {component}: {value}")]
    InvalidReading { component: String, value: f32 },

    #[error("Failed to deploy task {task}: {reason}")]
    Deployment { task: String, reason: String },

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl TruckError {
    /// Shorthand for a [`TruckError::HardwareFault`].
    pub fn hardware(component: impl Into<String>, details: impl Into<String>) -> Self {
        Self::HardwareFault {
            component: component.into(),
            details: details.into(),
        }
    }
}
