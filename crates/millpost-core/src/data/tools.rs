//! Tool definitions
//!
//! The host supplies one tool per section. The post-processor only needs its
//! identity (for tool change detection and the operator prompt) and the
//! spindle settings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spindle rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpindleDirection {
    /// Clockwise (M3)
    #[default]
    Clockwise,
    /// Counter-clockwise (M4)
    CounterClockwise,
}

impl SpindleDirection {
    /// M-code starting the spindle in this direction
    pub fn mcode(&self) -> u8 {
        match self {
            Self::Clockwise => 3,
            Self::CounterClockwise => 4,
        }
    }
}

impl fmt::Display for SpindleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "CW"),
            Self::CounterClockwise => write!(f, "CCW"),
        }
    }
}

/// Cutting tool as seen by the post-processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool number
    pub number: u32,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Target spindle speed in RPM
    pub spindle_rpm: f64,
    /// Rotation direction
    #[serde(default)]
    pub direction: SpindleDirection,
}

impl Tool {
    /// Create a clockwise tool
    pub fn new(number: u32, description: impl Into<String>, spindle_rpm: f64) -> Self {
        Self {
            number,
            description: description.into(),
            spindle_rpm,
            direction: SpindleDirection::Clockwise,
        }
    }

    /// Same physical tool (tool changes are detected by number only)
    pub fn same_tool(&self, other: &Tool) -> bool {
        self.number == other.number
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "T{}", self.number)
        } else {
            write!(f, "T{} {}", self.number, self.description)
        }
    }
}
