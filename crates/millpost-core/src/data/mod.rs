//! Data models handed from the CAM host to the post-processor
//!
//! This module provides:
//! - Full and partial XYZ positions
//! - Machine descriptor and travel limits
//! - Program and section information
//! - Abstract commands, movement types, and radius compensation modes
//! - Tool definitions

pub mod commands;
pub mod program;
pub mod tools;

pub use commands::{Command, MovementType, RadiusCompensation};
pub use program::{ProgramInfo, SectionInfo};

use serde::{Deserialize, Serialize};

/// Absolute XYZ position in millimetres (workplane coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Overwrite the axes present in `target`, keeping the others
    pub fn apply(&mut self, target: &PartialPosition) {
        if let Some(x) = target.x {
            self.x = x;
        }
        if let Some(y) = target.y {
            self.y = y;
        }
        if let Some(z) = target.z {
            self.z = z;
        }
    }
}

/// Position with optional axes
///
/// Motion targets from the host only carry the axes that are defined for the
/// move; absent axes are never formatted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialPosition {
    /// X-axis position (if specified)
    #[serde(default)]
    pub x: Option<f64>,
    /// Y-axis position (if specified)
    #[serde(default)]
    pub y: Option<f64>,
    /// Z-axis position (if specified)
    #[serde(default)]
    pub z: Option<f64>,
}

impl PartialPosition {
    /// Create a partial position with all three axes set
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Check if no axis is specified
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// Overwrite the axes specified in `other`
    pub fn merge(&mut self, other: &PartialPosition) {
        self.x = other.x.or(self.x);
        self.y = other.y.or(self.y);
        self.z = other.z.or(self.z);
    }

    /// Full position, if every axis is known
    pub fn complete(&self) -> Option<Position> {
        Some(Position::new(self.x?, self.y?, self.z?))
    }
}

impl From<Position> for PartialPosition {
    fn from(pos: Position) -> Self {
        Self::xyz(pos.x, pos.y, pos.z)
    }
}

/// Travel range of one axis in machine coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Minimum machine coordinate
    pub min: f64,
    /// Maximum machine coordinate
    pub max: f64,
}

impl AxisRange {
    /// Create a new range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Length of travel
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Machine travel limits as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineLimits {
    /// X-axis travel
    pub x: AxisRange,
    /// Y-axis travel
    pub y: AxisRange,
    /// Z-axis travel
    pub z: AxisRange,
}

impl Default for MachineLimits {
    fn default() -> Self {
        // Homed at the top of Z, travel below zero.
        Self {
            x: AxisRange::new(0.0, 830.0),
            y: AxisRange::new(0.0, 830.0),
            z: AxisRange::new(-95.0, 0.0),
        }
    }
}

/// Machine descriptor (vendor/model and travel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MachineDescriptor {
    /// Machine vendor
    pub vendor: String,
    /// Machine model
    pub model: String,
    /// Travel limits
    pub limits: MachineLimits,
}

impl MachineDescriptor {
    /// Human-readable "vendor model" label, empty when neither is known
    pub fn label(&self) -> String {
        format!("{} {}", self.vendor.trim(), self.model.trim())
            .trim()
            .to_string()
    }
}
