//! Measurement units
//!
//! The host reports the program unit at open time. Only metric programs are
//! accepted by the target machine, so the rest of the crate only needs to
//! recognise and name the unit, never convert it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// G-code unit selection word for this system (G21 / G20)
    pub fn gcode(&self) -> u8 {
        match self {
            Self::Metric => 21,
            Self::Imperial => 20,
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}
