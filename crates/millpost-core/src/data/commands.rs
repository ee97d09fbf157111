//! Abstract commands and motion classifications
//!
//! These enumerations mirror the identifiers the CAM host passes to the
//! command, movement, and radius compensation callbacks. Which of them the
//! machine can act on is decided by the post-processor, not here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstract machine command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Program stop
    Stop,
    /// Optional program stop
    OptionalStop,
    /// Program end
    End,
    /// Spindle clockwise
    SpindleClockwise,
    /// Spindle counter-clockwise
    SpindleCounterclockwise,
    /// Start spindle in the current tool's direction
    StartSpindle,
    /// Stop spindle
    StopSpindle,
    /// Orient spindle
    OrientateSpindle,
    /// Load tool
    LoadTool,
    /// Coolant on
    CoolantOn,
    /// Coolant off
    CoolantOff,
    /// Lock multi-axis
    LockMultiAxis,
    /// Unlock multi-axis
    UnlockMultiAxis,
    /// Exact stop
    ExactStop,
    /// Tool breakage control
    BreakControl,
    /// Tool length measurement
    ToolMeasure,
    /// Calibrate
    Calibrate,
    /// Verify
    Verify,
    /// Clean
    Clean,
    /// Open door
    OpenDoor,
    /// Close door
    CloseDoor,
    /// Pallet change
    PalletChange,
    /// Open chuck
    ChuckOpen,
    /// Close chuck
    ChuckClose,
    /// Probe on
    ProbeOn,
    /// Probe off
    ProbeOff,
    /// Power on
    PowerOn,
    /// Power off
    PowerOff,
    /// Start chip transport
    StartChipTransport,
    /// Stop chip transport
    StopChipTransport,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stop => "stop",
            Self::OptionalStop => "optional stop",
            Self::End => "end",
            Self::SpindleClockwise => "spindle clockwise",
            Self::SpindleCounterclockwise => "spindle counterclockwise",
            Self::StartSpindle => "start spindle",
            Self::StopSpindle => "stop spindle",
            Self::OrientateSpindle => "orientate spindle",
            Self::LoadTool => "load tool",
            Self::CoolantOn => "coolant on",
            Self::CoolantOff => "coolant off",
            Self::LockMultiAxis => "lock multi-axis",
            Self::UnlockMultiAxis => "unlock multi-axis",
            Self::ExactStop => "exact stop",
            Self::BreakControl => "break control",
            Self::ToolMeasure => "tool measure",
            Self::Calibrate => "calibrate",
            Self::Verify => "verify",
            Self::Clean => "clean",
            Self::OpenDoor => "open door",
            Self::CloseDoor => "close door",
            Self::PalletChange => "pallet change",
            Self::ChuckOpen => "chuck open",
            Self::ChuckClose => "chuck close",
            Self::ProbeOn => "probe on",
            Self::ProbeOff => "probe off",
            Self::PowerOn => "power on",
            Self::PowerOff => "power off",
            Self::StartChipTransport => "start chip transport",
            Self::StopChipTransport => "stop chip transport",
        };
        write!(f, "{}", name)
    }
}

/// Classification of the upcoming motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Rapid positioning
    Rapid,
    /// Lead-in to the cut
    LeadIn,
    /// Cutting
    Cutting,
    /// Lead-out from the cut
    LeadOut,
    /// Transition link between passes
    LinkTransition,
    /// Direct link
    LinkDirect,
    /// Ramp entry
    Ramp,
    /// Helical ramp entry
    RampHelix,
    /// Profile ramp entry
    RampProfile,
    /// Zig-zag ramp entry
    RampZigZag,
    /// Plunge entry
    Plunge,
    /// Finishing cut
    FinishCut,
    /// Reduced feed
    Reduced,
    /// High-feed motion
    HighFeed,
    /// Predrill
    Predrill,
    /// Extended motion
    Extended,
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rapid => "rapid",
            Self::LeadIn => "lead-in",
            Self::Cutting => "cutting",
            Self::LeadOut => "lead-out",
            Self::LinkTransition => "transition",
            Self::LinkDirect => "direct",
            Self::Ramp => "ramp",
            Self::RampHelix => "helix ramp",
            Self::RampProfile => "profile ramp",
            Self::RampZigZag => "zigzag ramp",
            Self::Plunge => "plunge",
            Self::FinishCut => "finish cut",
            Self::Reduced => "reduced",
            Self::HighFeed => "high feed",
            Self::Predrill => "predrill",
            Self::Extended => "extended",
        };
        write!(f, "{}", name)
    }
}

/// Cutter radius compensation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RadiusCompensation {
    /// No compensation
    #[default]
    Off,
    /// Compensate left (G41)
    Left,
    /// Compensate right (G42)
    Right,
}

impl fmt::Display for RadiusCompensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}
