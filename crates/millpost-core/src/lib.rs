//! # millpost Core
//!
//! Core types and errors shared by the millpost crates.
//! Provides the data model the CAM host hands to the post-processor
//! (positions, tools, sections, commands, movement types, machine
//! descriptor) and the layered error types.

pub mod data;
pub mod error;
pub mod units;

pub use data::{
    tools::{SpindleDirection, Tool},
    AxisRange, Command, MachineDescriptor, MachineLimits, MovementType, PartialPosition, Position,
    ProgramInfo, RadiusCompensation, SectionInfo,
};

pub use error::{Error, JobError, PostError, Result};

pub use units::MeasurementSystem;
