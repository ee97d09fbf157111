//! # millpost Post
//!
//! G-code emission engine for a Grbl router with a hand-switched spindle.
//!
//! The engine is callback driven: a host (a CAM system, or the [`job`]
//! replay adapter) calls [`PostProcessor`] methods in program order and
//! [`RouterPost`] writes the corresponding blocks.
//!
//! - [`format`] / [`modal`]: number formatting and modal word suppression
//! - [`writer`]: block assembly and sequence numbers
//! - [`router_speed`]: RPM to router dial interpolation
//! - [`tool_change`]: manual tool change decisions and step sequence
//! - [`commands`]: abstract command mapping
//! - [`processor`]: the callback trait and the router post-processor
//! - [`job`]: job files and replay

pub mod commands;
pub mod format;
pub mod job;
pub mod modal;
pub mod processor;
pub mod router_speed;
pub mod tool_change;
pub mod writer;

pub use commands::{action, CommandAction};
pub use format::NumberFormat;
pub use job::{post_process, Job, JobRunner, JobSection, Record};
pub use modal::{ModalGroup, ReferenceVariable, Variable};
pub use processor::{
    ArcMove, PostOutput, PostProcessor, PostWarning, RouterPost, RunState, MAX_DWELL, MIN_DWELL,
};
pub use router_speed::{dial_for, dial_setting};
pub use tool_change::{plan, Prompt, ToolChangeState, ToolChangeStep};
pub use writer::{BlockWriter, SequenceCounter};
