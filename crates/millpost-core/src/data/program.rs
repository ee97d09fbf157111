//! Per-run and per-section information supplied by the host

use super::tools::Tool;
use super::MachineDescriptor;
use crate::units::MeasurementSystem;
use serde::{Deserialize, Serialize};

/// Program-level information available when the run opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProgramInfo {
    /// Program name
    pub name: String,
    /// Program comment
    pub comment: String,
    /// Unit the toolpaths are expressed in
    pub unit: MeasurementSystem,
    /// Target machine
    pub machine: MachineDescriptor,
}

/// One operation as seen at its start
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInfo {
    /// Zero-based index of the section within the run
    pub index: usize,
    /// Tool used by this section
    pub tool: Tool,
    /// Tool used by the previous section, `None` for the first one
    pub previous_tool: Option<Tool>,
    /// Host requested a tool change regardless of tool identity
    pub force_tool_change: bool,
    /// Operation comment
    pub comment: Option<String>,
}

impl SectionInfo {
    /// Check if this is the first section of the run
    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}
