//! Manual tool change state machine
//!
//! The machine has no tool changer and no spindle control: every tool change
//! is carried out by the operator between `M0` pauses. At each section start
//! the post-processor decides whether a change is needed and, if so, plays
//! the fixed step sequence produced by [`plan`].

use millpost_core::SectionInfo;
use millpost_settings::ToolChangeSettings;

/// Tool change decision at a section start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChangeState {
    /// Same tool as the previous section
    NoToolChange,
    /// First section, forced change, or different tool number
    ToolChangeRequired,
}

impl ToolChangeState {
    /// Decide for `section`
    pub fn evaluate(section: &SectionInfo) -> Self {
        let changed = match &section.previous_tool {
            Some(previous) => !previous.same_tool(&section.tool),
            None => true,
        };
        if section.is_first() || section.force_tool_change || changed {
            Self::ToolChangeRequired
        } else {
            Self::NoToolChange
        }
    }

    /// Check if a change is required
    pub fn is_required(&self) -> bool {
        matches!(self, Self::ToolChangeRequired)
    }
}

/// Operator prompt shown during a tool change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Insert the new tool
    InsertTool,
    /// Attach the touch probe
    AttachProbe,
    /// Touch the bit off the stock manually
    TouchOff,
    /// Set the router speed and switch it on
    StartSpindle,
}

/// One step of the tool change sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolChangeStep {
    /// Absolute mode, raise Z to the safe machine height
    Raise,
    /// Operator prompt followed by a pause
    Prompt(Prompt),
    /// Probe toward Z minimum
    Probe,
    /// Set the workplane Z origin at the current position
    SetWorkZ(f64),
}

/// Ordered tool change sequence for the given settings
pub fn plan(settings: &ToolChangeSettings) -> Vec<ToolChangeStep> {
    let mut steps = vec![ToolChangeStep::Raise, ToolChangeStep::Prompt(Prompt::InsertTool)];
    if settings.probing_tool {
        steps.push(ToolChangeStep::Prompt(Prompt::AttachProbe));
        steps.push(ToolChangeStep::Probe);
        steps.push(ToolChangeStep::SetWorkZ(settings.probe_plate_thickness));
    } else {
        steps.push(ToolChangeStep::Prompt(Prompt::TouchOff));
        steps.push(ToolChangeStep::SetWorkZ(0.0));
    }
    steps.push(ToolChangeStep::Raise);
    steps.push(ToolChangeStep::Prompt(Prompt::StartSpindle));
    steps
}
