//! Abstract command mapping
//!
//! A router has a spindle switch and nothing else: no coolant, doors,
//! pallets, chucks, or tool measurement. Commands the machine cannot act on
//! map to [`CommandAction::Ignored`].

use millpost_core::Command;

/// What to emit for an abstract command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Emit the M-code
    Mcode(u8),
    /// Start the spindle in the current tool's direction at its speed
    StartSpindle,
    /// Nothing to emit
    Ignored,
}

/// Map `command` to its action
pub fn action(command: Command) -> CommandAction {
    match command {
        Command::Stop => CommandAction::Mcode(0),
        Command::OptionalStop => CommandAction::Mcode(1),
        Command::End => CommandAction::Mcode(2),
        Command::SpindleClockwise => CommandAction::Mcode(3),
        Command::SpindleCounterclockwise => CommandAction::Mcode(4),
        Command::StopSpindle => CommandAction::Mcode(5),
        Command::StartSpindle => CommandAction::StartSpindle,
        Command::OrientateSpindle
        | Command::LoadTool
        | Command::CoolantOn
        | Command::CoolantOff
        | Command::LockMultiAxis
        | Command::UnlockMultiAxis
        | Command::ExactStop
        | Command::BreakControl
        | Command::ToolMeasure
        | Command::Calibrate
        | Command::Verify
        | Command::Clean
        | Command::OpenDoor
        | Command::CloseDoor
        | Command::PalletChange
        | Command::ChuckOpen
        | Command::ChuckClose
        | Command::ProbeOn
        | Command::ProbeOff
        | Command::PowerOn
        | Command::PowerOff
        | Command::StartChipTransport
        | Command::StopChipTransport => CommandAction::Ignored,
    }
}
