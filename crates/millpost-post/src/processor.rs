//! Post-processor callbacks and the router implementation
//!
//! The host drives a run through [`PostProcessor`]: `on_open`, then per
//! section `on_section`, the section's motion and command callbacks and
//! `on_section_end`, and finally `on_close`. [`RouterPost`] turns those calls
//! into Grbl G-code for a router-spindle machine with manual tool changes.

use std::fmt;

use millpost_core::{
    Command, MachineDescriptor, MeasurementSystem, MovementType, PartialPosition, PostError,
    Position, ProgramInfo, RadiusCompensation, SectionInfo, Tool,
};
use millpost_settings::{PostConfig, PromptContext, MIN_DWELL_DECIMALS};
use tracing::{debug, info, warn};

use crate::commands::{action, CommandAction};
use crate::format::NumberFormat;
use crate::modal::{ModalGroup, ReferenceVariable, Variable};
use crate::router_speed::dial_for;
use crate::tool_change::{plan, Prompt, ToolChangeState, ToolChangeStep};
use crate::writer::{word, BlockWriter};

/// Shortest dwell the controller accepts, in seconds
pub const MIN_DWELL: f64 = 0.001;
/// Longest dwell the controller accepts, in seconds
pub const MAX_DWELL: f64 = 99999.999;

/// Callback interface between a CAM host and a post-processor
pub trait PostProcessor {
    /// Start a run
    fn on_open(&mut self, program: &ProgramInfo) -> Result<(), PostError>;

    /// Start a section (one operation with one tool)
    fn on_section(&mut self, section: &SectionInfo) -> Result<(), PostError>;

    /// Free-text comment
    fn on_comment(&mut self, text: &str) -> Result<(), PostError>;

    /// The kind of the following moves changed
    fn on_movement(&mut self, movement: MovementType) -> Result<(), PostError>;

    /// Rapid positioning move
    fn on_rapid(&mut self, target: &PartialPosition) -> Result<(), PostError>;

    /// Linear feed move, `next_is_motion` tells whether the next record
    /// of the section is a move
    fn on_linear(
        &mut self,
        target: &PartialPosition,
        feed: f64,
        next_is_motion: bool,
    ) -> Result<(), PostError>;

    /// Circular feed move in the XY plane
    fn on_circular(&mut self, arc: &ArcMove) -> Result<(), PostError>;

    /// Pause for `seconds`
    fn on_dwell(&mut self, seconds: f64) -> Result<(), PostError>;

    /// Spindle speed change
    fn on_spindle_speed(&mut self, rpm: f64) -> Result<(), PostError>;

    /// Cutter radius compensation request
    fn on_radius_compensation(&mut self, mode: RadiusCompensation) -> Result<(), PostError>;

    /// Abstract machine command
    fn on_command(&mut self, command: Command) -> Result<(), PostError>;

    /// End of the current section
    fn on_section_end(&mut self) -> Result<(), PostError>;

    /// End of the run
    fn on_close(&mut self) -> Result<(), PostError>;
}

/// Circular move with a fully known start point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcMove {
    /// Position before the move
    pub start: Position,
    /// Arc centre
    pub center: Position,
    /// Position after the move
    pub end: Position,
    /// Clockwise (G2) or counter-clockwise (G3)
    pub clockwise: bool,
    /// Feed rate
    pub feed: f64,
}

/// Non-fatal condition reported to the operator
#[derive(Debug, Clone, PartialEq)]
pub enum PostWarning {
    /// Dwell time outside the controller range
    DwellClamped {
        /// Requested seconds
        requested: f64,
        /// Emitted seconds
        clamped: f64,
    },
}

impl fmt::Display for PostWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DwellClamped { requested, clamped } => write!(
                f,
                "Dwell of {requested}s is out of range, clamped to {clamped}s"
            ),
        }
    }
}

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Not opened yet
    #[default]
    Idle,
    /// Accepting callbacks
    Open,
    /// Aborted by a fatal error
    Failed,
    /// Closed normally
    Closed,
}

/// Result of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct PostOutput {
    /// G-code program text
    pub program: String,
    /// Warnings raised during the run
    pub warnings: Vec<PostWarning>,
}

/// Grbl post-processor for a router spindle with manual tool changes
#[derive(Debug, Clone)]
pub struct RouterPost {
    config: PostConfig,
    state: RunState,
    writer: BlockWriter,
    x: Variable,
    y: Variable,
    z: Variable,
    feed: Variable,
    speed: Variable,
    dwell: Variable,
    i: ReferenceVariable,
    j: ReferenceVariable,
    motion: ModalGroup,
    distance: ModalGroup,
    units: ModalGroup,
    plane: ModalGroup,
    machine: MachineDescriptor,
    current_tool: Option<Tool>,
    warnings: Vec<PostWarning>,
}

impl RouterPost {
    /// Create a post-processor for `config`
    pub fn new(config: PostConfig) -> Self {
        let output = &config.output;
        let xyz = NumberFormat::new(output.xyz_decimals);
        let feed = NumberFormat::new(output.feed_decimals);
        let dwell = NumberFormat::new(output.dwell_decimals.max(MIN_DWELL_DECIMALS));

        Self {
            state: RunState::Idle,
            writer: BlockWriter::new(output),
            x: Variable::new('X', xyz),
            y: Variable::new('Y', xyz),
            z: Variable::new('Z', xyz),
            feed: Variable::new('F', feed),
            speed: Variable::new('S', NumberFormat::new(0)),
            dwell: Variable::forced('P', dwell),
            i: ReferenceVariable::forced('I', xyz),
            j: ReferenceVariable::forced('J', xyz),
            motion: ModalGroup::new('G'),
            distance: ModalGroup::new('G'),
            units: ModalGroup::new('G'),
            plane: ModalGroup::new('G'),
            machine: MachineDescriptor::default(),
            current_tool: None,
            warnings: Vec::new(),
            config,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Lines emitted so far
    pub fn lines(&self) -> &[String] {
        self.writer.lines()
    }

    /// Program text emitted so far
    pub fn program(&self) -> String {
        self.writer.program()
    }

    /// Warnings raised so far
    pub fn warnings(&self) -> &[PostWarning] {
        &self.warnings
    }

    /// Consume the post-processor and return its output
    pub fn finish(self) -> PostOutput {
        PostOutput {
            program: self.writer.program(),
            warnings: self.warnings,
        }
    }

    /// Forget all modal state so every word is restated on next use
    pub fn force_any(&mut self) {
        for variable in [
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &mut self.feed,
            &mut self.speed,
        ] {
            variable.reset();
        }
        for group in [
            &mut self.motion,
            &mut self.distance,
            &mut self.units,
            &mut self.plane,
        ] {
            group.reset();
        }
    }

    fn restart(&mut self) {
        *self = Self::new(self.config.clone());
    }

    fn ensure_open(&self, callback: &str) -> Result<(), PostError> {
        if self.state == RunState::Open {
            Ok(())
        } else {
            Err(PostError::NotOpen {
                callback: callback.to_string(),
            })
        }
    }

    fn fail(&mut self, err: PostError) -> PostError {
        self.state = RunState::Failed;
        err
    }

    fn xyz_word(&self, letter: char, value: f64) -> Option<String> {
        let format = NumberFormat::new(self.config.output.xyz_decimals);
        word(format!("{}{}", letter, format.format(value)))
    }

    /// Absolute mode and machine-coordinate rapid to the safe Z height
    fn write_raise(&mut self) {
        let safe = self.machine.limits.z.max - self.config.tool_change.safety_margin;
        self.distance.reset();
        self.motion.reset();
        let words = [
            self.distance.format(90),
            word("G53"),
            self.motion.format(0),
            self.xyz_word('Z', safe),
        ];
        self.writer.block(words);
        // Work Z is unknown after a machine-coordinate move.
        self.z.reset();
        self.feed.reset();
    }

    /// Operator message and program pause
    fn write_prompt(&mut self, text: &str) {
        self.writer.comment(&format!("MSG, {}", text));
        self.writer.block([word("M0")]);
    }

    fn write_probe(&mut self) {
        let travel = self.machine.limits.z.span();
        let probe_feed = NumberFormat::new(self.config.output.feed_decimals)
            .format(self.config.tool_change.probe_feed);
        let words = [
            self.distance.format(91),
            word("G38.2"),
            self.xyz_word('Z', -travel),
            word(format!("F{}", probe_feed)),
        ];
        self.writer.block(words);
        let absolute = self.distance.format(90);
        self.writer.block([absolute]);
        self.motion.reset();
        self.feed.reset();
        self.z.reset();
    }

    fn write_work_offset(&mut self, z: f64) {
        let words = [word("G10"), word("L20"), word("P1"), self.xyz_word('Z', z)];
        self.writer.block(words);
        self.z.reset();
    }

    fn prompt_text(&self, prompt: Prompt, tool: &Tool) -> String {
        let context = PromptContext {
            tool: tool.number,
            description: &tool.description,
            rpm: tool.spindle_rpm,
            dial: dial_for(&self.config.router, tool.spindle_rpm),
        };
        let templates = &self.config.prompts;
        match prompt {
            Prompt::InsertTool => templates.render_insert_tool(&context),
            Prompt::AttachProbe => templates.render_attach_probe(&context),
            Prompt::TouchOff => templates.render_touch_off(&context),
            Prompt::StartSpindle => templates.render_start_spindle(&context),
        }
    }

    fn write_tool_change(&mut self, tool: &Tool) {
        for step in plan(&self.config.tool_change) {
            match step {
                ToolChangeStep::Raise => self.write_raise(),
                ToolChangeStep::Prompt(prompt) => {
                    let text = self.prompt_text(prompt, tool);
                    self.write_prompt(&text);
                }
                ToolChangeStep::Probe => self.write_probe(),
                ToolChangeStep::SetWorkZ(z) => self.write_work_offset(z),
            }
        }
    }

    fn write_spindle_start(&mut self, tool: &Tool) {
        self.speed.reset();
        let words = [
            word(format!("M{}", tool.direction.mcode())),
            self.speed.format(tool.spindle_rpm),
        ];
        self.writer.block(words);
    }
}

impl PostProcessor for RouterPost {
    fn on_open(&mut self, program: &ProgramInfo) -> Result<(), PostError> {
        self.restart();

        if program.unit != MeasurementSystem::Metric {
            return Err(self.fail(PostError::UnsupportedUnit { unit: program.unit }));
        }

        self.state = RunState::Open;
        self.machine = program.machine.clone();
        info!(
            program = %program.name,
            machine = %self.machine.label(),
            router = %self.config.router.model,
            "Opening post-processing run"
        );

        if !program.name.is_empty() {
            self.writer.comment(&program.name);
        }
        if !program.comment.is_empty() {
            self.writer.comment(&program.comment);
        }
        let machine = self.machine.label();
        if !machine.is_empty() {
            self.writer.comment(&format!("Machine: {}", machine));
        }

        let preamble = [
            self.distance.format(90),
            word("G94"),
            self.plane.format(17),
        ];
        self.writer.block(preamble);
        let units = self.units.format(program.unit.gcode());
        self.writer.block([units]);
        Ok(())
    }

    fn on_section(&mut self, section: &SectionInfo) -> Result<(), PostError> {
        self.ensure_open("on_section")?;

        if let Some(comment) = &section.comment {
            self.writer.comment(comment);
        }

        let decision = ToolChangeState::evaluate(section);
        debug!(
            section = section.index,
            tool = section.tool.number,
            ?decision,
            "Section start"
        );

        if decision.is_required() {
            if self.config.tool_change.prompts_enabled {
                self.write_tool_change(&section.tool);
            } else {
                self.writer.comment(&section.tool.to_string());
            }
        }

        self.write_spindle_start(&section.tool);
        self.current_tool = Some(section.tool.clone());
        Ok(())
    }

    fn on_comment(&mut self, text: &str) -> Result<(), PostError> {
        self.ensure_open("on_comment")?;
        self.writer.comment(text);
        Ok(())
    }

    fn on_movement(&mut self, movement: MovementType) -> Result<(), PostError> {
        self.ensure_open("on_movement")?;
        if self.config.output.movement_comments {
            self.writer.comment(&movement.to_string());
        }
        Ok(())
    }

    fn on_rapid(&mut self, target: &PartialPosition) -> Result<(), PostError> {
        self.ensure_open("on_rapid")?;

        let x = target.x.and_then(|x| self.x.format(x));
        let y = target.y.and_then(|y| self.y.format(y));
        let z = target.z.and_then(|z| self.z.format(z));
        if x.is_some() || y.is_some() || z.is_some() {
            let motion = self.motion.format(0);
            self.writer.block([motion, x, y, z]);
            self.feed.reset();
        }
        Ok(())
    }

    fn on_linear(
        &mut self,
        target: &PartialPosition,
        feed: f64,
        next_is_motion: bool,
    ) -> Result<(), PostError> {
        self.ensure_open("on_linear")?;

        let x = target.x.and_then(|x| self.x.format(x));
        let y = target.y.and_then(|y| self.y.format(y));
        let z = target.z.and_then(|z| self.z.format(z));
        let f = self.feed.format(feed);

        if x.is_some() || y.is_some() || z.is_some() {
            let motion = self.motion.format(1);
            self.writer.block([motion, x, y, z, f]);
        } else if f.is_some() {
            if next_is_motion {
                // Restate the feed on the next move instead.
                self.feed.reset();
            } else {
                self.writer.block([f]);
            }
        }
        Ok(())
    }

    fn on_circular(&mut self, arc: &ArcMove) -> Result<(), PostError> {
        self.ensure_open("on_circular")?;

        self.x.reset();
        self.y.reset();
        let plane = self.plane.format(17);
        let motion = self.motion.format(if arc.clockwise { 2 } else { 3 });
        let words = [
            plane,
            motion,
            self.x.format(arc.end.x),
            self.y.format(arc.end.y),
            self.z.format(arc.end.z),
            self.i.format(arc.center.x - arc.start.x, 0.0),
            self.j.format(arc.center.y - arc.start.y, 0.0),
            self.feed.format(arc.feed),
        ];
        self.writer.block(words);
        self.feed.reset();
        Ok(())
    }

    fn on_dwell(&mut self, seconds: f64) -> Result<(), PostError> {
        self.ensure_open("on_dwell")?;

        let clamped = seconds.clamp(MIN_DWELL, MAX_DWELL);
        if clamped != seconds {
            let warning = PostWarning::DwellClamped {
                requested: seconds,
                clamped,
            };
            warn!("{}", warning);
            self.warnings.push(warning);
        }
        let p = self.dwell.format(clamped);
        self.writer.block([word("G4"), p]);
        Ok(())
    }

    fn on_spindle_speed(&mut self, rpm: f64) -> Result<(), PostError> {
        self.ensure_open("on_spindle_speed")?;
        let s = self.speed.format(rpm);
        self.writer.block([s]);
        Ok(())
    }

    fn on_radius_compensation(&mut self, mode: RadiusCompensation) -> Result<(), PostError> {
        self.ensure_open("on_radius_compensation")?;
        match mode {
            RadiusCompensation::Off => Ok(()),
            RadiusCompensation::Left | RadiusCompensation::Right => {
                Err(self.fail(PostError::RadiusCompensation {
                    mode: mode.to_string(),
                }))
            }
        }
    }

    fn on_command(&mut self, command: Command) -> Result<(), PostError> {
        self.ensure_open("on_command")?;

        match action(command) {
            CommandAction::Mcode(code) => {
                self.writer.block([word(format!("M{}", code))]);
                if command == Command::StopSpindle {
                    self.speed.reset();
                }
            }
            CommandAction::StartSpindle => match self.current_tool.clone() {
                Some(tool) => self.write_spindle_start(&tool),
                None => debug!("Spindle start before any section, ignored"),
            },
            CommandAction::Ignored => debug!(%command, "Command not supported, ignored"),
        }
        Ok(())
    }

    fn on_section_end(&mut self) -> Result<(), PostError> {
        self.ensure_open("on_section_end")?;
        self.force_any();
        Ok(())
    }

    fn on_close(&mut self) -> Result<(), PostError> {
        self.ensure_open("on_close")?;

        self.write_raise();
        self.writer.block([word("M5")]);
        self.writer.block([word("M30")]);
        self.state = RunState::Closed;
        info!(
            lines = self.writer.lines().len(),
            warnings = self.warnings.len(),
            "Post-processing run closed"
        );
        Ok(())
    }
}
