//! Job replay
//!
//! Stands in for the CAM host: a [`Job`] is a serialized description of the
//! events a host would raise (program information, then sections of motion
//! and command records), and [`JobRunner`] plays it back through a
//! [`PostProcessor`]. Jobs are read from JSON or TOML.
//!
//! Records carry only the axes that change. The runner tracks the known
//! position so circular moves can be given their start point, and looks one
//! record ahead for the linear feed rule.

use std::path::Path;

use millpost_core::{
    Command, JobError, MovementType, PartialPosition, Position, ProgramInfo,
    RadiusCompensation, Result, SectionInfo, Tool,
};
use millpost_settings::PostConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::processor::{ArcMove, PostOutput, PostProcessor, RouterPost};

/// Complete job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Program information
    #[serde(default)]
    pub program: ProgramInfo,
    /// Position of the machine before the first move, if known
    #[serde(default)]
    pub initial_position: Option<Position>,
    /// Sections in execution order
    #[serde(default)]
    pub sections: Vec<JobSection>,
}

/// One operation of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSection {
    /// Tool used by the section
    pub tool: Tool,
    /// Request a tool change even if the tool is unchanged
    #[serde(default)]
    pub force_tool_change: bool,
    /// Operation comment
    #[serde(default)]
    pub comment: Option<String>,
    /// Events of the section
    #[serde(default)]
    pub records: Vec<Record>,
}

/// One host event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    /// Rapid move
    Rapid {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        z: Option<f64>,
    },
    /// Linear feed move
    Linear {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        z: Option<f64>,
        feed: f64,
    },
    /// Circular feed move in the XY plane
    Circular {
        clockwise: bool,
        center: Position,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        z: Option<f64>,
        feed: f64,
    },
    /// Movement type change
    Movement { movement: MovementType },
    /// Abstract machine command
    Command { command: Command },
    /// Dwell in seconds
    Dwell { seconds: f64 },
    /// Spindle speed change
    SpindleSpeed { rpm: f64 },
    /// Radius compensation request
    RadiusCompensation { mode: RadiusCompensation },
    /// Free-text comment
    Comment { text: String },
}

impl Record {
    /// Check if the record moves the machine
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Record::Rapid { .. } | Record::Linear { .. } | Record::Circular { .. }
        )
    }
}

impl Job {
    /// Parse a JSON job
    pub fn from_json(text: &str) -> std::result::Result<Self, JobError> {
        serde_json::from_str(text).map_err(|e| JobError::Parse {
            reason: e.to_string(),
        })
    }

    /// Parse a TOML job
    pub fn from_toml(text: &str) -> std::result::Result<Self, JobError> {
        toml::from_str(text).map_err(|e| JobError::Parse {
            reason: e.to_string(),
        })
    }

    /// Read a job file, TOML for `.toml` and JSON otherwise
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let job = if is_toml {
            Self::from_toml(&text)?
        } else {
            Self::from_json(&text)?
        };
        debug!(path = %path.display(), sections = job.sections.len(), "Loaded job");
        Ok(job)
    }
}

/// Replays a job through a post-processor
#[derive(Debug)]
pub struct JobRunner<'a> {
    job: &'a Job,
    position: PartialPosition,
}

impl<'a> JobRunner<'a> {
    /// Runner for `job`
    pub fn new(job: &'a Job) -> Self {
        Self {
            job,
            position: job
                .initial_position
                .map(PartialPosition::from)
                .unwrap_or_default(),
        }
    }

    /// Last known position, axes never reached are `None`
    pub fn position(&self) -> PartialPosition {
        self.position
    }

    /// Play every event of the job, stopping at the first error
    pub fn replay<P: PostProcessor>(&mut self, post: &mut P) -> Result<()> {
        if self.job.sections.is_empty() {
            return Err(JobError::Empty.into());
        }

        post.on_open(&self.job.program)?;

        let mut previous_tool: Option<&Tool> = None;
        for (index, section) in self.job.sections.iter().enumerate() {
            let info = SectionInfo {
                index,
                tool: section.tool.clone(),
                previous_tool: previous_tool.cloned(),
                force_tool_change: section.force_tool_change,
                comment: section.comment.clone(),
            };
            post.on_section(&info)?;

            for (record_index, record) in section.records.iter().enumerate() {
                let next_is_motion = section
                    .records
                    .get(record_index + 1)
                    .is_some_and(Record::is_motion);
                self.replay_record(post, record, next_is_motion, (index, record_index))?;
            }

            post.on_section_end()?;
            previous_tool = Some(&section.tool);
        }

        post.on_close()?;
        info!(sections = self.job.sections.len(), "Job replayed");
        Ok(())
    }

    fn replay_record<P: PostProcessor>(
        &mut self,
        post: &mut P,
        record: &Record,
        next_is_motion: bool,
        (section, index): (usize, usize),
    ) -> Result<()> {
        match record {
            Record::Rapid { x, y, z } => {
                let target = PartialPosition { x: *x, y: *y, z: *z };
                post.on_rapid(&target)?;
                self.position.merge(&target);
            }
            Record::Linear { x, y, z, feed } => {
                let target = PartialPosition { x: *x, y: *y, z: *z };
                post.on_linear(&target, *feed, next_is_motion)?;
                self.position.merge(&target);
            }
            Record::Circular {
                clockwise,
                center,
                x,
                y,
                z,
                feed,
            } => {
                let start = self
                    .position
                    .complete()
                    .ok_or_else(|| JobError::InvalidRecord {
                        section,
                        index,
                        reason: "circular move from an unknown position".to_string(),
                    })?;
                let target = PartialPosition { x: *x, y: *y, z: *z };
                let mut end = start;
                end.apply(&target);
                post.on_circular(&ArcMove {
                    start,
                    center: *center,
                    end,
                    clockwise: *clockwise,
                    feed: *feed,
                })?;
                self.position = end.into();
            }
            Record::Movement { movement } => post.on_movement(*movement)?,
            Record::Command { command } => post.on_command(*command)?,
            Record::Dwell { seconds } => post.on_dwell(*seconds)?,
            Record::SpindleSpeed { rpm } => post.on_spindle_speed(*rpm)?,
            Record::RadiusCompensation { mode } => post.on_radius_compensation(*mode)?,
            Record::Comment { text } => post.on_comment(text)?,
        }
        Ok(())
    }
}

/// Run `job` through a [`RouterPost`] configured with `config`
pub fn post_process(job: &Job, config: PostConfig) -> Result<PostOutput> {
    let mut post = RouterPost::new(config);
    JobRunner::new(job).replay(&mut post)?;
    Ok(post.finish())
}
