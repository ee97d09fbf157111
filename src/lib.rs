//! # millpost
//!
//! A Grbl post-processor for hobby CNC routers:
//! - Metric-only G-code with modal word suppression
//! - Manual tool changes with operator prompts and optional Z probing
//! - Router dial hints from per-model RPM calibration tables
//! - Job replay from JSON or TOML files
//!
//! ## Architecture
//!
//! millpost is organized as a workspace with multiple crates:
//!
//! 1. **millpost-core** - Data model, units, error types
//! 2. **millpost-settings** - Post configuration, router tables, prompt templates
//! 3. **millpost-post** - Emission engine, callback trait, job replay
//! 4. **millpost** - Command-line binary that integrates all crates

pub use millpost_core::data;
pub use millpost_core::{
    Command, Error, JobError, MachineDescriptor, MachineLimits, MeasurementSystem, MovementType,
    PartialPosition, Position, PostError, ProgramInfo, RadiusCompensation, Result, SectionInfo,
    SpindleDirection, Tool,
};

pub use millpost_settings::{
    OutputSettings, PostConfig, PromptTemplates, RouterModel, RouterSettings, SettingsError,
    ToolChangeSettings,
};

pub use millpost_post::{
    post_process, ArcMove, Job, JobRunner, JobSection, PostOutput, PostProcessor, PostWarning,
    Record, RouterPost,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Log output goes to stderr so G-code written to stdout stays clean.
/// The level defaults to `info` and follows `RUST_LOG` when set.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
