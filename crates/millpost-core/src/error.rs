//! Error handling for millpost
//!
//! Provides the error types for every layer of a post-processing run:
//! - Post errors (fatal conditions raised by the emission engine)
//! - Job errors (malformed input handed over by the host adapter)
//!
//! All error types use `thiserror`. Non-fatal conditions (for example a
//! clamped dwell time) are not errors; the post-processor reports them as
//! warnings and keeps going.

use crate::units::MeasurementSystem;
use thiserror::Error;

/// Fatal post-processing error
///
/// Any of these aborts the run. Output emitted before the error is not
/// guaranteed to be a usable program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostError {
    /// Program unit is not metric
    #[error("Unsupported unit {unit}: this machine only accepts metric programs")]
    UnsupportedUnit {
        /// The unit the host requested.
        unit: MeasurementSystem,
    },

    /// Cutter radius compensation was requested
    #[error("Radius compensation ({mode}) is not supported by this machine")]
    RadiusCompensation {
        /// The requested compensation mode.
        mode: String,
    },

    /// A callback arrived before `on_open` or after `on_close`
    #[error("Post-processor is not open: {callback} called outside a run")]
    NotOpen {
        /// Name of the offending callback.
        callback: String,
    },
}

/// Job description error
///
/// Raised while reading or replaying a job description through the host
/// adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// The job contains no sections
    #[error("Job has no sections")]
    Empty,

    /// A record cannot be replayed
    #[error("Invalid record {index} in section {section}: {reason}")]
    InvalidRecord {
        /// Zero-based section index.
        section: usize,
        /// Zero-based record index within the section.
        index: usize,
        /// Why the record was rejected.
        reason: String,
    },

    /// The job file could not be parsed
    #[error("Failed to parse job: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },
}

/// Main error type for millpost
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal post-processing error
    #[error(transparent)]
    Post(#[from] PostError),

    /// Job description error
    #[error(transparent)]
    Job(#[from] JobError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error aborted a post-processing run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Post(_))
    }

    /// Check if this is a job description error
    pub fn is_job_error(&self) -> bool {
        matches!(self, Error::Job(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
