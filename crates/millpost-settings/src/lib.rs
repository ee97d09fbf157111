//! millpost Settings Crate
//!
//! Handles post-processor configuration: output formatting, tool change and
//! probing behaviour, router calibration tables, and operator prompt
//! templates. Configuration files may be JSON or TOML.

pub mod config;
pub mod error;
pub mod prompts;
pub mod router;

pub use config::{OutputSettings, PostConfig, ToolChangeSettings, MIN_DWELL_DECIMALS};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use prompts::{PromptContext, PromptTemplates};
pub use router::{RouterModel, RouterSettings};
