//! # Pipeline Configuration
//!
//! Configuration for the render pipeline and the frame snapshot ring.
//! Values can be built programmatically with the `with_*` methods or
//! loaded from a TOML file.
//!
//! ## Example
//!
//! ```rust
//! use render_core::config::PipelineConfig;
//!
//! let config = PipelineConfig::new()
//!     .with_snapshot_slots(4)
//!     .with_thread_name("render");
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was not valid TOML
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but violate a pipeline constraint
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the render pipeline
///
/// The snapshot slot count bounds how many frames of UI draw data may be
/// in flight between the main thread and the render thread at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of reusable snapshot slots per output window
    ///
    /// Must be at least 2: with a single slot the producer stalls on every
    /// frame waiting for the render thread, which defeats the pipelining.
    pub snapshot_slots: usize,

    /// OS name given to the render thread
    pub thread_name: String,

    /// Interval, in milliseconds, at which a blocked snapshot acquisition
    /// logs a starvation warning and bumps the starvation counter
    pub starvation_warn_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            snapshot_slots: 3,
            thread_name: "render-thread".to_string(),
            starvation_warn_ms: 1000,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of snapshot slots
    #[must_use]
    pub fn with_snapshot_slots(mut self, slots: usize) -> Self {
        self.snapshot_slots = slots;
        self
    }

    /// Set the render thread name
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the starvation warning interval
    #[must_use]
    pub fn with_starvation_warn_ms(mut self, millis: u64) -> Self {
        self.starvation_warn_ms = millis;
        self
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate pipeline constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot_slots < 2 {
            return Err(ConfigError::Invalid(format!(
                "snapshot_slots must be at least 2, got {}",
                self.snapshot_slots
            )));
        }
        if self.thread_name.is_empty() {
            return Err(ConfigError::Invalid("thread_name must not be empty".to_string()));
        }
        Ok(())
    }
}
