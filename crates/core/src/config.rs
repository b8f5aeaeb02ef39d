//! Engine configuration
//!
//! Board size is fixed for the lifetime of an engine; the threshold can be
//! changed between calls with [`Engine::set_threshold`](crate::Engine::set_threshold).

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_HEIGHT, DEFAULT_THRESHOLD, DEFAULT_WIDTH};

/// Largest width or height; wall and floor coordinates must fit in an `i32`.
pub const MAX_BOARD_SIDE: usize = (i32::MAX - 2) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interior columns
    pub width: usize,
    /// Interior rows
    pub height: usize,
    /// Percent of a row's capacity needed to clear it; also the score multiplier
    pub threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults
    ///
    /// - `FRACTRIS_WIDTH`
    /// - `FRACTRIS_HEIGHT`
    /// - `FRACTRIS_THRESHOLD`
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let width = env::var("FRACTRIS_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);

        let height = env::var("FRACTRIS_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);

        let threshold = env::var("FRACTRIS_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.threshold);

        Self {
            width,
            height,
            threshold,
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Check that an engine can run with this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fits = |side: usize| (1..=MAX_BOARD_SIDE).contains(&side);
        if !fits(self.width) || !fits(self.height) {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidDimensions { width: usize, height: usize },
    InvalidThreshold(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDimensions { width, height } => {
                write!(
                    f,
                    "board sides must be between 1 and {}, got {}x{}",
                    MAX_BOARD_SIDE, width, height
                )
            }
            ConfigError::InvalidThreshold(t) => {
                write!(f, "threshold must be a non-negative number, got {}", t)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
