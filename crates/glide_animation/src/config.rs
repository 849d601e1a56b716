//! Animation configuration
//!
//! Fixed at construction. Can be written inline, built through
//! [`AnimationBuilder`](crate::AnimationBuilder), or loaded from TOML:
//!
//! ```toml
//! duration_ms = 400
//! frame_rate = 30
//! easing = "ease-out-quad"
//! ```

use glide_core::{priority, Priority};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

pub const DEFAULT_DURATION_MS: u32 = 250;
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Construction-time animation settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Total running time
    pub duration_ms: u32,
    /// Frames per second, at least 1
    pub frame_rate: u32,
    pub easing: Easing,
    /// Reactor priority of the frame source
    pub priority: Priority,
    /// Log frame statistics when the animation is dropped
    pub debug: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            frame_rate: DEFAULT_FRAME_RATE,
            easing: Easing::Linear,
            priority: priority::DEFAULT,
            debug: false,
        }
    }
}

impl AnimationConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| AnimationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(AnimationError::Config("frame_rate must be at least 1".into()));
        }
        Ok(())
    }
}
