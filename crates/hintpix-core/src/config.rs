//! Engine settings.
//!
//! Settings arrive from the application shell as a serialized object (camelCase
//! keys). Missing keys take their defaults, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::budget::{ByteCeiling, DEFAULT_MAX_BYTE_SIZE};
use crate::markup::{MarkupStyle, OutputTarget};
use crate::raster::ResampleFilter;

/// Default long-edge increment for the resolution search.
pub const DEFAULT_RESOLUTION_STEP: u32 = 2;

/// Default palette increment for the palette search.
pub const DEFAULT_PALETTE_STEP: u16 = 5;

/// Default preview width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 1920;

/// Errors from validating an [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ceiling percent must be greater than zero")]
    ZeroCeilingPercent,

    #[error("{0} step must be greater than zero")]
    ZeroStep(&'static str),

    #[error("preview width must be greater than zero")]
    ZeroPreviewWidth,
}

/// Settings shared by every encode and search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Hard byte limit of the text channel.
    pub max_byte_size: usize,
    /// Percentage of `max_byte_size` actually allowed.
    pub ceiling_percent: u32,
    /// Where the markup will be pasted.
    pub target: OutputTarget,
    /// Resampling filter.
    pub filter: ResampleFilter,
    /// Long-edge increment for the resolution search.
    pub resolution_step: u32,
    /// Palette increment for the palette search.
    pub palette_step: u16,
    /// Width of rendered previews.
    pub preview_width: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_byte_size: DEFAULT_MAX_BYTE_SIZE,
            ceiling_percent: 100,
            target: OutputTarget::Plain,
            filter: ResampleFilter::default(),
            resolution_step: DEFAULT_RESOLUTION_STEP,
            palette_step: DEFAULT_PALETTE_STEP,
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ceiling_percent == 0 {
            return Err(ConfigError::ZeroCeilingPercent);
        }
        if self.resolution_step == 0 {
            return Err(ConfigError::ZeroStep("resolution"));
        }
        if self.palette_step == 0 {
            return Err(ConfigError::ZeroStep("palette"));
        }
        if self.preview_width == 0 {
            return Err(ConfigError::ZeroPreviewWidth);
        }
        Ok(())
    }

    /// The effective byte ceiling after percentage scaling.
    pub fn ceiling(&self) -> ByteCeiling {
        ByteCeiling::scaled(self.max_byte_size, self.ceiling_percent)
    }

    /// Markup style for single hint images.
    pub fn style(&self) -> MarkupStyle {
        MarkupStyle::hint(self.target)
    }
}
