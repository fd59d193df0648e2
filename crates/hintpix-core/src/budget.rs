//! Budget evaluation: one resample, quantize and encode pass checked against a byte ceiling.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::EngineConfig;
use crate::markup::{byte_cost, encode_quantized, EncodedOutput, MarkupStyle};
use crate::quantize::{count_distinct_colors, quantize, QuantizedRaster};
use crate::raster::{resample, RasterError, ResampleFilter, SourceRaster, TargetSpec};

/// Byte limit of the hint text channel.
pub const DEFAULT_MAX_BYTE_SIZE: usize = 65534;

/// Maximum allowed size, in bytes, of encoded markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ByteCeiling(usize);

impl Default for ByteCeiling {
    fn default() -> Self {
        Self(DEFAULT_MAX_BYTE_SIZE)
    }
}

impl ByteCeiling {
    pub fn new(bytes: usize) -> Self {
        Self(bytes)
    }

    /// `max_bytes * percent / 100`, rounded down.
    pub fn scaled(max_bytes: usize, percent: u32) -> Self {
        let scaled = (max_bytes as u128 * u128::from(percent)) / 100;
        Self(usize::try_from(scaled).unwrap_or(usize::MAX))
    }

    pub fn bytes(self) -> usize {
        self.0
    }

    /// Whether `byte_cost` is at or under the ceiling.
    #[inline]
    pub fn fits(self, byte_cost: usize) -> bool {
        byte_cost <= self.0
    }
}

/// Errors from a budget-checked encode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// The attempt could not be encoded at all.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The encode succeeded but is larger than the ceiling.
    #[error("Over budget: {byte_cost} bytes exceeds the {ceiling} byte ceiling")]
    OverBudget { byte_cost: usize, ceiling: usize },
}

impl BudgetError {
    /// Byte cost of the rejected encode, if one was produced.
    pub fn byte_cost(&self) -> Option<usize> {
        match self {
            BudgetError::OverBudget { byte_cost, .. } => Some(*byte_cost),
            BudgetError::Raster(_) => None,
        }
    }
}

/// Runs encode attempts against one source raster.
///
/// Holds only borrowed input and copyable settings; every call builds its
/// buffers from scratch, so an evaluator can be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    raster: &'a SourceRaster,
    filter: ResampleFilter,
    style: MarkupStyle,
    ceiling: ByteCeiling,
}

impl<'a> Evaluator<'a> {
    pub fn new(raster: &'a SourceRaster, config: &EngineConfig) -> Self {
        Self {
            raster,
            filter: config.filter,
            style: config.style(),
            ceiling: config.ceiling(),
        }
    }

    /// Override the markup style.
    pub fn with_style(self, style: MarkupStyle) -> Self {
        Self { style, ..self }
    }

    pub fn ceiling(&self) -> ByteCeiling {
        self.ceiling
    }

    /// Resample and quantize for one target.
    ///
    /// Targets built without [`TargetSpec::new`] are checked here, so a
    /// palette size outside 1-256 is rejected rather than clamped.
    pub fn quantize(&self, spec: &TargetSpec) -> Result<QuantizedRaster, RasterError> {
        TargetSpec::new(spec.long_edge, spec.palette_size, spec.use_alpha)?;
        let resampled = resample(self.raster, spec.long_edge, self.filter)?;
        Ok(quantize(&resampled, spec.palette_size, spec.use_alpha))
    }

    /// Encode without a budget check.
    pub fn encode(&self, spec: &TargetSpec) -> Result<EncodedOutput, RasterError> {
        let quantized = self.quantize(spec)?;
        let output = encode_quantized(&quantized, &self.style);
        debug!(
            long_edge = spec.long_edge,
            palette_size = spec.palette_size,
            use_alpha = spec.use_alpha,
            width = output.width,
            height = output.height,
            byte_cost = output.byte_cost,
            "encoded attempt"
        );
        Ok(output)
    }

    /// Byte cost of one target without building the markup.
    pub fn cost(&self, spec: &TargetSpec) -> Result<usize, RasterError> {
        let quantized = self.quantize(spec)?;
        let cost = byte_cost(&quantized, &self.style);
        debug!(
            long_edge = spec.long_edge,
            palette_size = spec.palette_size,
            byte_cost = cost,
            "costed attempt"
        );
        Ok(cost)
    }

    /// Encode and check the result against the ceiling.
    pub fn evaluate(&self, spec: &TargetSpec) -> Result<EncodedOutput, BudgetError> {
        let output = self.encode(spec)?;
        if self.ceiling.fits(output.byte_cost) {
            Ok(output)
        } else {
            Err(BudgetError::OverBudget {
                byte_cost: output.byte_cost,
                ceiling: self.ceiling.bytes(),
            })
        }
    }

    /// Distinct colors at `long_edge` after quantizing to a full palette.
    pub fn distinct_colors(&self, long_edge: u32, use_alpha: bool) -> Result<usize, RasterError> {
        let resampled = resample(self.raster, long_edge, self.filter)?;
        Ok(count_distinct_colors(&resampled, use_alpha))
    }
}

/// One-shot encode with no budget check.
///
/// # Errors
///
/// Returns `RasterError::DegenerateSize` when the target resolution collapses
/// one side of the image.
pub fn encode_fixed(
    raster: &SourceRaster,
    spec: &TargetSpec,
    config: &EngineConfig,
) -> Result<EncodedOutput, RasterError> {
    Evaluator::new(raster, config).encode(spec)
}

/// Encode and reject results above the configured ceiling.
///
/// # Errors
///
/// Returns `BudgetError::OverBudget` (carrying the computed cost) when the
/// markup is too large, or `BudgetError::Raster` for degenerate targets.
pub fn encode_under_budget(
    raster: &SourceRaster,
    spec: &TargetSpec,
    config: &EngineConfig,
) -> Result<EncodedOutput, BudgetError> {
    Evaluator::new(raster, config).evaluate(spec)
}
