//! Source rasters and the resampler.
//!
//! A [`SourceRaster`] is the caller-owned decoded image. Every encode attempt
//! starts by resampling it to the attempt's long edge with [`resample`].

mod resample;
mod types;

pub use resample::{resample, target_dimensions, ResampleFilter};
pub use types::{
    PixelFormat, RasterError, SourceRaster, TargetSpec, MAX_MANUAL_LONG_EDGE, MAX_PALETTE_SIZE,
    MIN_MANUAL_LONG_EDGE,
};
