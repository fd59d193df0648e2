//! One-to-one encoding at the source's own resolution and color count.

use crate::budget::Evaluator;
use crate::config::EngineConfig;
use crate::markup::EncodedOutput;
use crate::quantize::count_distinct_colors;
use crate::raster::{RasterError, SourceRaster, TargetSpec};

/// Target that reproduces the source as closely as the markup allows.
///
/// Long edge is the source's long edge, the palette is the distinct color
/// count after quantizing to 256 colors, and alpha is kept only when the
/// source has an alpha channel.
pub fn native_spec(raster: &SourceRaster) -> Result<TargetSpec, RasterError> {
    let use_alpha = raster.format().has_alpha();
    let distinct = count_distinct_colors(&raster.to_rgba_image(), use_alpha);
    let palette_size = u16::try_from(distinct.max(1)).unwrap_or(u16::MAX);
    TargetSpec::new(raster.long_edge(), palette_size, use_alpha)
}

/// Encode at [`native_spec`] without a budget check.
///
/// Large sources will usually exceed the ceiling; callers compare
/// `byte_cost` against it themselves.
pub fn encode_native(
    raster: &SourceRaster,
    config: &EngineConfig,
) -> Result<(TargetSpec, EncodedOutput), RasterError> {
    let spec = native_spec(raster)?;
    let output = Evaluator::new(raster, config).encode(&spec)?;
    Ok((spec, output))
}
