//! Aspect-preserving resampling to a target long edge.
//!
//! The long edge of the source is scaled to exactly `long_edge` pixels and the
//! short edge follows the original aspect ratio, rounded to the nearest pixel.
//! Only the resulting dimensions are a contract; pixel values depend on the
//! chosen filter.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::{RasterError, SourceRaster};

/// Interpolation filter used when resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResampleFilter {
    /// Nearest neighbor interpolation (fastest, blocky).
    Nearest,
    /// Bilinear interpolation.
    Bilinear,
    /// Bicubic (Catmull-Rom) interpolation.
    #[default]
    Bicubic,
    /// Lanczos3 interpolation (slowest, sharpest).
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResampleFilter::Nearest => image::imageops::FilterType::Nearest,
            ResampleFilter::Bilinear => image::imageops::FilterType::Triangle,
            ResampleFilter::Bicubic => image::imageops::FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Compute the output dimensions for a long-edge target.
///
/// # Errors
///
/// Returns `RasterError::DegenerateSize` when either side rounds below 1 pixel.
pub fn target_dimensions(
    src_width: u32,
    src_height: u32,
    long_edge: u32,
) -> Result<(u32, u32), RasterError> {
    let src_long = src_width.max(src_height);
    if src_long == 0 || long_edge == 0 {
        return Err(RasterError::DegenerateSize {
            width: 0,
            height: 0,
        });
    }

    let scale = long_edge as f64 / src_long as f64;
    let width = (src_width as f64 * scale).round() as u32;
    let height = (src_height as f64 * scale).round() as u32;

    if width < 1 || height < 1 {
        return Err(RasterError::DegenerateSize { width, height });
    }

    Ok((width, height))
}

/// Resample a source raster so that its long edge equals `long_edge`.
///
/// Upscaling is allowed. The result is always RGBA8; RGB sources come back
/// fully opaque.
///
/// # Errors
///
/// Returns `RasterError::DegenerateSize` when the short edge would vanish.
pub fn resample(
    raster: &SourceRaster,
    long_edge: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, RasterError> {
    let (width, height) = target_dimensions(raster.width(), raster.height(), long_edge)?;
    let rgba = raster.to_rgba_image();

    // Fast path: nothing to scale
    if raster.width() == width && raster.height() == height {
        return Ok(rgba);
    }

    Ok(image::imageops::resize(
        &rgba,
        width,
        height,
        filter.to_image_filter(),
    ))
}
