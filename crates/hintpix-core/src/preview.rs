//! Preview rasters showing roughly how the markup will look in game.
//!
//! The quantized raster is scaled up with nearest-neighbor sampling so each
//! glyph becomes a flat block. Width is fixed by `EngineConfig::preview_width`;
//! height follows the source's aspect ratio, rounded down.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

use crate::budget::Evaluator;
use crate::config::EngineConfig;
use crate::raster::{RasterError, SourceRaster, TargetSpec};

/// Errors that can occur while rendering or encoding a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// A rendered preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub image: RgbaImage,
    /// Whether the alpha channel is meaningful.
    pub has_alpha: bool,
}

/// Preview dimensions for a source of `src_width` x `src_height`.
fn preview_dimensions(src_width: u32, src_height: u32, preview_width: u32) -> (u32, u32) {
    let height = (u64::from(src_height) * u64::from(preview_width)) / u64::from(src_width.max(1));
    (preview_width, u32::try_from(height).unwrap_or(u32::MAX).max(1))
}

/// Render the preview for one target.
///
/// # Errors
///
/// Returns `PreviewError::Raster` when the target is degenerate.
pub fn render_preview(
    raster: &SourceRaster,
    spec: &TargetSpec,
    config: &EngineConfig,
) -> Result<Preview, PreviewError> {
    let quantized = Evaluator::new(raster, config).quantize(spec)?;
    let (width, height) = preview_dimensions(raster.width(), raster.height(), config.preview_width);

    let image = image::imageops::resize(
        &quantized.to_rgba_image(),
        width,
        height,
        image::imageops::FilterType::Nearest,
    );

    Ok(Preview {
        image,
        has_alpha: spec.use_alpha,
    })
}

/// Encode a preview as PNG bytes. Opaque previews are written as RGB.
pub fn encode_preview_png(preview: &Preview) -> Result<Vec<u8>, PreviewError> {
    let (width, height) = preview.image.dimensions();
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);

    if preview.has_alpha {
        encoder.write_image(preview.image.as_raw(), width, height, ExtendedColorType::Rgba8)
    } else {
        let rgb = DynamicImage::ImageRgba8(preview.image.clone()).into_rgb8();
        encoder.write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
    }
    .map_err(|e| PreviewError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
