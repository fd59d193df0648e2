//! Core types for source rasters and encode targets.

use image::{DynamicImage, Rgba, RgbaImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest palette the markup channel can address.
pub const MAX_PALETTE_SIZE: u16 = 256;

/// Smallest long edge accepted from manual entry.
pub const MIN_MANUAL_LONG_EDGE: u32 = 2;

/// Largest long edge accepted from manual entry. Searches are not bound by it.
pub const MAX_MANUAL_LONG_EDGE: u32 = 300;

/// Error types for raster construction and resampling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Pixel buffer length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Resampling would produce an image with a zero-length side.
    #[error("Degenerate size: resampled to {width}x{height}")]
    DegenerateSize { width: u32, height: u32 },

    /// A target parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Channel layout of a source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 3 bytes per pixel.
    #[default]
    Rgb8,
    /// 4 bytes per pixel, straight alpha.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Whether the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba8)
    }
}

/// An immutable decoded pixel grid supplied by the caller.
///
/// The engine only ever reads from a `SourceRaster`; every encode attempt
/// derives fresh buffers from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRaster {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl SourceRaster {
    /// Create a raster from row-major pixel data.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::DegenerateSize` for a zero dimension and
    /// `RasterError::InvalidPixelData` when the buffer length is wrong.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::DegenerateSize { width, height });
        }

        let expected = (width as usize) * (height as usize) * format.channels();
        if pixels.len() != expected {
            return Err(RasterError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Create a raster from an `image::RgbImage`.
    pub fn from_rgb_image(img: RgbImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelFormat::Rgb8, img.into_raw())
    }

    /// Create a raster from an `image::RgbaImage`.
    pub fn from_rgba_image(img: RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelFormat::Rgba8, img.into_raw())
    }

    /// Create a raster from any decoded image, keeping alpha only when present.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, RasterError> {
        if img.color().has_alpha() {
            Self::from_rgba_image(img.into_rgba8())
        } else {
            Self::from_rgb_image(img.into_rgb8())
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Length of the longer side.
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Expand to RGBA8. RGB sources become fully opaque.
    pub fn to_rgba_image(&self) -> RgbaImage {
        match self.format {
            PixelFormat::Rgba8 => RgbaImage::from_fn(self.width, self.height, |x, y| {
                let i = ((y * self.width + x) as usize) * 4;
                Rgba([
                    self.pixels[i],
                    self.pixels[i + 1],
                    self.pixels[i + 2],
                    self.pixels[i + 3],
                ])
            }),
            PixelFormat::Rgb8 => RgbaImage::from_fn(self.width, self.height, |x, y| {
                let i = ((y * self.width + x) as usize) * 3;
                Rgba([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], 255])
            }),
        }
    }
}

/// Parameters that fully determine one encode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    /// Pixel count of the longer output side.
    pub long_edge: u32,
    /// Maximum number of palette entries (1-256).
    pub palette_size: u16,
    /// Emit 8-digit hex codes and keep the alpha channel.
    pub use_alpha: bool,
}

impl TargetSpec {
    /// Create a target, validating the parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` if `long_edge` is zero or
    /// `palette_size` is outside 1-256.
    pub fn new(long_edge: u32, palette_size: u16, use_alpha: bool) -> Result<Self, RasterError> {
        if long_edge == 0 {
            return Err(RasterError::InvalidParameter(
                "long edge must be at least 1 pixel".to_string(),
            ));
        }
        if palette_size == 0 || palette_size > MAX_PALETTE_SIZE {
            return Err(RasterError::InvalidParameter(format!(
                "palette size {palette_size} is outside 1-{MAX_PALETTE_SIZE}"
            )));
        }
        Ok(Self {
            long_edge,
            palette_size,
            use_alpha,
        })
    }

    /// Stricter check applied to values typed in by a user.
    pub fn validate_manual(&self) -> Result<(), RasterError> {
        if !(MIN_MANUAL_LONG_EDGE..=MAX_MANUAL_LONG_EDGE).contains(&self.long_edge) {
            return Err(RasterError::InvalidParameter(format!(
                "long edge {} is outside {MIN_MANUAL_LONG_EDGE}-{MAX_MANUAL_LONG_EDGE}",
                self.long_edge
            )));
        }
        Self::new(self.long_edge, self.palette_size, self.use_alpha).map(|_| ())
    }

    /// Same target with a different long edge.
    pub fn with_long_edge(self, long_edge: u32) -> Self {
        Self { long_edge, ..self }
    }

    /// Same target with a different palette size, clamped to 1-256.
    pub fn with_palette_size(self, palette_size: u16) -> Self {
        Self {
            palette_size: palette_size.clamp(1, MAX_PALETTE_SIZE),
            ..self
        }
    }
}
