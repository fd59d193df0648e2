//! Palette quantization.
//!
//! Reduces a resampled raster to at most N colors and replaces every pixel
//! with an index into the resulting palette. Images that already fit keep
//! their exact colors; larger ones get a NeuQuant palette. Pixels map to the
//! nearest entry by squared Euclidean distance over the active channels.
//!
//! The palette only ever contains colors that at least one pixel maps to, so
//! its length never exceeds the number of distinct colors in the input.

mod neuquant;

use std::collections::{BTreeSet, HashMap};

use image::{Rgba, RgbaImage};

use crate::raster::MAX_PALETTE_SIZE;

/// Ordered palette of representative colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
    has_alpha: bool,
}

impl Palette {
    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }

    /// Whether colors carry a meaningful alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Rgba<u8>> {
        self.colors.get(index as usize).copied()
    }
}

/// A raster of palette indices plus its palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedRaster {
    width: u32,
    height: u32,
    palette: Palette,
    indices: Vec<u8>,
}

impl QuantizedRaster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Row-major palette indices.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Iterate over rows of resolved colors, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Rgba<u8>> + '_> + '_ {
        let width = (self.width as usize).max(1);
        self.indices.chunks(width).map(move |row| {
            row.iter()
                .map(move |&i| self.palette.colors[i as usize])
        })
    }

    /// Materialize the quantized colors as an RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let i = self.indices[(y * self.width + x) as usize];
            self.palette.colors[i as usize]
        })
    }

    /// Build a quantized raster directly from a palette and indices.
    ///
    /// Returns `None` if the index count doesn't match the dimensions or an
    /// index points outside the palette.
    pub fn from_parts(
        width: u32,
        height: u32,
        colors: Vec<Rgba<u8>>,
        has_alpha: bool,
        indices: Vec<u8>,
    ) -> Option<Self> {
        if indices.len() != (width as usize) * (height as usize)
            || indices.iter().any(|&i| i as usize >= colors.len())
        {
            return None;
        }
        Some(Self {
            width,
            height,
            palette: Palette { colors, has_alpha },
            indices,
        })
    }
}

/// Quantize an RGBA image to at most `palette_size` colors.
///
/// When `use_alpha` is false every pixel is treated as fully opaque before
/// palette selection. `palette_size` is clamped to 1-256.
pub fn quantize(image: &RgbaImage, palette_size: u16, use_alpha: bool) -> QuantizedRaster {
    let max_colors = palette_size.clamp(1, MAX_PALETTE_SIZE) as usize;

    let pixels: Vec<Rgba<u8>> = image
        .pixels()
        .map(|p| if use_alpha { *p } else { Rgba([p[0], p[1], p[2], 255]) })
        .collect();

    let distinct: BTreeSet<[u8; 4]> = pixels.iter().map(|p| p.0).collect();
    let candidates: Vec<Rgba<u8>> = if distinct.len() <= max_colors {
        distinct.iter().copied().map(Rgba).collect()
    } else {
        neuquant::learn_palette(&pixels, max_colors, use_alpha)
    };

    // Resolve each distinct color once, then compact away unused entries.
    let lookup: HashMap<[u8; 4], usize> = distinct
        .iter()
        .map(|color| (*color, nearest(&candidates, color, use_alpha)))
        .collect();

    let mut remap: Vec<Option<u8>> = vec![None; candidates.len()];
    let mut colors = Vec::with_capacity(candidates.len());
    let indices = pixels
        .iter()
        .map(|px| {
            let candidate = lookup[&px.0];
            *remap[candidate].get_or_insert_with(|| {
                colors.push(candidates[candidate]);
                (colors.len() - 1) as u8
            })
        })
        .collect();

    QuantizedRaster {
        width: image.width(),
        height: image.height(),
        palette: Palette {
            colors,
            has_alpha: use_alpha,
        },
        indices,
    }
}

/// Number of distinct colors left after quantizing to a full 256-color palette.
pub fn count_distinct_colors(image: &RgbaImage, use_alpha: bool) -> usize {
    quantize(image, MAX_PALETTE_SIZE, use_alpha).palette.len()
}

fn nearest(palette: &[Rgba<u8>], color: &[u8; 4], use_alpha: bool) -> usize {
    let channels = if use_alpha { 4 } else { 3 };
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| {
            (0..channels)
                .map(|c| {
                    let d = i32::from(p[c]) - i32::from(color[c]);
                    (d * d) as u32
                })
                .sum::<u32>()
        })
        .map_or(0, |(i, _)| i)
}
