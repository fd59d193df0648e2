//! WASM-compatible wrapper types.
//!
//! Settings and targets cross the boundary as plain JavaScript objects and are
//! converted with `serde_wasm_bindgen`. Pixel data stays in WASM memory inside
//! [`JsSourceRaster`].

use hintpix_core::{EngineConfig, PixelFormat, SourceRaster, TargetSpec};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A source image held in WASM memory.
///
/// Decoding once and reusing the raster across searches avoids copying the
/// pixel buffer on every call.
#[wasm_bindgen]
pub struct JsSourceRaster {
    inner: SourceRaster,
}

#[wasm_bindgen]
impl JsSourceRaster {
    /// Create a raster from packed pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB or RGBA pixel data, row-major
    /// * `has_alpha` - `true` when `pixels` holds 4 bytes per pixel
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        has_alpha: bool,
    ) -> Result<JsSourceRaster, JsValue> {
        let format = if has_alpha {
            PixelFormat::Rgba8
        } else {
            PixelFormat::Rgb8
        };
        SourceRaster::new(width, height, format, pixels)
            .map(JsSourceRaster::from_core)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn has_alpha(&self) -> bool {
        self.inner.format().has_alpha()
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer also releases it.
    pub fn free(self) {}
}

impl JsSourceRaster {
    pub(crate) fn from_core(inner: SourceRaster) -> Self {
        Self { inner }
    }

    pub(crate) fn core(&self) -> &SourceRaster {
        &self.inner
    }
}

/// Read an [`EngineConfig`] from a JS object. `undefined` and `null` give the
/// defaults; the result is validated.
pub(crate) fn config_from_js(value: JsValue) -> Result<EngineConfig, JsValue> {
    let config: EngineConfig = if value.is_undefined() || value.is_null() {
        EngineConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
    };
    config.validate().map_err(to_js_error)?;
    Ok(config)
}

pub(crate) fn target_spec(
    long_edge: u32,
    palette_size: u16,
    use_alpha: bool,
) -> Result<TargetSpec, JsValue> {
    TargetSpec::new(long_edge, palette_size, use_alpha).map_err(to_js_error)
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

pub(crate) fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
