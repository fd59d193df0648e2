//! Image file decoding.
//!
//! Accepts any format enabled on the `image` dependency (PNG and JPEG) and
//! keeps an alpha channel only when the file has one.

use crate::types::{to_js_error, JsSourceRaster};
use hintpix_core::SourceRaster;
use wasm_bindgen::prelude::*;

/// Decode an image file into a source raster.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported or intact image.
///
/// # Example
///
/// ```typescript
/// const raster = decode_image(new Uint8Array(await file.arrayBuffer()));
/// console.log(`${raster.width}x${raster.height}, alpha: ${raster.has_alpha}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceRaster, JsValue> {
    decode_source(bytes).map(JsSourceRaster::from_core)
}

fn decode_source(bytes: &[u8]) -> Result<SourceRaster, JsValue> {
    let img = image::load_from_memory(bytes).map_err(to_js_error)?;
    SourceRaster::from_dynamic(img).map_err(to_js_error)
}
