//! Preview bindings.

use crate::types::{config_from_js, target_spec, to_js_error, JsSourceRaster};
use hintpix_core::preview;
use wasm_bindgen::prelude::*;

/// Render a preview of a target as PNG bytes.
///
/// The preview is `previewWidth` pixels wide (1920 by default) with the
/// source's aspect ratio, each glyph drawn as a flat block.
///
/// # Example
///
/// ```typescript
/// const png = render_preview_png(raster, 64, 16, false);
/// img.src = URL.createObjectURL(new Blob([png], { type: 'image/png' }));
/// ```
#[wasm_bindgen]
pub fn render_preview_png(
    raster: &JsSourceRaster,
    long_edge: u32,
    palette_size: u16,
    use_alpha: bool,
    config: JsValue,
) -> Result<Vec<u8>, JsValue> {
    let config = config_from_js(config)?;
    let spec = target_spec(long_edge, palette_size, use_alpha)?;
    let rendered = preview::render_preview(raster.core(), &spec, &config).map_err(to_js_error)?;
    preview::encode_preview_png(&rendered).map_err(to_js_error)
}
