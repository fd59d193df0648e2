//! Search bindings.
//!
//! Both searches take an optional `should_cancel` callback. It is called with
//! no arguments before every encode attempt; a truthy return stops the search
//! with a "search cancelled" error. A callback that throws is treated as a
//! cancellation request.
//!
//! Both return a `SearchOutcome` object: `{ output, spec, evaluations }`.

use crate::types::{config_from_js, to_js, to_js_error, JsSourceRaster};
use hintpix_core::search;
use wasm_bindgen::prelude::*;

fn cancel_probe(callback: Option<js_sys::Function>) -> impl Fn() -> bool {
    move || match &callback {
        Some(f) => f
            .call0(&JsValue::NULL)
            .map(|v| v.is_truthy())
            .unwrap_or(true),
        None => false,
    }
}

/// Find the largest long edge whose markup fits the ceiling at a fixed palette.
///
/// # Example
///
/// ```typescript
/// let stop = false;
/// const result = search_max_resolution(raster, 32, false, { ceilingPercent: 95 }, () => stop);
/// console.log(result.spec.longEdge, result.output.byteCost);
/// ```
#[wasm_bindgen]
pub fn search_max_resolution(
    raster: &JsSourceRaster,
    palette_size: u16,
    use_alpha: bool,
    config: JsValue,
    should_cancel: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let outcome = search::search_max_resolution_with(
        raster.core(),
        palette_size,
        use_alpha,
        &config,
        &cancel_probe(should_cancel),
    )
    .map_err(to_js_error)?;
    to_js(&outcome)
}

/// Find the largest palette whose markup fits the ceiling at a fixed long edge.
#[wasm_bindgen]
pub fn search_max_palette(
    raster: &JsSourceRaster,
    long_edge: u32,
    use_alpha: bool,
    config: JsValue,
    should_cancel: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let outcome = search::search_max_palette_with(
        raster.core(),
        long_edge,
        use_alpha,
        &config,
        &cancel_probe(should_cancel),
    )
    .map_err(to_js_error)?;
    to_js(&outcome)
}
