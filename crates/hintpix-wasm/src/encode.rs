//! Single-attempt encode bindings.
//!
//! # Functions
//!
//! - [`encode_fixed`] - Encode a user-chosen target with no budget check
//! - [`encode_under_budget`] - Encode and reject results over the ceiling
//! - [`encode_native`] - Encode at the source's own resolution and colors
//!
//! Every function returns an `EncodedOutput` object:
//! `{ markup, byteCost, width, height, colorsUsed }`.

use crate::types::{config_from_js, target_spec, to_js, to_js_error, JsSourceRaster};
use hintpix_core::budget::{self, BudgetError};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Encode a manually chosen target.
///
/// The long edge must be within 2-300 and the palette within 1-256.
///
/// # Example
///
/// ```typescript
/// const out = encode_fixed(raster, 64, 16, false, { target: 'scriptedEventsCommand' });
/// navigator.clipboard.writeText(out.markup);
/// ```
#[wasm_bindgen]
pub fn encode_fixed(
    raster: &JsSourceRaster,
    long_edge: u32,
    palette_size: u16,
    use_alpha: bool,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let spec = target_spec(long_edge, palette_size, use_alpha)?;
    spec.validate_manual().map_err(to_js_error)?;
    let output = budget::encode_fixed(raster.core(), &spec, &config).map_err(to_js_error)?;
    to_js(&output)
}

/// Error object thrown when an encode is over budget.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverBudgetDetail {
    message: String,
    byte_cost: usize,
    ceiling: usize,
}

impl OverBudgetDetail {
    fn from_error(err: &BudgetError) -> Option<Self> {
        match *err {
            BudgetError::OverBudget { byte_cost, ceiling } => Some(Self {
                message: err.to_string(),
                byte_cost,
                ceiling,
            }),
            BudgetError::Raster(_) => None,
        }
    }
}

fn budget_error_to_js(err: BudgetError) -> JsValue {
    match OverBudgetDetail::from_error(&err) {
        Some(detail) => to_js(&detail).unwrap_or_else(|e| e),
        None => to_js_error(err),
    }
}

/// Encode a target and fail if it does not fit the configured ceiling.
///
/// An over-budget result throws `{ message, byteCost, ceiling }`; other
/// failures throw a string.
///
/// ```typescript
/// try {
///   encode_under_budget(raster, 120, 32, false);
/// } catch (e) {
///   if (typeof e === 'object') showOverage(e.byteCost - e.ceiling);
/// }
/// ```
#[wasm_bindgen]
pub fn encode_under_budget(
    raster: &JsSourceRaster,
    long_edge: u32,
    palette_size: u16,
    use_alpha: bool,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let spec = target_spec(long_edge, palette_size, use_alpha)?;
    let output =
        budget::encode_under_budget(raster.core(), &spec, &config).map_err(budget_error_to_js)?;
    to_js(&output)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NativeEncode {
    spec: hintpix_core::TargetSpec,
    output: hintpix_core::EncodedOutput,
    fits: bool,
}

/// Encode the source 1:1.
///
/// Returns `{ spec, output, fits }`, where `fits` tells whether the markup is
/// within the configured ceiling. Oversized results are still returned.
#[wasm_bindgen]
pub fn encode_native(raster: &JsSourceRaster, config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let (spec, output) = hintpix_core::encode_native(raster.core(), &config).map_err(to_js_error)?;
    let fits = config.ceiling().fits(output.byte_cost);
    to_js(&NativeEncode { spec, output, fits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hintpix_core::RasterError;

    #[test]
    fn test_over_budget_detail_fields() {
        let err = BudgetError::OverBudget {
            byte_cost: 120,
            ceiling: 100,
        };
        let detail = OverBudgetDetail::from_error(&err).unwrap();
        assert_eq!(detail.byte_cost, 120);
        assert_eq!(detail.ceiling, 100);
        assert_eq!(detail.message, err.to_string());
    }

    #[test]
    fn test_raster_error_has_no_detail() {
        let err = BudgetError::Raster(RasterError::DegenerateSize {
            width: 2,
            height: 0,
        });
        assert!(OverBudgetDetail::from_error(&err).is_none());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn stripes() -> JsSourceRaster {
        let pixels = (0..8 * 8)
            .flat_map(|i| if (i % 8) < 4 { [255, 0, 0] } else { [0, 0, 255] })
            .collect();
        JsSourceRaster::new(8, 8, pixels, false).unwrap()
    }

    fn markup_of(value: &JsValue) -> String {
        js_sys::Reflect::get(value, &JsValue::from_str("markup"))
            .unwrap()
            .as_string()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_encode_fixed_returns_markup() {
        let out = encode_fixed(&stripes(), 8, 2, false, JsValue::UNDEFINED).unwrap();
        assert!(markup_of(&out).starts_with("<size=5><line-height=84%><color=#ff0000>"));
    }

    #[wasm_bindgen_test]
    fn test_encode_fixed_rejects_manual_range() {
        assert!(encode_fixed(&stripes(), 1, 2, false, JsValue::UNDEFINED).is_err());
        assert!(encode_fixed(&stripes(), 301, 2, false, JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_under_budget_over() {
        let config = js_sys::JSON::parse(r#"{"maxByteSize": 40}"#).unwrap();
        let err = encode_under_budget(&stripes(), 8, 2, false, config).unwrap_err();
        let ceiling = js_sys::Reflect::get(&err, &JsValue::from_str("ceiling")).unwrap();
        let cost = js_sys::Reflect::get(&err, &JsValue::from_str("byteCost")).unwrap();
        assert_eq!(ceiling.as_f64(), Some(40.0));
        assert!(cost.as_f64().unwrap() > 40.0);
    }

    #[wasm_bindgen_test]
    fn test_encode_native_reports_fit() {
        let out = encode_native(&stripes(), JsValue::UNDEFINED).unwrap();
        let fits = js_sys::Reflect::get(&out, &JsValue::from_str("fits")).unwrap();
        assert_eq!(fits.as_bool(), Some(true));
    }
}
