//! Hintpix WASM - WebAssembly bindings for Hintpix
//!
//! This crate exposes the hintpix-core encoder and searches to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types and config conversion
//! - `decode` - Image file decoding into a source raster
//! - `encode` - Fixed, budget-checked and native encodes
//! - `search` - Maximum resolution and maximum palette searches
//! - `preview` - PNG previews of a target
//! - `sequence` - Animated frame scripts
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, search_max_resolution } from '@hintpix/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const raster = decode_image(bytes);
//! const result = search_max_resolution(raster, 16, false, { ceilingPercent: 90 });
//! console.log(`${result.spec.longEdge}px, ${result.output.byteCost} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod preview;
mod search;
mod sequence;
mod types;

pub use decode::decode_image;
pub use encode::{encode_fixed, encode_native, encode_under_budget};
pub use preview::render_preview_png;
pub use search::{search_max_palette, search_max_resolution};
pub use sequence::JsFrameSequence;
pub use types::JsSourceRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
