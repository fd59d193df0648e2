//! Hintpix Core - bitmap to hint markup engine
//!
//! This crate turns a raster image into color-tagged glyph markup that fits a
//! fixed byte budget, and searches for the largest resolution or palette that
//! still fits.
//!
//! The pipeline for one attempt is resample, quantize, encode:
//!
//! - [`raster`]: source images, target parameters and resampling
//! - [`quantize`]: palette reduction (exact colors or a NeuQuant palette)
//! - [`markup`]: run-length color markup and its byte cost
//! - [`budget`]: one attempt checked against the byte ceiling
//! - [`search`]: maximum resolution and maximum palette searches
//!
//! Around it sit [`native`] (1:1 encodes), [`preview`] (upscaled PNG previews
//! of a target) and [`sequence`] (animated frame scripts).

pub mod budget;
pub mod config;
pub mod markup;
pub mod native;
pub mod preview;
pub mod quantize;
pub mod raster;
pub mod search;
pub mod sequence;

pub use budget::{encode_fixed, encode_under_budget, BudgetError, ByteCeiling, Evaluator};
pub use config::{ConfigError, EngineConfig};
pub use markup::{EncodedOutput, MarkupStyle, OutputTarget};
pub use native::{encode_native, native_spec};
pub use preview::{encode_preview_png, render_preview, Preview, PreviewError};
pub use raster::{PixelFormat, RasterError, ResampleFilter, SourceRaster, TargetSpec};
pub use search::{
    search_max_palette, search_max_palette_with, search_max_resolution,
    search_max_resolution_with, CancelToken, Cancellation, Infeasible, SearchError, SearchOutcome,
};
pub use sequence::{encode_frames, FrameScript};
