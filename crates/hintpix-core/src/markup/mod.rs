//! Markup encoding.
//!
//! Turns a quantized raster into hint markup: a preamble, one color tag per
//! run and one glyph per pixel, with a literal `\n` escape after each row.
//!
//! # Examples
//!
//! ```ignore
//! use hintpix_core::markup::{encode_quantized, MarkupStyle};
//!
//! let output = encode_quantized(&quantized, &MarkupStyle::default());
//! assert_eq!(output.markup.len(), output.byte_cost);
//! ```

mod encoder;
mod format;

pub use encoder::{byte_cost, encode_quantized, EncodedOutput};
pub use format::{
    hex_code, new_color_cost, MarkupStyle, OutputTarget, GLYPH, NEW_COLOR_ALPHA_COST,
    NEW_COLOR_COST, REPEAT_COST, ROW_BREAK, ROW_BREAK_COST,
};
