//! Run-length color encoder.
//!
//! Walks a quantized raster row-major and emits a color tag only when the
//! pixel color differs from the previous pixel. The previous color carries
//! across row breaks, so a run that wraps onto the next row stays a run.

use image::Rgba;
use serde::Serialize;

use super::format::{
    new_color_cost, push_color_token, MarkupStyle, GLYPH, REPEAT_COST, ROW_BREAK, ROW_BREAK_COST,
};
use crate::quantize::QuantizedRaster;

/// Result of one encode pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedOutput {
    /// The markup text, ready to paste.
    pub markup: String,
    /// Exact byte cost of `markup`.
    pub byte_cost: usize,
    /// Encoded width in glyphs.
    pub width: u32,
    /// Encoded height in rows.
    pub height: u32,
    /// Number of palette colors the raster actually uses.
    pub colors_used: usize,
}

struct Fold {
    markup: String,
    byte_cost: usize,
    previous: Option<Rgba<u8>>,
}

impl Fold {
    fn pixel(mut self, color: Rgba<u8>, use_alpha: bool) -> Self {
        if self.previous == Some(color) {
            self.markup.push(GLYPH);
            self.byte_cost += REPEAT_COST;
        } else {
            push_color_token(&mut self.markup, color, use_alpha);
            self.byte_cost += new_color_cost(use_alpha);
        }
        self.previous = Some(color);
        self
    }

    fn row_break(mut self) -> Self {
        self.markup.push_str(ROW_BREAK);
        self.byte_cost += ROW_BREAK_COST;
        self
    }
}

/// Lower bound on the markup length, used to size the output buffer.
fn estimated_capacity(q: &QuantizedRaster, preamble: usize) -> usize {
    let pixels = (q.width() as usize) * (q.height() as usize);
    preamble + pixels * REPEAT_COST + (q.height() as usize) * ROW_BREAK_COST
}

/// Encode a quantized raster into markup.
///
/// Pure: the same raster and style always produce the same output.
pub fn encode_quantized(q: &QuantizedRaster, style: &MarkupStyle) -> EncodedOutput {
    let use_alpha = q.palette().has_alpha();
    let preamble = style.preamble();

    let mut markup = String::with_capacity(estimated_capacity(q, preamble.len()));
    markup.push_str(&preamble);

    let init = Fold {
        markup,
        byte_cost: preamble.len(),
        previous: None,
    };

    let fold = q.rows().fold(init, |acc, row| {
        row.fold(acc, |acc, color| acc.pixel(color, use_alpha))
            .row_break()
    });

    let fold = (0..style.trailing_row_breaks).fold(fold, |acc, _| acc.row_break());

    debug_assert_eq!(fold.markup.len(), fold.byte_cost, "cost accounting drifted");

    EncodedOutput {
        markup: fold.markup,
        byte_cost: fold.byte_cost,
        width: q.width(),
        height: q.height(),
        colors_used: q.palette().len(),
    }
}

/// Byte cost of a raster without building the markup string.
pub fn byte_cost(q: &QuantizedRaster, style: &MarkupStyle) -> usize {
    let new_color = new_color_cost(q.palette().has_alpha());
    let (pixels, _) = q
        .rows()
        .flatten()
        .fold((0usize, None), |(cost, previous), color| {
            let step = if previous == Some(color) {
                REPEAT_COST
            } else {
                new_color
            };
            (cost + step, Some(color))
        });

    style.preamble().len()
        + pixels
        + (q.height() as usize) * ROW_BREAK_COST
        + style.trailer_cost()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::OutputTarget;

    const A: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const B: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn raster(width: u32, height: u32, indices: Vec<u8>, alpha: bool) -> QuantizedRaster {
        QuantizedRaster::from_parts(width, height, vec![A, B], alpha, indices).unwrap()
    }

    fn plain() -> MarkupStyle {
        MarkupStyle::hint(OutputTarget::Plain)
    }

    const PREAMBLE: &str = "<size=5><line-height=84%>";

    #[test]
    fn test_two_by_two_two_rows() {
        let q = raster(2, 2, vec![0, 0, 1, 1], false);
        let out = encode_quantized(&q, &plain());

        let expected = format!("{PREAMBLE}<color=#ff0000>██\\n<color=#0000ff>██\\n");
        assert_eq!(out.markup, expected);
        assert_eq!(out.byte_cost, PREAMBLE.len() + 18 + 3 + 2 + 18 + 3 + 2);
        assert_eq!(out.byte_cost, out.markup.len());
        assert_eq!((out.width, out.height), (2, 2));
        assert_eq!(out.colors_used, 2);
    }

    #[test]
    fn test_run_continues_across_row_break() {
        // Last pixel of row 0 and first pixel of row 1 share a color
        let q = raster(2, 2, vec![1, 0, 0, 1], false);
        let out = encode_quantized(&q, &plain());

        let expected =
            format!("{PREAMBLE}<color=#0000ff>█<color=#ff0000>█\\n█<color=#0000ff>█\\n");
        assert_eq!(out.markup, expected);
        assert_eq!(out.byte_cost, PREAMBLE.len() + 18 + 18 + 2 + 3 + 18 + 2);
    }

    #[test]
    fn test_uniform_raster_single_tag() {
        let q = raster(3, 3, vec![0; 9], false);
        let out = encode_quantized(&q, &plain());
        assert_eq!(out.markup.matches("<color=").count(), 1);
        assert_eq!(out.byte_cost, PREAMBLE.len() + 18 + 8 * 3 + 3 * 2);
    }

    #[test]
    fn test_alpha_tokens() {
        let q = raster(2, 1, vec![0, 1], true);
        let out = encode_quantized(&q, &plain());
        let expected = format!("{PREAMBLE}<color=#FF0000FF>█<color=#0000FFFF>█\\n");
        assert_eq!(out.markup, expected);
        assert_eq!(out.byte_cost, PREAMBLE.len() + 20 + 20 + 2);
    }

    #[test]
    fn test_target_prefix_counted() {
        let q = raster(1, 1, vec![0], false);
        let out = encode_quantized(&q, &MarkupStyle::hint(OutputTarget::ScriptedEventsCommand));
        assert!(out.markup.starts_with("act HINT 10 <size=5>"));
        assert_eq!(out.byte_cost, "act HINT 10 ".len() + PREAMBLE.len() + 18 + 2);
    }

    #[test]
    fn test_frame_trailer() {
        let q = raster(1, 1, vec![0], false);
        let out = encode_quantized(&q, &MarkupStyle::frame());
        assert!(out.markup.ends_with(&"\\n".repeat(10)));
        assert_eq!(out.byte_cost, "<line-height=87%>".len() + 18 + 2 + 9 * 2);
    }

    #[test]
    fn test_byte_cost_matches_encode() {
        let q = raster(3, 2, vec![0, 1, 1, 1, 0, 0], false);
        assert_eq!(byte_cost(&q, &plain()), encode_quantized(&q, &plain()).byte_cost);
    }
}
