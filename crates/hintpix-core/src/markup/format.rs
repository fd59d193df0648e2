//! Markup vocabulary: preamble, color tags, glyphs, row breaks and their byte costs.
//!
//! Every token has a fixed byte length, which is what makes incremental cost
//! accounting exact: the cost of a run of tokens is the byte length of the
//! text it produces.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Solid block glyph drawn for every pixel (3 bytes in UTF-8).
pub const GLYPH: char = '█';

/// Literal backslash-n escape appended after each row.
pub const ROW_BREAK: &str = "\\n";

/// Bytes charged for a color tag plus glyph with a 6-digit hex code.
pub const NEW_COLOR_COST: usize = 18;

/// Bytes charged for a color tag plus glyph with an 8-digit hex code.
pub const NEW_COLOR_ALPHA_COST: usize = 20;

/// Bytes charged for a bare glyph that repeats the previous color.
pub const REPEAT_COST: usize = 3;

/// Bytes charged per row break.
pub const ROW_BREAK_COST: usize = 2;

/// Cost of a new-color token.
#[inline]
pub fn new_color_cost(use_alpha: bool) -> usize {
    if use_alpha {
        NEW_COLOR_ALPHA_COST
    } else {
        NEW_COLOR_COST
    }
}

/// Hex code for a color tag.
///
/// Alpha codes are upper-case `#RRGGBBAA`, opaque codes lower-case `#rrggbb`;
/// the downstream renderer accepts both and existing output uses this split.
pub fn hex_code(color: Rgba<u8>, use_alpha: bool) -> String {
    let [r, g, b, a] = color.0;
    if use_alpha {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Push a color tag followed by one glyph.
pub(crate) fn push_color_token(out: &mut String, color: Rgba<u8>, use_alpha: bool) {
    out.push_str("<color=");
    out.push_str(&hex_code(color, use_alpha));
    out.push('>');
    out.push(GLYPH);
}

/// Where the markup is going to be pasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputTarget {
    /// Raw hint text.
    #[default]
    Plain,
    /// A line in a ScriptedEvents script.
    ScriptedEventsScript,
    /// A ScriptedEvents command typed into the remote admin console.
    ScriptedEventsCommand,
}

impl OutputTarget {
    /// Text placed before the formatting tags.
    pub fn prefix(self) -> &'static str {
        match self {
            OutputTarget::Plain => "",
            OutputTarget::ScriptedEventsScript => "HINT 10 ",
            OutputTarget::ScriptedEventsCommand => "act HINT 10 ",
        }
    }
}

/// Fixed framing around the pixel tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupStyle {
    pub target: OutputTarget,
    /// Glyph size tag, omitted when `None`.
    pub size: Option<u32>,
    /// Line height as a percentage of the glyph height.
    pub line_height_percent: u32,
    /// Extra row breaks appended after the last row.
    pub trailing_row_breaks: u32,
}

impl Default for MarkupStyle {
    fn default() -> Self {
        Self::hint(OutputTarget::Plain)
    }
}

impl MarkupStyle {
    /// Style for a single hint image.
    pub fn hint(target: OutputTarget) -> Self {
        Self {
            target,
            size: Some(5),
            line_height_percent: 84,
            trailing_row_breaks: 0,
        }
    }

    /// Style for one frame of an animated hint script.
    pub fn frame() -> Self {
        Self {
            target: OutputTarget::Plain,
            size: None,
            line_height_percent: 87,
            trailing_row_breaks: 9,
        }
    }

    /// The preamble emitted before the first pixel.
    pub fn preamble(&self) -> String {
        let mut out = String::from(self.target.prefix());
        if let Some(size) = self.size {
            out.push_str(&format!("<size={size}>"));
        }
        out.push_str(&format!("<line-height={}%>", self.line_height_percent));
        out
    }

    /// Bytes charged for the trailer.
    pub fn trailer_cost(&self) -> usize {
        self.trailing_row_breaks as usize * ROW_BREAK_COST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_preamble() {
        assert_eq!(
            MarkupStyle::hint(OutputTarget::Plain).preamble(),
            "<size=5><line-height=84%>"
        );
        assert_eq!(
            MarkupStyle::hint(OutputTarget::ScriptedEventsScript).preamble(),
            "HINT 10 <size=5><line-height=84%>"
        );
        assert_eq!(
            MarkupStyle::hint(OutputTarget::ScriptedEventsCommand).preamble(),
            "act HINT 10 <size=5><line-height=84%>"
        );
    }

    #[test]
    fn test_frame_preamble() {
        let style = MarkupStyle::frame();
        assert_eq!(style.preamble(), "<line-height=87%>");
        assert_eq!(style.trailer_cost(), 18);
    }

    #[test]
    fn test_hex_code_opaque_is_lowercase() {
        assert_eq!(hex_code(Rgba([255, 171, 0, 255]), false), "#ffab00");
    }

    #[test]
    fn test_hex_code_alpha_is_uppercase() {
        assert_eq!(hex_code(Rgba([255, 171, 0, 16]), true), "#FFAB0010");
    }

    #[test]
    fn test_token_costs_match_byte_lengths() {
        let mut opaque = String::new();
        push_color_token(&mut opaque, Rgba([1, 2, 3, 4]), false);
        assert_eq!(opaque.len(), NEW_COLOR_COST);

        let mut alpha = String::new();
        push_color_token(&mut alpha, Rgba([1, 2, 3, 4]), true);
        assert_eq!(alpha.len(), NEW_COLOR_ALPHA_COST);

        assert_eq!(GLYPH.len_utf8(), REPEAT_COST);
        assert_eq!(ROW_BREAK.len(), ROW_BREAK_COST);
    }
}
