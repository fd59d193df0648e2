//! Animated hint scripts built from a sequence of frames.
//!
//! Each frame is encoded on its own with [`MarkupStyle::frame`], saved into a
//! script variable, and then shown in order:
//!
//! ```text
//! SAVE {FR0} <line-height=87%>...
//! SAVE {FR1} <line-height=87%>...
//! HINT 1 {FR0}
//! WAITSEC 0.5
//! HINT 1 {FR1}
//! WAITSEC 0.5
//! ```

use serde::{Deserialize, Serialize};

use crate::budget::Evaluator;
use crate::config::EngineConfig;
use crate::markup::{EncodedOutput, MarkupStyle};
use crate::raster::{RasterError, SourceRaster, TargetSpec};

/// Timing for an animated hint script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameScript {
    /// Seconds each `HINT` stays on screen.
    pub hint_duration: u32,
    /// Seconds to wait before the next frame.
    pub wait_seconds: f32,
}

impl Default for FrameScript {
    fn default() -> Self {
        Self {
            hint_duration: 1,
            wait_seconds: 0.5,
        }
    }
}

impl FrameScript {
    /// Assemble the script text for already-encoded frames.
    pub fn render(&self, frames: &[EncodedOutput]) -> String {
        let saves = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| format!("SAVE {{FR{i}}} {}\n", frame.markup));
        let shows = (0..frames.len()).map(|i| {
            format!(
                "HINT {} {{FR{i}}}\nWAITSEC {}\n",
                self.hint_duration, self.wait_seconds
            )
        });
        saves.chain(shows).collect()
    }
}

/// Encode every frame with the same target.
///
/// Frames are independent: the run state resets at the start of each one.
/// With the `parallel` feature frames are encoded on the rayon pool; output
/// order always matches input order.
///
/// # Errors
///
/// Returns the first `RasterError` encountered, e.g. a degenerate target.
pub fn encode_frames(
    frames: &[SourceRaster],
    spec: &TargetSpec,
    config: &EngineConfig,
) -> Result<Vec<EncodedOutput>, RasterError> {
    let encode = |raster: &SourceRaster| {
        Evaluator::new(raster, config)
            .with_style(MarkupStyle::frame())
            .encode(spec)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        frames.par_iter().map(encode).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        frames.iter().map(encode).collect()
    }
}
