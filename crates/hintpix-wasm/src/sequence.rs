//! Frame script bindings.
//!
//! Frames are collected one at a time, then encoded with a shared target:
//!
//! ```typescript
//! const seq = new JsFrameSequence();
//! for (const bytes of frames) seq.push_encoded(bytes);
//! const script = seq.script(48, 32, false, undefined, { hintDuration: 1, waitSeconds: 0.5 });
//! ```

use crate::types::{config_from_js, target_spec, to_js_error, JsSourceRaster};
use hintpix_core::{encode_frames, FrameScript, SourceRaster};
use wasm_bindgen::prelude::*;

/// An ordered list of animation frames held in WASM memory.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsFrameSequence {
    frames: Vec<SourceRaster>,
}

#[wasm_bindgen]
impl JsFrameSequence {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsFrameSequence {
        JsFrameSequence::default()
    }

    /// Append a copy of an already-decoded frame.
    pub fn push(&mut self, frame: &JsSourceRaster) {
        self.frames.push(frame.core().clone());
    }

    /// Decode an image file and append it as the next frame.
    pub fn push_encoded(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let img = image::load_from_memory(bytes).map_err(to_js_error)?;
        let frame = SourceRaster::from_dynamic(img).map_err(to_js_error)?;
        self.frames.push(frame);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.frames.len()
    }

    /// Encode every frame and assemble the animated hint script.
    ///
    /// `timing` is `{ hintDuration, waitSeconds }`; missing keys default to
    /// 1 and 0.5.
    pub fn script(
        &self,
        long_edge: u32,
        palette_size: u16,
        use_alpha: bool,
        config: JsValue,
        timing: JsValue,
    ) -> Result<String, JsValue> {
        let config = config_from_js(config)?;
        let spec = target_spec(long_edge, palette_size, use_alpha)?;
        let timing: FrameScript = if timing.is_undefined() || timing.is_null() {
            FrameScript::default()
        } else {
            serde_wasm_bindgen::from_value(timing)
                .map_err(|e| JsValue::from_str(&format!("Invalid timing: {}", e)))?
        };
        let encoded = encode_frames(&self.frames, &spec, &config).map_err(to_js_error)?;
        Ok(timing.render(&encoded))
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_script_lists_every_frame() {
        let mut seq = JsFrameSequence::new();
        for shade in [0u8, 128, 255] {
            let frame = JsSourceRaster::new(2, 2, vec![shade; 12], false).unwrap();
            seq.push(&frame);
        }
        let script = seq
            .script(2, 1, false, JsValue::UNDEFINED, JsValue::UNDEFINED)
            .unwrap();
        assert!(script.starts_with("SAVE {FR0} <line-height=87%>"));
        assert!(script.contains("HINT 1 {FR2}\nWAITSEC 0.5\n"));
    }

    #[wasm_bindgen_test]
    fn test_push_encoded_rejects_garbage() {
        let mut seq = JsFrameSequence::new();
        assert!(seq.push_encoded(&[1, 2, 3]).is_err());
        assert_eq!(seq.length(), 0);
    }
}
