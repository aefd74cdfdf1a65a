//! WASM-compatible seek slider

use super::to_js_error;
use crate::{SeekSlider, SliderEvent};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// Seek slider with JS callbacks for live and committed values
#[wasm_bindgen]
pub struct WasmSeekSlider {
    inner: SeekSlider,
    on_live: Option<Function>,
    on_commit: Option<Function>,
}

#[wasm_bindgen]
impl WasmSeekSlider {
    /// Create a slider; throws on a malformed range
    #[wasm_bindgen(constructor)]
    pub fn new(min: f64, max: f64, step: f64) -> Result<WasmSeekSlider, JsValue> {
        let inner = SeekSlider::new(min, max, step).map_err(|e| to_js_error(&e))?;
        Ok(Self {
            inner,
            on_live: None,
            on_commit: None,
        })
    }

    /// Mirror playback position (ignored mid-drag)
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, value: f64) {
        self.inner.set_value(value);
    }

    /// Resize for a new track duration
    #[wasm_bindgen(js_name = setRange)]
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), JsValue> {
        self.inner.set_range(min, max).map_err(|e| to_js_error(&e))
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, ratio: f64) {
        let event = self.inner.pointer_down(ratio);
        self.emit(Some(event));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, ratio: f64) {
        let event = self.inner.pointer_move(ratio);
        self.emit(event);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        let event = self.inner.pointer_up();
        self.emit(event);
    }

    pub fn click(&mut self, ratio: f64) {
        let event = self.inner.click(ratio);
        self.emit(Some(event));
    }

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> f64 {
        self.inner.value()
    }

    /// Fill percentage for the track background (never NaN)
    #[wasm_bindgen(getter)]
    pub fn filled(&self) -> f64 {
        self.inner.fill_percent()
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    // ===== Event Listeners =====

    #[wasm_bindgen(js_name = onLive)]
    pub fn on_live(&mut self, callback: Function) {
        self.on_live = Some(callback);
    }

    #[wasm_bindgen(js_name = onCommit)]
    pub fn on_commit(&mut self, callback: Function) {
        self.on_commit = Some(callback);
    }

    fn emit(&self, event: Option<SliderEvent>) {
        let (callback, value) = match event {
            Some(SliderEvent::Live(v)) => (self.on_live.as_ref(), v),
            Some(SliderEvent::Commit(v)) => (self.on_commit.as_ref(), v),
            None => return,
        };
        if let Some(cb) = callback {
            cb.call1(&JsValue::NULL, &JsValue::from_f64(value)).ok();
        }
    }
}
