//! WASM-compatible playlist navigator

use super::to_js_error;
use crate::view::PlaylistSnapshot;
use crate::{BatchProgress, DecodeOutcome, EndedAction, Navigator, PendingBatches, TrackId};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// Playlist navigator for JS hosts
///
/// Track media lives in JS, keyed by the numeric ids returned from
/// `beginBatch`.
#[wasm_bindgen]
pub struct WasmNavigator {
    inner: Navigator<()>,
    batches: PendingBatches<()>,

    // Event callbacks
    on_change: Option<Function>,
    on_decode_error: Option<Function>,
}

#[wasm_bindgen]
impl WasmNavigator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        Self {
            inner: Navigator::new(),
            batches: PendingBatches::new(),
            on_change: None,
            on_decode_error: None,
        }
    }

    // ===== Loading =====

    /// Open a batch for selected file names; returns their track ids
    #[wasm_bindgen(js_name = beginBatch)]
    pub fn begin_batch(&mut self, names: JsValue) -> Result<JsValue, JsValue> {
        let names: Vec<String> = serde_wasm_bindgen::from_value(names)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse names: {}", e)))?;

        let batch = self.batches.begin(names.into_iter().map(|name| (name, ())));
        let ids = self.batches.ids(batch);
        // Empty selection
        self.commit_settled();

        serde_wasm_bindgen::to_value(&ids)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Report `canplaythrough` for a track (duration in seconds)
    #[wasm_bindgen(js_name = decodeReady)]
    pub fn decode_ready(&mut self, id: f64, duration_secs: f64) -> Result<bool, JsValue> {
        self.resolve(id, DecodeOutcome::ready_secs(duration_secs))
    }

    /// Report a media `error` for a track
    #[wasm_bindgen(js_name = decodeFailed)]
    pub fn decode_failed(&mut self, id: f64, message: String) -> Result<bool, JsValue> {
        self.resolve(id, DecodeOutcome::failed(message))
    }

    // ===== Navigation =====

    pub fn next(&mut self) -> Result<usize, JsValue> {
        let previous = self.inner.next().map_err(|e| to_js_error(&e))?;
        self.emit_change();
        Ok(previous)
    }

    pub fn previous(&mut self) -> Result<usize, JsValue> {
        let previous = self.inner.previous().map_err(|e| to_js_error(&e))?;
        self.emit_change();
        Ok(previous)
    }

    #[wasm_bindgen(js_name = selectIndex)]
    pub fn select_index(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.select_index(index).map_err(|e| to_js_error(&e))?;
        self.emit_change();
        Ok(())
    }

    /// Handle media `ended`; returns true when the same track should replay
    #[wasm_bindgen(js_name = trackEnded)]
    pub fn track_ended(&mut self) -> Result<bool, JsValue> {
        let action = self.inner.on_track_ended().map_err(|e| to_js_error(&e))?;
        self.emit_change();
        Ok(matches!(action, EndedAction::Replay { .. }))
    }

    #[wasm_bindgen(js_name = removeTrack)]
    pub fn remove_track(&mut self, id: f64) -> Result<(), JsValue> {
        self.inner
            .remove_track(track_id(id)?)
            .map_err(|e| to_js_error(&e))?;
        self.emit_change();
        Ok(())
    }

    #[wasm_bindgen(js_name = setShuffle)]
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.inner.set_shuffle(enabled);
        self.emit_change();
    }

    #[wasm_bindgen(js_name = setRepeat)]
    pub fn set_repeat(&mut self, enabled: bool) {
        self.inner.set_repeat(enabled);
        self.emit_change();
    }

    // ===== State Queries =====

    /// Id of the current track, if any
    #[wasm_bindgen(js_name = currentId)]
    pub fn current_id(&self) -> Option<f64> {
        self.inner.current().ok().map(|t| t.id.as_f64())
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> Option<usize> {
        self.inner.current_index()
    }

    /// Song list snapshot as a plain JS object
    pub fn snapshot(&self) -> JsValue {
        let snapshot = PlaylistSnapshot::capture(&self.inner, false);
        serde_wasm_bindgen::to_value(&snapshot).unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        self.on_change = Some(callback);
    }

    #[wasm_bindgen(js_name = onDecodeError)]
    pub fn on_decode_error(&mut self, callback: Function) {
        self.on_decode_error = Some(callback);
    }

    // ===== Internal =====

    fn resolve(&mut self, id: f64, outcome: DecodeOutcome) -> Result<bool, JsValue> {
        let progress = self
            .batches
            .resolve(track_id(id)?, outcome)
            .map_err(|e| to_js_error(&e))?;
        self.commit_settled();
        Ok(progress == BatchProgress::Complete)
    }

    fn commit_settled(&mut self) {
        let settled = self.batches.take_settled();
        if settled.is_empty() {
            return;
        }

        for outcome in settled {
            for error in &outcome.errors {
                if let Some(ref cb) = self.on_decode_error {
                    cb.call3(
                        &JsValue::NULL,
                        &JsValue::from_f64(error.id.as_f64()),
                        &JsValue::from_str(&error.name),
                        &JsValue::from_str(&error.message),
                    )
                    .ok();
                }
            }
            self.inner.add_tracks(outcome.tracks);
        }
        self.emit_change();
    }

    fn emit_change(&self) {
        if let Some(ref cb) = self.on_change {
            cb.call1(&JsValue::NULL, &self.snapshot()).ok();
        }
    }
}

fn track_id(raw: f64) -> Result<TrackId, JsValue> {
    TrackId::from_f64(raw).map_err(|e| to_js_error(&e))
}

impl Default for WasmNavigator {
    fn default() -> Self {
        Self::new()
    }
}
