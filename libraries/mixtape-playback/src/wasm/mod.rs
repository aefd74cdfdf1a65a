//! WASM bindings for mixtape-playback
//!
//! Exposes the navigator and the seek slider to JavaScript. Media elements
//! stay on the JS side, keyed by the track ids handed out here.

pub mod navigator;
pub mod slider;

pub use navigator::WasmNavigator;
pub use slider::WasmSeekSlider;

use crate::PlaybackError;
use wasm_bindgen::JsValue;

fn to_js_error(error: &PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
