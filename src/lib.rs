//! Nian Countdown core crate.
//!
//! A countdown to a stored target instant with flip-digit display, and an
//! ambient particle / ring celebration drawn on an overlay canvas once the
//! countdown reaches zero. The engine and the celebration simulation are plain
//! Rust behind small host traits (`Clock`, `Ticker`, `DisplaySink`,
//! `Surface`, `FrameDriver`) so they run and test natively; `web` plugs in the
//! browser implementations.

use wasm_bindgen::prelude::*;

pub mod celebration;
pub mod config;
pub mod countdown;
pub mod error;
pub mod format;
pub mod logging;
pub mod storage;
pub mod time_source;
pub mod web;

pub use config::{LOCAL_TIMEZONE, WidgetConfig};
pub use countdown::{Breakdown, CountdownEngine, Phase, StopHandle, Unit, remaining_seconds};
pub use error::WidgetError;
pub use time_source::{TimeSource, parse_instant};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Mount on the current page with the compiled-in defaults.
#[wasm_bindgen]
pub fn start_countdown() -> Result<(), JsValue> {
    web::mount(WidgetConfig::default())?;
    Ok(())
}

/// Mount with a (partial) JSON config override.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_countdown_with_config(json: &str) -> Result<(), JsValue> {
    web::mount(WidgetConfig::from_json(json)?)?;
    Ok(())
}

#[wasm_bindgen]
pub fn stop_countdown() {
    web::unmount();
}

/// Whole seconds from now until `target` (any accepted target format); 0 for
/// past or unparseable targets.
#[wasm_bindgen]
pub fn seconds_until(target: &str) -> f64 {
    parse_instant(target)
        .map(|t| remaining_seconds(t.timestamp_millis(), js_sys::Date::now() as i64) as f64)
        .unwrap_or(0.0)
}
