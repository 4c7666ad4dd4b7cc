//! Captcha Canvas core crate.
//!
//! Renders a visual captcha into a browser `<canvas>`: a random string painted
//! glyph by glyph in random colors, five random noise lines on top, and a
//! reload control that regenerates both. The plaintext goes to a host
//! callback on every cycle. There is no server-side verification.
//!
//! Text generation and paint planning are plain Rust and run natively; only
//! `widget` and `canvas` touch the DOM.

use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod config;
pub mod error;
pub mod paint;
pub mod text;
mod widget;

pub use config::{CaptchaConfig, CaseType, CharsType};
pub use error::CaptchaError;
pub use paint::{Color, DrawOp, PaintPlan};
pub use text::{alphabet, generate_text};
pub use widget::Captcha;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging();
}

/// Send `log` records to the browser console. A logger installed earlier wins.
#[cfg(feature = "console_log")]
fn init_logging() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}

// -----------------------------------------------------------------------------
// Standalone entrypoints (no widget)
// -----------------------------------------------------------------------------

/// Generate a challenge string without mounting anything. Takes the same
/// options object as the widget; sizes are ignored.
#[wasm_bindgen(js_name = generateCaptchaText)]
pub fn generate_captcha_text(options: JsValue) -> Result<String, JsValue> {
    let config = CaptchaConfig::from_js(&options)?;
    let mut rng = widget::seeded_rng()?;
    Ok(generate_text(&mut rng, &config))
}

/// Mount a captcha widget. Same as `new Captcha(...)`.
#[wasm_bindgen(js_name = mountCaptcha)]
pub fn mount_captcha(
    container: JsValue,
    options: JsValue,
    on_code: Option<js_sys::Function>,
    reload_trigger: JsValue,
) -> Result<Captcha, JsValue> {
    Ok(Captcha::mount(&container, &options, on_code, &reload_trigger)?)
}
