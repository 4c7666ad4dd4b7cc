use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while mounting or painting a captcha.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptchaError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element '{0}' not found")]
    ElementNotFound(String),
    /// The browser handed back no 2D context for the canvas. There is no
    /// recovery path; the host sees this as a thrown error.
    #[error("Canvas context is null")]
    NoContext,
    #[error("invalid captcha options: {0}")]
    Config(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("no entropy source: {0}")]
    Entropy(String),
    #[error("captcha is already rendering")]
    Busy,
}

pub type Result<T, E = CaptchaError> = std::result::Result<T, E>;

impl From<JsValue> for CaptchaError {
    fn from(value: JsValue) -> Self {
        let msg = value.as_string().unwrap_or_else(|| format!("{value:?}"));
        CaptchaError::Dom(msg)
    }
}

impl From<serde_json::Error> for CaptchaError {
    fn from(err: serde_json::Error) -> Self {
        CaptchaError::Config(err.to_string())
    }
}

impl From<CaptchaError> for JsValue {
    fn from(err: CaptchaError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
