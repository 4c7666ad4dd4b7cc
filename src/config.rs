//! Captcha options as a host page passes them in.
//!
//! Keys keep the camelCase names used by JS callers (`captchaLength`,
//! `captchaCharsType`, ...). Every key is optional. Values are read leniently:
//! degenerate numbers clamp instead of failing and unknown selector strings
//! fall back to the defaults.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use wasm_bindgen::JsValue;

use crate::error::{CaptchaError, Result};

pub const DEFAULT_LENGTH: usize = 6;
pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_HEIGHT: u32 = 40;
/// Upper bound on challenge length. Longer requests are clamped.
pub const MAX_LENGTH: usize = 4096;

/// Which character classes the challenge draws from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CharsType {
    Numbers,
    Letters,
    #[default]
    Alphanumeric,
}

impl FromStr for CharsType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "numbers" => Self::Numbers,
            "letters" => Self::Letters,
            _ => Self::Alphanumeric,
        })
    }
}

impl From<String> for CharsType {
    fn from(s: String) -> Self {
        let Ok(kind) = s.parse::<Self>();
        kind
    }
}

/// Letter case applied to the alphabet after the class is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CaseType {
    Lower,
    Upper,
    #[default]
    Mixed,
}

impl FromStr for CaseType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "lower" => Self::Lower,
            "upper" => Self::Upper,
            _ => Self::Mixed,
        })
    }
}

impl From<String> for CaseType {
    fn from(s: String) -> Self {
        let Ok(kind) = s.parse::<Self>();
        kind
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptchaConfig {
    #[serde(rename = "captchaLength", deserialize_with = "lenient_length")]
    pub length: usize,
    #[serde(rename = "captchaCharsType")]
    pub chars: CharsType,
    #[serde(rename = "captchaCaseType")]
    pub case: CaseType,
    #[serde(rename = "captchaWidth", deserialize_with = "lenient_width")]
    pub width: u32,
    #[serde(rename = "captchaHeight", deserialize_with = "lenient_height")]
    pub height: u32,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            chars: CharsType::default(),
            case: CaseType::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl CaptchaConfig {
    /// Parse an options object handed over from JS. `undefined` and `null`
    /// mean "use every default".
    pub fn from_js(value: &JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_object() {
            return Err(CaptchaError::Config("expected an options object".into()));
        }
        let json: String = js_sys::JSON::stringify(value)?.into();
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A JS loop `for (i = 0; i < n; i++)` runs `ceil(n)` times for positive n.
fn length_from_number(n: f64) -> usize {
    if n > 0.0 { (n.ceil() as usize).min(MAX_LENGTH) } else { 0 }
}

// `as` saturates and maps NaN to 0.
fn size_from_number(n: f64) -> u32 {
    n as u32
}

fn lenient_length<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<usize, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map_or(DEFAULT_LENGTH, length_from_number))
}

fn lenient_width<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map_or(DEFAULT_WIDTH, size_from_number))
}

fn lenient_height<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map_or(DEFAULT_HEIGHT, size_from_number))
}
