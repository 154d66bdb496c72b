//! Arcade error types

use thiserror::Error;

/// Errors raised at the edges of the arcade (storage, DOM, configuration).
///
/// Simulation code never produces these; terminal game conditions are
/// status transitions, not errors.
#[derive(Debug, Error)]
pub enum ArcadeError {
    /// No game is registered under this slug
    #[error("unknown game: {0}")]
    UnknownGame(String),

    /// A required DOM element or context is not available
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// Key-value store could not be read or written
    #[error("storage error: {0}")]
    Storage(String),

    /// Tuning document failed to parse
    #[error("tuning error: {0}")]
    Tuning(#[from] serde_json::Error),

    /// A browser API call threw
    #[error("js error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ArcadeError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ArcadeError::Js(format!("{value:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ArcadeError> for wasm_bindgen::JsValue {
    fn from(err: ArcadeError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
