use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::types::ElementId;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("stage canvas is not mounted")]
    NotAttached,

    #[error("element {0} is no longer on the canvas")]
    StaleElement(ElementId),
}

impl From<JsValue> for StageError {
    fn from(value: JsValue) -> Self {
        StageError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub type StageResult<T> = Result<T, StageError>;
