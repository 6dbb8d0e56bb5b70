use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Failures while talking to the browser.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global window (not running in a browser?)")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        WebError::Js(message)
    }
}

pub type WebResult<T> = Result<T, WebError>;

pub fn window() -> WebResult<web_sys::Window> {
    web_sys::window().ok_or(WebError::NoWindow)
}

pub fn document() -> WebResult<web_sys::Document> {
    window()?.document().ok_or(WebError::NoDocument)
}

/// Look up an element by id, failing with `MissingElement` when absent.
pub fn element_by_id(id: &str) -> WebResult<web_sys::Element> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| WebError::MissingElement(format!("#{}", id)))
}

/// Checked cast between DOM types. A failed cast is reported as a JS error.
pub fn cast<T: JsCast, S: JsCast>(value: S) -> WebResult<T> {
    value
        .dyn_into::<T>()
        .map_err(|other| WebError::from(Into::<JsValue>::into(other)))
}

/// Look up an element by id and cast it, e.g. to `HtmlElement`.
pub fn element_as<T: JsCast>(id: &str) -> WebResult<T> {
    cast(element_by_id(id)?)
}
