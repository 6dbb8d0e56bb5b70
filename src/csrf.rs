use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

/// Read the page's anti-forgery token.
///
/// Looks for `<meta name="csrf-token">` first, then the hidden
/// `csrf_token` input rendered by server-side forms. Returns `None` when the
/// page has neither; callers then send requests without a token.
pub fn csrf_token() -> Option<String> {
    let document = web_sys::window()?.document()?;
    from_meta(&document).or_else(|| from_hidden_input(&document))
}

fn from_meta(document: &Document) -> Option<String> {
    let meta = document
        .query_selector("meta[name=\"csrf-token\"]")
        .ok()
        .flatten()?;
    non_empty(meta.get_attribute("content"))
}

fn from_hidden_input(document: &Document) -> Option<String> {
    let input = document
        .query_selector("input[name=\"csrf_token\"]")
        .ok()
        .flatten()?
        .dyn_into::<HtmlInputElement>()
        .ok()?;
    non_empty(Some(input.value()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
