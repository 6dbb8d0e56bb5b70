use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = feather, js_name = replace)]
    fn feather_replace();

    #[wasm_bindgen(js_name = test_fakenodo_connection)]
    fn fakenodo_test_connection();
}

fn js_defined(expr: &str) -> bool {
    js_sys::eval(expr)
        .ok()
        .and_then(|val| val.as_bool())
        .unwrap_or(false)
}

/// Swap `data-feather` placeholders for SVG icons.
/// Does nothing if the icon script is not on the page.
pub fn replace_icons() {
    if js_defined("typeof feather !== 'undefined'") {
        feather_replace();
    }
}

/// Run the page's deposition-service connectivity check, if it defines one.
pub fn test_fakenodo_connection() {
    if js_defined("typeof test_fakenodo_connection === 'function'") {
        fakenodo_test_connection();
    }
}
