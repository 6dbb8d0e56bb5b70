pub mod config;
pub mod csrf;
pub mod error;
pub mod forms;
pub mod hooks;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod tracker;

use config::{load_page_config, PageConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

/// Run `f` once the document has been parsed. Runs immediately when the
/// module loads after `DOMContentLoaded` already fired.
fn on_dom_ready(f: impl FnOnce() + 'static) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() != "loading" {
        f();
        return;
    }

    let closure = Closure::once(Box::new(f) as Box<dyn FnOnce()>);
    let _ = document
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Attach everything this page needs. Each part checks for its own markup
/// and stays idle on pages that lack it.
fn wire_page(config: PageConfig) {
    hooks::replace_icons();

    if let Err(e) = tracker::install(&config) {
        tracing::error!("Datahub: click tracking unavailable: {}", e);
    }
    if let Err(e) = forms::install(&config) {
        tracing::error!("Datahub: upload form unavailable: {}", e);
    }
    metrics::install(&config.metrics_url);

    hooks::test_fakenodo_connection();
    tracing::debug!("Datahub: page wired");
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    on_dom_ready(|| {
        let config = load_page_config();
        logging::init(&config.log_level);
        wire_page(config);
    });
}
