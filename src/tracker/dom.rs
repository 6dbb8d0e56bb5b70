use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, Node};

use super::affordance::{AffordanceMatcher, LinkElement};
use super::flow::{InteractionTracker, Navigator};
use super::notifier::HttpNotifier;
use crate::config::PageConfig;
use crate::csrf::csrf_token;
use crate::error::{document, WebResult};

impl LinkElement for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn parent(&self) -> Option<Self> {
        self.parent_element()
    }
}

/// Navigates by assigning `window.location.href`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                tracing::error!("Datahub: navigation to {} failed: {:?}", url, e);
            }
        }
    }
}

pub type BrowserTracker = InteractionTracker<HttpNotifier, BrowserNavigator>;

/// Clicks on text nodes report the text node as target; start from its
/// parent element in that case.
fn target_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element(),
    }
}

/// Register the single delegated `click` listener on `document`. Links added
/// to the page later are picked up without re-binding.
pub fn install(config: &PageConfig) -> WebResult<()> {
    let tracker: Rc<BrowserTracker> = Rc::new(
        InteractionTracker::new(
            AffordanceMatcher::from_config(config),
            HttpNotifier::new(config.normalized_prefix()),
            BrowserNavigator,
        )
        .with_csrf_source(csrf_token),
    );

    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Some(target) = target_element(&event) else {
            return;
        };
        if let Some(plan) = tracker.intercept(target) {
            event.prevent_default();
            let tracker = Rc::clone(&tracker);
            wasm_bindgen_futures::spawn_local(async move {
                tracker.complete(plan).await;
            });
        }
    }) as Box<dyn Fn(Event)>);

    document()?.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
