use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Div;
use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::error::{cast, element_by_id, WebResult};

const AUTHOR_BLOCK_STYLE: &str =
    "border:2px dotted #ccc;border-radius:10px;padding:10px;margin:10px 0; background-color: white";

/// Field key and visible label for each input of an author block.
const AUTHOR_FIELDS: [(&str, &str); 3] = [
    ("name", "Name *"),
    ("affiliation", "Affiliation"),
    ("orcid", "ORCID"),
];

/// Form field name understood by the server's author list,
/// e.g. `authors-0-name` or `feature_models-1-authors-0-orcid`.
pub fn author_field_name(prefix: &str, index: usize, field: &str) -> String {
    format!("{}authors-{}-{}", prefix, index, field)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorField {
    pub name: String,
    pub label: &'static str,
}

/// Everything needed to render one author block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorBlockSpec {
    pub index: usize,
    pub fields: Vec<AuthorField>,
}

/// Hands out author indices for one author list. Indices are never reused,
/// so removing a block does not collide with blocks added later.
#[derive(Debug, Clone, Default)]
pub struct AuthorFormBuilder {
    prefix: String,
    next_index: usize,
}

impl AuthorFormBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 0)
    }

    /// Continue numbering after blocks the server already rendered.
    pub fn starting_at(prefix: impl Into<String>, next_index: usize) -> Self {
        Self {
            prefix: prefix.into(),
            next_index,
        }
    }

    pub fn next_block(&mut self) -> AuthorBlockSpec {
        let index = self.next_index;
        self.next_index += 1;
        AuthorBlockSpec {
            index,
            fields: AUTHOR_FIELDS
                .iter()
                .map(|(key, label)| AuthorField {
                    name: author_field_name(&self.prefix, index, key),
                    label,
                })
                .collect(),
        }
    }
}

#[component]
pub fn AuthorBlock(spec: AuthorBlockSpec) -> impl IntoView {
    let block = create_node_ref::<Div>();

    let remove = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        if let Some(div) = block.get_untracked() {
            web_sys::Element::remove(&div);
        }
    };

    view! {
        <div class="author row" style=AUTHOR_BLOCK_STYLE node_ref=block attr:data-author-index=spec.index>
            {spec
                .fields
                .into_iter()
                .map(|field| {
                    view! {
                        <div class="col-lg-6 col-12 mb-3">
                            <label class="form-label" for=field.name.clone()>{field.label}</label>
                            <input name=field.name.clone() id=field.name class="form-control"/>
                        </div>
                    }
                })
                .collect_view()}
            <div class="col-12 mb-2">
                <button type="button" class="btn btn-danger btn-sm" on:click=remove>
                    "Remove author"
                </button>
            </div>
        </div>
    }
}

/// Reveal the upload panel. Called from the page's "upload" button.
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn show_upload_dataset() {
    if let Ok(panel) = element_by_id("upload_dataset") {
        if let Ok(panel) = panel.dyn_into::<web_sys::HtmlElement>() {
            let _ = panel.style().set_property("display", "block");
        }
    }
}

/// Wire `#add_author` to append blocks to `#authors`. Pages without the
/// author list are left alone.
pub fn install() -> WebResult<()> {
    let (Ok(button), Ok(authors)) = (element_by_id("add_author"), element_by_id("authors")) else {
        return Ok(());
    };
    let authors: web_sys::HtmlElement = cast(authors)?;

    let existing = authors.query_selector_all(".author")?.length() as usize;
    let builder = Rc::new(RefCell::new(AuthorFormBuilder::starting_at("", existing)));

    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let spec = builder.borrow_mut().next_block();
        tracing::debug!("Datahub: adding author block {}", spec.index);
        mount_to(authors.clone(), move || view! { <AuthorBlock spec=spec/> });
    }) as Box<dyn Fn(web_sys::Event)>);

    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
