use leptos::*;
use serde::Deserialize;
use serde_json::Value;

use crate::config::load_page_config;
use crate::error::{element_as, WebResult};
use crate::http;

#[derive(Debug, Deserialize)]
struct CheckReply {
    valid: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Result of checking an uploaded temp file's format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCheckStatus {
    Valid(String),
    Invalid(Option<String>),
    Failed,
}

impl FileCheckStatus {
    pub fn badge_class(&self) -> &'static str {
        match self {
            FileCheckStatus::Valid(_) => "badge bg-success",
            FileCheckStatus::Invalid(_) => "badge bg-danger",
            FileCheckStatus::Failed => "badge bg-warning",
        }
    }

    pub fn label(&self) -> String {
        match self {
            FileCheckStatus::Valid(kind) => format!("Valid: {}", kind),
            FileCheckStatus::Invalid(_) => "Invalid Format".to_string(),
            FileCheckStatus::Failed => "Check Failed".to_string(),
        }
    }
}

fn describe_kind(data: Option<&Value>) -> String {
    match data.and_then(|d| d.get("type")) {
        Some(Value::String(kind)) => kind.clone(),
        Some(Value::Null) | None => "unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Interpret the checker's reply body. Anything unparseable counts as a
/// failed check rather than an invalid file.
pub fn interpret_check(body: &str) -> FileCheckStatus {
    match serde_json::from_str::<CheckReply>(body) {
        Ok(reply) if reply.valid => FileCheckStatus::Valid(describe_kind(reply.data.as_ref())),
        Ok(reply) => FileCheckStatus::Invalid(reply.error),
        Err(_) => FileCheckStatus::Failed,
    }
}

fn render(status_el: &web_sys::HtmlElement, view: impl FnOnce() -> View + 'static) {
    status_el.set_inner_html("");
    mount_to(status_el.clone(), view);
}

fn checking_view() -> View {
    view! {
        <span class="spinner-border spinner-border-sm"></span>
        " Checking..."
    }
    .into_view()
}

fn status_view(status: FileCheckStatus) -> View {
    view! { <span class=status.badge_class()>{status.label()}</span> }.into_view()
}

async fn run_check(url: String, filename: String, status_el: web_sys::HtmlElement) {
    let body = serde_json::json!({ "filename": filename }).to_string();
    let status = match http::post_json(&url, &body, crate::csrf::csrf_token().as_deref()).await {
        Ok(response) => interpret_check(&response.body),
        Err(e) => {
            tracing::warn!("Datahub: file check for {} failed: {}", filename, e);
            FileCheckStatus::Failed
        }
    };
    if let FileCheckStatus::Invalid(reason) = &status {
        tracing::error!(
            "Datahub: {} is not a valid file: {}",
            filename,
            reason.as_deref().unwrap_or("no reason given")
        );
    }
    render(&status_el, move || status_view(status));
}

fn start_check(filename: String, status_element_id: &str) -> WebResult<()> {
    let status_el: web_sys::HtmlElement = element_as(status_element_id)?;
    render(&status_el, checking_view);

    let url = load_page_config().file_check_url;
    wasm_bindgen_futures::spawn_local(run_check(url, filename, status_el));
    Ok(())
}

/// Check the format of a freshly uploaded temp file and show the verdict
/// as a badge inside `status_element_id`. Called by the page's dropzone.
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn validate_temp_file(filename: String, status_element_id: String) {
    if let Err(e) = start_check(filename, &status_element_id) {
        tracing::warn!("Datahub: cannot check file: {}", e);
    }
}
