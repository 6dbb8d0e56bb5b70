use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, FormData, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Node,
};

use super::validation::{validate_basic_info, validate_orcids, ValidationError};
use crate::config::PageConfig;
use crate::csrf::csrf_token;
use crate::error::{cast, document, element_as, element_by_id, window, WebError, WebResult};
use crate::http::{self, HttpResponse};

const UNKNOWN_ERROR: &str = "Unknown error occurred";
const NETWORK_ERROR: &str = "Network error";

#[derive(Debug, Default, Deserialize)]
struct UploadReply {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    redirect: Option<String>,
}

/// What to do once the server has answered an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Redirect(String),
    Rejected(String),
}

/// Render a reply field: strings verbatim, field-error maps as compact JSON.
fn describe(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn interpret_upload(response: &HttpResponse, fallback_redirect: &str) -> UploadOutcome {
    let reply: UploadReply = response.json().unwrap_or_default();

    if response.ok {
        if let Some(message) = reply.message.as_ref().and_then(describe) {
            info!("Datahub: {}", message);
        }
        let target = reply
            .redirect
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| fallback_redirect.to_string());
        return UploadOutcome::Redirect(target);
    }

    let message = reply
        .message
        .as_ref()
        .and_then(describe)
        .or_else(|| reply.error.as_ref().and_then(describe))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    UploadOutcome::Rejected(message)
}

/// Whether a form control contributes to the upload body.
pub fn should_submit_field(name: &str, input_type: &str, skip_submit: bool) -> bool {
    if name.is_empty() || name == "csrf_token" {
        return false;
    }
    !(skip_submit && input_type.eq_ignore_ascii_case("submit"))
}

/// Name, type and value of an input, select or textarea.
fn control_parts(node: &Node) -> Option<(String, String, String)> {
    if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
        return Some((input.name(), input.type_(), input.value()));
    }
    if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
        return Some((select.name(), "select".to_string(), select.value()));
    }
    node.dyn_ref::<HtmlTextAreaElement>()
        .map(|area| (area.name(), "textarea".to_string(), area.value()))
}

fn append_controls(
    document: &Document,
    form: &FormData,
    container: &str,
    skip_submit: bool,
) -> WebResult<()> {
    let selector = format!("{0} input, {0} select, {0} textarea", container);
    let nodes = document.query_selector_all(&selector)?;
    for i in 0..nodes.length() {
        let Some((name, kind, value)) = nodes.item(i).as_ref().and_then(control_parts) else {
            continue;
        };
        if should_submit_field(&name, &kind, skip_submit) {
            form.append_with_str(&name, &value)?;
        }
    }
    Ok(())
}

/// Where upload feedback is shown.
trait StatusPanel {
    fn hide_loading(&self);
    fn write_error(&self, message: &str) -> WebResult<()>;
}

/// Restore the upload button, then list the messages. The button comes back
/// even if writing a message fails.
fn report_errors<P, I>(panel: &P, messages: I) -> WebResult<()>
where
    P: StatusPanel,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    panel.hide_loading();
    for message in messages {
        panel.write_error(message.as_ref())?;
    }
    Ok(())
}

/// The elements of the upload panel the handler touches.
struct UploadPanel {
    button: HtmlElement,
    loading: HtmlElement,
    errors: HtmlElement,
}

impl UploadPanel {
    fn find() -> WebResult<Self> {
        Ok(Self {
            button: element_as("upload_button")?,
            loading: element_as("loading")?,
            errors: element_as("upload_error")?,
        })
    }

    fn show_loading(&self) {
        let _ = self.button.style().set_property("display", "none");
        let _ = self.loading.style().set_property("display", "block");
    }

    fn clear_errors(&self) {
        self.errors.set_inner_html("");
        let _ = self.errors.style().set_property("display", "none");
    }
}

impl StatusPanel for UploadPanel {
    fn hide_loading(&self) {
        let _ = self.button.style().set_property("display", "block");
        let _ = self.loading.style().set_property("display", "none");
    }

    fn write_error(&self, message: &str) -> WebResult<()> {
        let alert: HtmlElement = cast(document()?.create_element("p")?)?;
        let _ = alert.style().set_property("margin", "0");
        let _ = alert.style().set_property("padding", "0");
        alert.set_text_content(Some(&format!("Upload error: {}", message)));
        self.errors.append_child(&alert)?;
        let _ = self.errors.style().set_property("display", "block");
        Ok(())
    }
}

fn field_value(document: &Document, selector: &str) -> Option<(Element, String)> {
    let element = document.query_selector(selector).ok().flatten()?;
    let value = if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else {
        element.dyn_ref::<HtmlTextAreaElement>()?.value()
    };
    Some((element, value))
}

/// Validate the visible form, flagging offending fields with `error`.
fn check_form(document: &Document) -> WebResult<Vec<ValidationError>> {
    let title = field_value(document, "input[name=\"title\"]");
    let desc = field_value(document, "textarea[name=\"desc\"]");

    for (element, _) in title.iter().chain(desc.iter()) {
        element.class_list().remove_1("error")?;
    }

    let title_text = title.as_ref().map(|(_, v)| v.as_str()).unwrap_or("");
    let desc_text = desc.as_ref().map(|(_, v)| v.as_str()).unwrap_or("");
    let mut errors = validate_basic_info(title_text, desc_text);

    for err in &errors {
        let flagged = match err {
            ValidationError::TitleTooShort => title.as_ref(),
            ValidationError::DescriptionTooShort => desc.as_ref(),
            ValidationError::InvalidOrcid(_) => None,
        };
        if let Some((element, _)) = flagged {
            element.class_list().add_1("error")?;
        }
    }

    let orcid_inputs = document.query_selector_all("#authors input[name$=\"-orcid\"]")?;
    let orcids: Vec<String> = (0..orcid_inputs.length())
        .filter_map(|i| orcid_inputs.item(i))
        .filter_map(|node| node.dyn_ref::<HtmlInputElement>().map(|input| input.value()))
        .collect();
    errors.extend(validate_orcids(orcids.iter().map(String::as_str)));

    Ok(errors)
}

fn build_form(document: &Document) -> WebResult<FormData> {
    let form = FormData::new()?;
    if let Some(token) = csrf_token() {
        form.append_with_str("csrf_token", &token)?;
    }
    append_controls(document, &form, "#basic_info_form", true)?;
    append_controls(document, &form, "#uploaded_models_form", false)?;
    Ok(form)
}

async fn submit(panel: &UploadPanel, upload_url: &str, fallback_redirect: &str) -> WebResult<()> {
    panel.clear_errors();
    panel.show_loading();

    let document = document()?;
    let errors = check_form(&document)?;
    if !errors.is_empty() {
        return report_errors(panel, errors.iter().map(ToString::to_string));
    }

    let form = build_form(&document)?;
    info!("Datahub: sending upload form");

    match http::post_form(upload_url, &form).await {
        Ok(response) => match interpret_upload(&response, fallback_redirect) {
            UploadOutcome::Redirect(target) => {
                window()?.location().set_href(&target)?;
            }
            UploadOutcome::Rejected(message) => {
                error!("Datahub: upload rejected: {}", message);
                report_errors(panel, [message])?;
            }
        },
        Err(e) => {
            error!("Datahub: error in upload request: {}", e);
            report_errors(panel, [NETWORK_ERROR])?;
        }
    }
    Ok(())
}

/// Wire `#upload_button` to validate and submit asynchronously.
pub fn install(config: &PageConfig) -> WebResult<()> {
    let button = match element_by_id("upload_button") {
        Ok(button) => button,
        Err(WebError::MissingElement(_)) => return Ok(()),
        Err(e) => return Err(e),
    };
    let upload_url = config.upload_url.clone();
    let fallback = config.upload_fallback_redirect.clone();

    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let upload_url = upload_url.clone();
        let fallback = fallback.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match UploadPanel::find() {
                Ok(panel) => submit(&panel, &upload_url, &fallback).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!("Datahub: upload handler failed: {}", e);
            }
        });
    }) as Box<dyn Fn(web_sys::Event)>);

    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            ok: (200..300).contains(&status),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_uses_server_redirect() {
        let body = r#"{"message": "Dataset created successfully", "redirect": "/dataset/view/9"}"#;
        let outcome = interpret_upload(&response(200, body), "/dataset/list");
        assert_eq!(outcome, UploadOutcome::Redirect("/dataset/view/9".to_string()));
    }

    #[test]
    fn test_success_without_redirect_uses_fallback() {
        let outcome = interpret_upload(
            &response(200, r#"{"message": "Dataset created successfully"}"#),
            "/dataset/list",
        );
        assert_eq!(outcome, UploadOutcome::Redirect("/dataset/list".to_string()));

        let outcome = interpret_upload(&response(200, "not json"), "/dataset/list");
        assert_eq!(outcome, UploadOutcome::Redirect("/dataset/list".to_string()));
    }

    #[test]
    fn test_rejection_message_string() {
        let outcome = interpret_upload(
            &response(400, r#"{"message": "Dataset type not supported"}"#),
            "/dataset/list",
        );
        assert_eq!(
            outcome,
            UploadOutcome::Rejected("Dataset type not supported".to_string())
        );
    }

    #[test]
    fn test_rejection_with_field_errors_map() {
        let outcome = interpret_upload(
            &response(400, r#"{"message": {"title": ["This field is required."]}}"#),
            "/dataset/list",
        );
        assert_eq!(
            outcome,
            UploadOutcome::Rejected(r#"{"title":["This field is required."]}"#.to_string())
        );
    }

    #[test]
    fn test_rejection_falls_back_to_error_key() {
        let outcome = interpret_upload(
            &response(400, r#"{"error": "No files were uploaded"}"#),
            "/dataset/list",
        );
        assert_eq!(
            outcome,
            UploadOutcome::Rejected("No files were uploaded".to_string())
        );
    }

    #[test]
    fn test_rejection_without_details() {
        for body in ["", "{}", r#"{"message": null}"#, "<html>oops</html>"] {
            assert_eq!(
                interpret_upload(&response(500, body), "/dataset/list"),
                UploadOutcome::Rejected(UNKNOWN_ERROR.to_string()),
                "body {:?}",
                body
            );
        }
    }

    #[derive(Default)]
    struct FakePanel {
        events: RefCell<Vec<String>>,
        broken: bool,
    }

    impl StatusPanel for FakePanel {
        fn hide_loading(&self) {
            self.events.borrow_mut().push("hide".to_string());
        }

        fn write_error(&self, message: &str) -> WebResult<()> {
            if self.broken {
                return Err(WebError::Js("detached".to_string()));
            }
            self.events.borrow_mut().push(format!("error: {}", message));
            Ok(())
        }
    }

    #[test]
    fn test_report_errors_restores_button_first() {
        let panel = FakePanel::default();
        let errors = [ValidationError::TitleTooShort, ValidationError::DescriptionTooShort];
        report_errors(&panel, errors.iter().map(ToString::to_string)).unwrap();

        let events = panel.events.borrow();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], "hide");
        assert!(events[1].starts_with("error: "));
    }

    #[test]
    fn test_report_errors_restores_button_when_writing_fails() {
        let panel = FakePanel {
            broken: true,
            ..Default::default()
        };
        assert!(report_errors(&panel, [NETWORK_ERROR]).is_err());
        assert_eq!(*panel.events.borrow(), vec!["hide"]);
    }

    #[test]
    fn test_submit_fields_filter() {
        assert!(should_submit_field("title", "text", true));
        assert!(!should_submit_field("", "text", true));
        assert!(!should_submit_field("submit", "submit", true));
        assert!(should_submit_field("submit", "submit", false));
        assert!(!should_submit_field("csrf_token", "hidden", false));
    }
}
