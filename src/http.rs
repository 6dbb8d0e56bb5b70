//! Minimal `fetch` wrapper.
//!
//! Requests are awaited through `JsFuture`; the response body is always read
//! as text so callers can parse it (or not) with `serde_json`.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

use crate::error::{window, WebResult};

/// A received response. Transport failures never produce one.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub ok: bool,
    pub body: String,
}

impl HttpResponse {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> WebResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

pub async fn get(url: &str) -> WebResult<HttpResponse> {
    let init = RequestInit::new();
    init.set_method("GET");
    send(url, &init).await
}

/// POST a JSON body, attaching `X-CSRF-Token` when a token is supplied.
pub async fn post_json(
    url: &str,
    body: &str,
    csrf_token: Option<&str>,
) -> WebResult<HttpResponse> {
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    if let Some(token) = csrf_token {
        headers.set("X-CSRF-Token", token)?;
    }

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(body));
    send(url, &init).await
}

/// POST a multipart form. The browser sets the boundary header itself.
pub async fn post_form(url: &str, form: &FormData) -> WebResult<HttpResponse> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(form);
    send(url, &init).await
}

async fn send(url: &str, init: &RequestInit) -> WebResult<HttpResponse> {
    let request = Request::new_with_str_and_init(url, init)?;
    let response: Response = JsFuture::from(window()?.fetch_with_request(&request))
        .await?
        .dyn_into()?;

    let body = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    Ok(HttpResponse {
        status: response.status(),
        ok: response.ok(),
        body,
    })
}
