use serde::{Deserialize, Serialize};
use tracing::warn;

/// Id of the `<script type="application/json">` block the server renders
/// into pages that need to override routing or marker classes.
const CONFIG_ELEMENT_ID: &str = "datahub-config";

/// Per-page settings, read once on start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_tracking_prefix")]
    pub tracking_prefix: String,
    #[serde(default = "default_view_classes")]
    pub view_classes: Vec<String>,
    #[serde(default = "default_download_classes")]
    pub download_classes: Vec<String>,
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    #[serde(default = "default_upload_fallback_redirect")]
    pub upload_fallback_redirect: String,
    #[serde(default = "default_metrics_url")]
    pub metrics_url: String,
    #[serde(default = "default_file_check_url")]
    pub file_check_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_tracking_prefix() -> String {
    "/dataset".to_string()
}

fn default_view_classes() -> Vec<String> {
    vec!["view-link".to_string()]
}

fn default_download_classes() -> Vec<String> {
    vec!["download-link".to_string()]
}

fn default_upload_url() -> String {
    "/dataset/upload".to_string()
}

fn default_upload_fallback_redirect() -> String {
    "/dataset/list".to_string()
}

fn default_metrics_url() -> String {
    "/profile/metrics".to_string()
}

fn default_file_check_url() -> String {
    "/api/food_checker/check/temp".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            tracking_prefix: default_tracking_prefix(),
            view_classes: default_view_classes(),
            download_classes: default_download_classes(),
            upload_url: default_upload_url(),
            upload_fallback_redirect: default_upload_fallback_redirect(),
            metrics_url: default_metrics_url(),
            file_check_url: default_file_check_url(),
            log_level: default_log_level(),
        }
    }
}

impl PageConfig {
    /// Parse a config block, falling back to defaults on malformed JSON.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            warn!("Datahub: failed to parse page config (using defaults): {}", e);
            PageConfig::default()
        })
    }

    /// Tracking prefix without a trailing slash, so `"/food/dataset/"` and
    /// `"/food/dataset"` build the same endpoint.
    pub fn normalized_prefix(&self) -> &str {
        self.tracking_prefix.trim_end_matches('/')
    }
}

/// Load the page config from the DOM.
///
/// Returns defaults when there is no config block or no document (e.g.
/// during native tests).
pub fn load_page_config() -> PageConfig {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    match text {
        Some(json) if !json.trim().is_empty() => PageConfig::from_json(&json),
        _ => PageConfig::default(),
    }
}
