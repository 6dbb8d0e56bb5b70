use serde::Deserialize;
use tracing::{debug, error};

use crate::error::{document, WebResult};
use crate::http;

/// Element ids the profile page renders the counters into.
const UPLOADED_ID: &str = "uploaded";
const DOWNLOADS_ID: &str = "downloads";
const SYNCS_ID: &str = "syncs";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserMetrics {
    #[serde(default)]
    pub uploaded_datasets: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub synchronizations: u64,
}

impl UserMetrics {
    pub fn parse(body: &str) -> WebResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// `(element id, text)` pairs to write into the dashboard.
    pub fn cells(&self) -> [(&'static str, String); 3] {
        [
            (UPLOADED_ID, self.uploaded_datasets.to_string()),
            (DOWNLOADS_ID, self.downloads.to_string()),
            (SYNCS_ID, self.synchronizations.to_string()),
        ]
    }
}

fn dashboard_present() -> bool {
    document()
        .map(|d| {
            [UPLOADED_ID, DOWNLOADS_ID, SYNCS_ID]
                .iter()
                .all(|id| d.get_element_by_id(id).is_some())
        })
        .unwrap_or(false)
}

async fn refresh(url: &str) -> WebResult<()> {
    let response = http::get(url).await?;
    let metrics = UserMetrics::parse(&response.body)?;
    let document = document()?;
    for (id, text) in metrics.cells() {
        if let Some(cell) = document.get_element_by_id(id) {
            cell.set_text_content(Some(&text));
        }
    }
    debug!("Datahub: metrics loaded: {:?}", metrics);
    Ok(())
}

/// Fill the profile dashboard counters, if this page has them.
pub fn install(url: &str) {
    if !dashboard_present() {
        return;
    }
    let url = url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = refresh(&url).await {
            error!("Datahub: error loading metrics: {}", e);
        }
    });
}
