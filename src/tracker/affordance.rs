use tracing::debug;

use super::model::{DatasetId, TrackedAction, TrackedLink};
use crate::config::PageConfig;

pub const DATASET_ID_ATTR: &str = "data-dataset-id";

/// The slice of an element the tracker reads. Implemented for
/// `web_sys::Element` in the browser and for fake trees in tests.
pub trait LinkElement: Sized {
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<String>;
    fn parent(&self) -> Option<Self>;
}

/// What to do with an intercepted click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickPlan {
    /// Notify the backend, then navigate.
    Track(TrackedLink),
    /// The affordance has no usable dataset id: navigate without tracking.
    FailOpen {
        action: TrackedAction,
        target_url: String,
    },
}

impl ClickPlan {
    pub fn target_url(&self) -> &str {
        match self {
            ClickPlan::Track(link) => &link.target_url,
            ClickPlan::FailOpen { target_url, .. } => target_url,
        }
    }
}

/// Recognizes view/download affordances by marker class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffordanceMatcher {
    view_classes: Vec<String>,
    download_classes: Vec<String>,
}

impl Default for AffordanceMatcher {
    fn default() -> Self {
        Self::from_config(&PageConfig::default())
    }
}

impl AffordanceMatcher {
    pub fn new(view_classes: Vec<String>, download_classes: Vec<String>) -> Self {
        Self {
            view_classes,
            download_classes,
        }
    }

    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(config.view_classes.clone(), config.download_classes.clone())
    }

    /// View markers win over download markers on the same element.
    fn action_of<E: LinkElement>(&self, element: &E) -> Option<TrackedAction> {
        if self.view_classes.iter().any(|c| element.has_class(c)) {
            Some(TrackedAction::View)
        } else if self.download_classes.iter().any(|c| element.has_class(c)) {
            Some(TrackedAction::Download)
        } else {
            None
        }
    }

    /// Walk from the click target up through its ancestors and return the
    /// nearest affordance.
    pub fn find<E: LinkElement>(&self, target: E) -> Option<(E, TrackedAction)> {
        let mut current = Some(target);
        while let Some(element) = current {
            if let Some(action) = self.action_of(&element) {
                return Some((element, action));
            }
            current = element.parent();
        }
        None
    }

    /// Decide how to handle a click on `target`. `None` means the click is
    /// not ours and the browser should proceed normally.
    pub fn resolve<E: LinkElement>(&self, target: E) -> Option<ClickPlan> {
        let (element, action) = self.find(target)?;

        let target_url = match element.attribute("href") {
            Some(href) if !href.trim().is_empty() => href,
            _ => {
                debug!("Datahub: {} affordance without href, leaving click alone", action);
                return None;
            }
        };

        let dataset_id = element
            .attribute(DATASET_ID_ATTR)
            .as_deref()
            .and_then(DatasetId::parse);

        Some(match dataset_id {
            Some(dataset_id) => ClickPlan::Track(TrackedLink {
                dataset_id,
                target_url,
                action,
            }),
            None => ClickPlan::FailOpen { action, target_url },
        })
    }
}
