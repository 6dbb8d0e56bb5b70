//! View/download click tracking.
//!
//! A delegated `click` listener recognizes affordances by marker class,
//! reads `data-dataset-id` and `href`, POSTs a tracking event and then
//! navigates to the link target whatever the outcome. Tracking is
//! best-effort: a missing id, a transport error or a server rejection is
//! logged and never keeps the user from reaching the dataset.

mod affordance;
mod dom;
mod flow;
mod model;
mod notifier;
#[cfg(test)]
mod testing;

pub use affordance::{AffordanceMatcher, ClickPlan, LinkElement, DATASET_ID_ATTR};
pub use dom::{install, BrowserNavigator, BrowserTracker};
pub use flow::{ClickOutcome, InteractionTracker, Navigator};
pub use model::{
    DatasetId, TrackedAction, TrackedLink, TrackingError, TrackingRequest, TrackingResult,
};
pub use notifier::{interpret_response, HttpNotifier, Notifier};
