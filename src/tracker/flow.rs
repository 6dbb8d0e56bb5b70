use tracing::{error, info, warn};

use super::affordance::{AffordanceMatcher, ClickPlan, LinkElement};
use super::model::{TrackingError, TrackingResult};
use super::notifier::Notifier;

/// Completes the user's navigation.
pub trait Navigator {
    fn navigate(&self, url: &str);
}

/// How an intercepted click ended. Navigation has already happened by the
/// time one of these exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Tracked(TrackingResult),
    Skipped(TrackingError),
}

/// Intercepts view/download clicks, reports them, then navigates.
pub struct InteractionTracker<N, V> {
    matcher: AffordanceMatcher,
    notifier: N,
    navigator: V,
    csrf_source: fn() -> Option<String>,
}

fn no_token() -> Option<String> {
    None
}

impl<N: Notifier, V: Navigator> InteractionTracker<N, V> {
    pub fn new(matcher: AffordanceMatcher, notifier: N, navigator: V) -> Self {
        Self {
            matcher,
            notifier,
            navigator,
            csrf_source: no_token,
        }
    }

    /// Where to read the anti-forgery token from at click time.
    pub fn with_csrf_source(mut self, source: fn() -> Option<String>) -> Self {
        self.csrf_source = source;
        self
    }

    /// Synchronous half of click handling: decide whether the click is ours.
    /// When this returns a plan the caller must prevent the default action
    /// and then drive [`complete`](Self::complete).
    pub fn intercept<E: LinkElement>(&self, target: E) -> Option<ClickPlan> {
        self.matcher.resolve(target)
    }

    /// Asynchronous half: notify (if possible) and navigate exactly once,
    /// after the notification settles.
    pub async fn complete(&self, plan: ClickPlan) -> ClickOutcome {
        match plan {
            ClickPlan::FailOpen { action, target_url } => {
                let err = TrackingError::MissingIdentifier;
                warn!(
                    "Datahub: {} link to {}: {}, navigating untracked",
                    action, target_url, err
                );
                self.navigator.navigate(&target_url);
                ClickOutcome::Skipped(err)
            }
            ClickPlan::Track(link) => {
                let request = link.request((self.csrf_source)());
                let result = self.notifier.notify(&request).await;

                match result.error() {
                    None => info!(
                        "Datahub: {} registered for dataset {}",
                        link.action, link.dataset_id
                    ),
                    Some(err @ TrackingError::ServerRejected(_)) => warn!(
                        "Datahub: {} for dataset {}: {}",
                        link.action, link.dataset_id, err
                    ),
                    Some(err) => error!(
                        "Datahub: {} for dataset {}: {}",
                        link.action, link.dataset_id, err
                    ),
                }

                self.navigator.navigate(&link.target_url);
                ClickOutcome::Tracked(result)
            }
        }
    }

    /// Full click cycle for one target. `None` when the click is not a
    /// tracked affordance.
    pub async fn on_document_click<E: LinkElement>(&self, target: E) -> Option<ClickOutcome> {
        let plan = self.intercept(target)?;
        Some(self.complete(plan).await)
    }
}
