//! Test doubles for the click flow.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use super::affordance::LinkElement;
use super::flow::Navigator;
use super::model::{TrackedAction, TrackingRequest, TrackingResult};
use super::notifier::Notifier;

/// Detached element with classes, attributes and an optional parent chain.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    parent: Option<Rc<FakeElement>>,
}

impl FakeElement {
    pub fn new(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn child_of(mut self, parent: &FakeElement) -> Self {
        self.parent = Some(Rc::new(parent.clone()));
        self
    }
}

impl LinkElement for FakeElement {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn parent(&self) -> Option<Self> {
        self.parent.as_deref().cloned()
    }
}

/// One side effect of a click, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Notify(u64, TrackedAction),
    Navigate(String),
}

/// Log shared between a notifier and a navigator so their relative order
/// can be asserted.
pub type StepLog = Rc<RefCell<Vec<Step>>>;

/// Returns a canned result and records every request it receives.
#[derive(Clone)]
pub struct ScriptedNotifier {
    result: TrackingResult,
    pub requests: Rc<RefCell<Vec<TrackingRequest>>>,
    steps: StepLog,
}

impl ScriptedNotifier {
    pub fn new(result: TrackingResult) -> Self {
        Self {
            result,
            requests: Rc::new(RefCell::new(Vec::new())),
            steps: StepLog::default(),
        }
    }

    pub fn logging_to(mut self, steps: &StepLog) -> Self {
        self.steps = Rc::clone(steps);
        self
    }

    pub fn calls(&self) -> Vec<TrackingRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Notifier for ScriptedNotifier {
    async fn notify(&self, request: &TrackingRequest) -> TrackingResult {
        self.requests.borrow_mut().push(request.clone());
        self.steps
            .borrow_mut()
            .push(Step::Notify(request.dataset_id.get(), request.action));
        self.result.clone()
    }
}

/// Records navigations instead of leaving the page.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pub visited: Rc<RefCell<Vec<String>>>,
    steps: StepLog,
}

impl RecordingNavigator {
    pub fn logging_to(mut self, steps: &StepLog) -> Self {
        self.steps = Rc::clone(steps);
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visited.borrow_mut().push(url.to_string());
        self.steps.borrow_mut().push(Step::Navigate(url.to_string()));
    }
}
