//! Framework collaborator traits and a scriptable mock.
//!
//! The session never talks to the host MVC framework directly; everything
//! goes through `FrameworkDriver`, and assertion helpers read framework
//! state through `StateInspector`. Implement both for the framework under
//! test. `MockFramework` is the in-crate implementation used by unit tests.

use crate::inputs::PendingInputs;
use crate::request::{DispatchOutcome, DispatchRequest, Target};
use crate::result::{NavegarError, NavegarResult};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Dispatch primitive into the host MVC framework.
///
/// One invocation runs exactly one request; redirect following and input
/// bookkeeping stay on the session side.
pub trait FrameworkDriver {
    /// Framework-specific response metadata carried on each outcome
    type Response;

    /// Run one request through the framework and report the outcome.
    ///
    /// # Errors
    ///
    /// Framework-level failures (no matching route, handler error) are
    /// returned as-is and reach the test author unchanged.
    fn dispatch(
        &mut self,
        request: &DispatchRequest,
    ) -> NavegarResult<DispatchOutcome<Self::Response>>;
}

/// Read access to the framework's per-request state for assertion helpers
pub trait StateInspector {
    /// Route the framework last resolved, if any
    fn current_route(&self) -> Option<String>;

    /// Handler (controller) that served the last request
    fn current_handler(&self) -> Option<String>;

    /// Action within the handler that served the last request
    fn current_action(&self) -> Option<String>;

    /// View rendered by the last request
    fn current_view(&self) -> Option<String>;

    /// Event name the last request was dispatched to, if any
    fn current_event(&self) -> Option<String>;

    /// Look up a value in a named request collection (params, session,
    /// flash, ...)
    fn request_value(&self, collection: &str, key: &str) -> Option<String>;
}

/// Error type used by `MockFramework` for scripted failures
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MockFrameworkError {
    /// Scripted failure message
    pub message: String,
}

/// Canned behavior for one `MockFramework::dispatch` call
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Terminal page with the given body
    Page(String),
    /// Redirect to a target, carrying parameters
    Redirect(Target, PendingInputs),
    /// Fail with a framework-level error message
    Fail(String),
}

/// Response metadata recorded by the mock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockResponse {
    /// Status code the mock assigned (200 for pages, 302 for redirects)
    pub status: u16,
    /// Route this response answered, when the request targeted one
    pub route: Option<String>,
    /// Event this response answered, when the request targeted one
    pub event: Option<String>,
}

/// Scriptable framework driver for unit testing.
///
/// Steps are consumed in order, one per dispatch; an optional fallback step
/// answers every dispatch after the queue runs dry. Every request seen is
/// recorded for verification.
#[derive(Debug, Default)]
pub struct MockFramework {
    steps: VecDeque<MockStep>,
    fallback: Option<MockStep>,
    requests: Vec<DispatchRequest>,
    view: Option<String>,
    collections: HashMap<String, HashMap<String, String>>,
}

impl MockFramework {
    /// Create a mock with no scripted steps; dispatches answer with an
    /// empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary step
    #[must_use]
    pub fn respond_with(mut self, step: MockStep) -> Self {
        self.steps.push_back(step);
        self
    }

    /// Queue a terminal page
    #[must_use]
    pub fn page(self, html: impl Into<String>) -> Self {
        self.respond_with(MockStep::Page(html.into()))
    }

    /// Queue a redirect with no parameters
    #[must_use]
    pub fn redirect(self, target: Target) -> Self {
        self.respond_with(MockStep::Redirect(target, PendingInputs::new()))
    }

    /// Queue a redirect carrying parameters
    #[must_use]
    pub fn redirect_with(self, target: Target, parameters: PendingInputs) -> Self {
        self.respond_with(MockStep::Redirect(target, parameters))
    }

    /// Queue a scripted failure
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.respond_with(MockStep::Fail(message.into()))
    }

    /// Answer every dispatch after the queue runs dry with a redirect to
    /// `target`
    #[must_use]
    pub fn always_redirect(mut self, target: Target) -> Self {
        self.fallback = Some(MockStep::Redirect(target, PendingInputs::new()));
        self
    }

    /// Set the view name reported through `StateInspector`
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Seed a request-collection value reported through `StateInspector`
    #[must_use]
    pub fn with_value(
        mut self,
        collection: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let _ = self
            .collections
            .entry(collection.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Requests seen so far, in call order
    #[must_use]
    pub fn requests(&self) -> &[DispatchRequest] {
        &self.requests
    }

    /// Whether any dispatch targeted `target`
    #[must_use]
    pub fn was_dispatched(&self, target: &Target) -> bool {
        self.requests.iter().any(|r| &r.target == target)
    }

    fn next_step(&mut self) -> Option<MockStep> {
        self.steps.pop_front().or_else(|| self.fallback.clone())
    }

    fn last_target(&self) -> Option<&Target> {
        self.requests.last().map(|r| &r.target)
    }
}

impl FrameworkDriver for MockFramework {
    type Response = MockResponse;

    fn dispatch(
        &mut self,
        request: &DispatchRequest,
    ) -> NavegarResult<DispatchOutcome<MockResponse>> {
        self.requests.push(request.clone());
        let response = MockResponse {
            status: 200,
            route: match &request.target {
                Target::Route(path) => Some(path.clone()),
                Target::Event(_) => None,
            },
            event: match &request.target {
                Target::Event(name) => Some(name.clone()),
                Target::Route(_) => None,
            },
        };
        match self.next_step() {
            None => Ok(DispatchOutcome::page("<html></html>", response)),
            Some(MockStep::Page(html)) => Ok(DispatchOutcome::page(html, response)),
            Some(MockStep::Redirect(target, parameters)) => Ok(DispatchOutcome::redirect_to(
                target,
                parameters,
                MockResponse {
                    status: 302,
                    ..response
                },
            )),
            Some(MockStep::Fail(message)) => {
                Err(NavegarError::framework(MockFrameworkError { message }))
            }
        }
    }
}

impl StateInspector for MockFramework {
    fn current_route(&self) -> Option<String> {
        match self.last_target() {
            Some(Target::Route(path)) => Some(path.clone()),
            _ => None,
        }
    }

    fn current_handler(&self) -> Option<String> {
        self.current_event()
            .map(|event| event.split('.').next().unwrap_or("").to_string())
    }

    fn current_action(&self) -> Option<String> {
        self.current_event()
            .and_then(|event| event.split_once('.').map(|(_, action)| action.to_string()))
    }

    fn current_view(&self) -> Option<String> {
        self.view.clone()
    }

    fn current_event(&self) -> Option<String> {
        match self.last_target() {
            Some(Target::Event(name)) => Some(name.clone()),
            _ => None,
        }
    }

    fn request_value(&self, collection: &str, key: &str) -> Option<String> {
        self.collections
            .get(collection)
            .and_then(|values| values.get(key))
            .cloned()
    }
}
