//! The simulated user session: fluent interactions and tracked page state.
//!
//! A `Session` owns one framework driver, one document engine, the pending
//! form inputs, and the state of the last rendered page. Interaction methods
//! chain: accumulating calls return `&mut Self`, dispatching calls return
//! `NavegarResult<&mut Self>` so `?` stops the chain on the first failure.

use crate::dispatch::{self, DispatchConfig};
use crate::dom::{DocumentEngine, HtmlEngine};
use crate::driver::FrameworkDriver;
use crate::inputs::{FieldValue, PendingInputs};
use crate::request::{DispatchKind, DispatchRequest, Method, Target};
use crate::result::{NavegarError, NavegarResult};

/// A simulated user session against an in-process MVC application
pub struct Session<D, E = HtmlEngine>
where
    D: FrameworkDriver,
    E: DocumentEngine,
{
    driver: D,
    engine: E,
    config: DispatchConfig,
    pending: PendingInputs,
    last_kind: Option<DispatchKind>,
    current: Option<Target>,
    html: Option<String>,
    document: Option<E::Document>,
    response: Option<D::Response>,
}

impl<D: FrameworkDriver> Session<D, HtmlEngine> {
    /// Start a session with the default HTML engine
    pub fn start(driver: D) -> Self {
        Self::new(driver, HtmlEngine::new())
    }
}

impl<D, E> Session<D, E>
where
    D: FrameworkDriver,
    E: DocumentEngine,
{
    /// Create a session over explicit collaborators
    pub fn new(driver: D, engine: E) -> Self {
        Self {
            driver,
            engine,
            config: DispatchConfig::default(),
            pending: PendingInputs::new(),
            last_kind: None,
            current: None,
            html: None,
            document: None,
            response: None,
        }
    }

    /// Replace the dispatch configuration
    #[must_use]
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    // ------------------------------------------------------------------
    // Accumulating interactions
    // ------------------------------------------------------------------

    /// Type a value into a form field.
    ///
    /// Typed values overwrite earlier values for the same field and win
    /// over anything later scraped from the page.
    pub fn type_text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pending.store(name, FieldValue::text(value.into()), true);
        self
    }

    /// Check a checkbox
    pub fn check(&mut self, name: impl Into<String>) -> &mut Self {
        self.pending.store(name, FieldValue::Checked(true), true);
        self
    }

    /// Uncheck a checkbox
    pub fn uncheck(&mut self, name: impl Into<String>) -> &mut Self {
        self.pending.store(name, FieldValue::Checked(false), true);
        self
    }

    /// Select an option of a select field
    pub fn select(&mut self, name: impl Into<String>, option: impl Into<String>) -> &mut Self {
        self.pending
            .store(name, FieldValue::Selected(option.into()), true);
        self
    }

    /// Store an arbitrary field value, overwriting any earlier one
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) -> &mut Self {
        self.pending.store(name, value, true);
        self
    }

    // ------------------------------------------------------------------
    // Dispatching interactions
    // ------------------------------------------------------------------

    /// GET a route, following redirects to the terminal page.
    ///
    /// # Errors
    ///
    /// Framework errors propagate unchanged; an over-long redirect chain
    /// fails with `RedirectLoop`.
    pub fn visit(&mut self, route: impl Into<String>) -> NavegarResult<&mut Self> {
        self.perform(Method::Get, Target::route(route))
    }

    /// GET a framework event, bypassing routing.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Session::visit`].
    pub fn visit_event(&mut self, event: impl Into<String>) -> NavegarResult<&mut Self> {
        self.perform(Method::Get, Target::event(event))
    }

    /// Dispatch with an explicit verb and exactly one of route or event.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an unknown verb, or when both or neither of
    /// route and event are given.
    pub fn submit_request(
        &mut self,
        method: &str,
        route: Option<&str>,
        event: Option<&str>,
    ) -> NavegarResult<&mut Self> {
        let method = Method::parse(method)?;
        let target = Target::from_parts(route, event)?;
        self.perform(method, target)
    }

    /// Follow a link on the current page, located by selector or link text.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` before any page is loaded, `ElementNotFound` when
    /// no link matches.
    pub fn click_link(&mut self, link: &str) -> NavegarResult<&mut Self> {
        let doc = self.current_document("click_link")?;
        let href = self.engine.link_href(doc, link)?;
        self.perform(Method::Get, Target::route(href))
    }

    /// Press the submit control labelled `label`, submitting the current
    /// form.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when the page has no such control.
    pub fn press(&mut self, label: &str) -> NavegarResult<&mut Self> {
        let doc = self.current_document("press")?;
        if !self.engine.has_submit(doc, label)? {
            return Err(NavegarError::ElementNotFound {
                selector: label.to_string(),
            });
        }
        self.submit_form()
    }

    /// Submit the first form on the current page.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Session::submit_form_in`].
    pub fn submit_form(&mut self) -> NavegarResult<&mut Self> {
        self.submit_form_in("form")
    }

    /// Submit the first form matching `form`.
    ///
    /// Field values scraped from the form are merged under the values the
    /// test author already stored, then everything is submitted with the
    /// form's method and action. A form without an action posts back to the
    /// session's current target.
    ///
    /// # Errors
    ///
    /// `FormNotFound` when no form matches; `InvalidRequest` before any
    /// page is loaded.
    pub fn submit_form_in(&mut self, form: &str) -> NavegarResult<&mut Self> {
        let doc = self.current_document("submit_form")?;
        let scraped = self.engine.form_fields(doc, form)?;
        let action = self.engine.form_action(doc, form)?;
        let method = match self.engine.form_method(doc, form)? {
            Some(raw) => Method::parse(&raw)?,
            None => Method::Post,
        };
        let target = match action {
            Some(action) => Target::route(action),
            None => self.current.clone().ok_or_else(|| {
                NavegarError::invalid_request(
                    "form has no action and the session has no current target",
                )
            })?,
        };
        self.pending.absorb(scraped);
        let parameters = self.pending.take();
        self.perform_with(method, target, parameters)
    }

    /// Submit an explicit parameter set, skipping page scraping entirely.
    ///
    /// # Errors
    ///
    /// Framework errors propagate unchanged.
    pub fn submit_form_to(
        &mut self,
        method: Method,
        target: Target,
        parameters: PendingInputs,
    ) -> NavegarResult<&mut Self> {
        self.perform_with(method, target, parameters)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Kind of the last completed dispatch; `None` until one completes,
    /// and after a failed dispatch
    #[must_use]
    pub const fn last_dispatch_kind(&self) -> Option<DispatchKind> {
        self.last_kind
    }

    /// Target the last completed dispatch landed on (after redirects)
    #[must_use]
    pub const fn current_target(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    /// Parsed document of the current page
    #[must_use]
    pub const fn document(&self) -> Option<&E::Document> {
        self.document.as_ref()
    }

    /// Rendered body of the current page
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Framework response metadata of the current page
    #[must_use]
    pub const fn framework_response(&self) -> Option<&D::Response> {
        self.response.as_ref()
    }

    /// Inputs accumulated but not yet submitted
    #[must_use]
    pub const fn pending(&self) -> &PendingInputs {
        &self.pending
    }

    /// The framework driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the framework driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The document engine
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// The dispatch configuration
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Orchestration
    // ------------------------------------------------------------------

    fn perform(&mut self, method: Method, target: Target) -> NavegarResult<&mut Self> {
        let parameters = self.pending.take();
        self.perform_with(method, target, parameters)
    }

    fn perform_with(
        &mut self,
        method: Method,
        target: Target,
        parameters: PendingInputs,
    ) -> NavegarResult<&mut Self> {
        // A failed or incomplete dispatch must never report a stale kind,
        // and pending inputs never survive a dispatch attempt.
        self.last_kind = None;
        self.pending.reset();
        let kind = target.kind();
        let request = DispatchRequest::new(method, target, parameters);
        let (outcome, landed) = dispatch::run(&mut self.driver, &self.config, request)?;
        let document = self.engine.parse(&outcome.html)?;
        self.last_kind = Some(kind);
        self.current = Some(landed);
        self.html = Some(outcome.html);
        self.document = Some(document);
        self.response = Some(outcome.response);
        Ok(self)
    }

    fn current_document(&self, operation: &str) -> NavegarResult<&E::Document> {
        self.document.as_ref().ok_or_else(|| {
            NavegarError::invalid_request(format!(
                "{operation} requires a page; dispatch a request first"
            ))
        })
    }
}

impl<D, E> std::fmt::Debug for Session<D, E>
where
    D: FrameworkDriver,
    E: DocumentEngine,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pending", &self.pending)
            .field("last_kind", &self.last_kind)
            .field("current", &self.current)
            .field("has_document", &self.document.is_some())
            .finish_non_exhaustive()
    }
}
