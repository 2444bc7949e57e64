//! Assertions over the current page and framework state.
//!
//! `Session::expect()` returns an [`Expect`] builder whose methods chain
//! like the interaction methods do. Only this module raises
//! `AssertionFailed`; the dispatch path never does.

use crate::dom::DocumentEngine;
use crate::driver::{FrameworkDriver, StateInspector};
use crate::request::{DispatchKind, Target};
use crate::result::{NavegarError, NavegarResult};
use crate::session::Session;

/// Result of a single assertion
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Turn a failing result into `AssertionFailed`
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` carrying the message when the assertion
    /// did not pass.
    pub fn into_result(self) -> NavegarResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(NavegarError::AssertionFailed {
                message: self.message,
            })
        }
    }
}

/// Pattern for matching the current route
#[derive(Debug, Clone)]
pub enum RouteMatcher {
    /// Exact route match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(String),
    /// Match any route
    Any,
}

impl RouteMatcher {
    /// Exact route matcher
    pub fn exact(route: impl Into<String>) -> Self {
        Self::Exact(route.into())
    }

    /// Prefix matcher
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Substring matcher
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    /// Regex matcher
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(pattern.into())
    }

    /// Check if a route matches this pattern
    #[must_use]
    pub fn matches(&self, route: &str) -> bool {
        match self {
            Self::Exact(pattern) => route == pattern,
            Self::Prefix(pattern) => route.starts_with(pattern),
            Self::Contains(pattern) => route.contains(pattern),
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(route))
                .unwrap_or(false),
            Self::Any => true,
        }
    }
}

impl<D, E> Session<D, E>
where
    D: FrameworkDriver,
    E: DocumentEngine,
{
    /// Build assertions over the current page
    #[must_use]
    pub const fn expect(&self) -> Expect<'_, D, E> {
        Expect { session: self }
    }
}

/// Chainable assertions over a session's current page
#[derive(Debug)]
pub struct Expect<'a, D, E>
where
    D: FrameworkDriver,
    E: DocumentEngine,
{
    session: &'a Session<D, E>,
}

impl<D, E> Expect<'_, D, E>
where
    D: FrameworkDriver,
    E: DocumentEngine,
{
    /// Assert the rendered page contains `needle`.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when the text is absent; `InvalidRequest` before
    /// any page is loaded.
    pub fn see_text(&self, needle: &str) -> NavegarResult<&Self> {
        let doc = self.document()?;
        if self.session.engine().contains_text(doc, needle) {
            Ok(self)
        } else {
            AssertionResult::fail(format!("expected page to contain '{needle}'"))
                .into_result()
                .map(|()| self)
        }
    }

    /// Assert the rendered page does not contain `needle`.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when the text is present.
    pub fn dont_see_text(&self, needle: &str) -> NavegarResult<&Self> {
        let doc = self.document()?;
        if self.session.engine().contains_text(doc, needle) {
            AssertionResult::fail(format!("expected page not to contain '{needle}'"))
                .into_result()
                .map(|()| self)
        } else {
            Ok(self)
        }
    }

    /// Assert an element matches the CSS selector.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when nothing matches; `Selector` for a malformed
    /// selector.
    pub fn see_element(&self, selector: &str) -> NavegarResult<&Self> {
        let doc = self.document()?;
        if self.session.engine().has_element(doc, selector)? {
            Ok(self)
        } else {
            AssertionResult::fail(format!("expected an element matching '{selector}'"))
                .into_result()
                .map(|()| self)
        }
    }

    /// Assert the first element matching `selector` renders exactly
    /// `expected`.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when nothing matches; `AssertionFailed` on a text
    /// mismatch.
    pub fn see_text_in(&self, selector: &str, expected: &str) -> NavegarResult<&Self> {
        let doc = self.document()?;
        let actual = self.session.engine().element_text(doc, selector)?;
        if actual == expected {
            Ok(self)
        } else {
            AssertionResult::fail(format!(
                "expected '{selector}' to render '{expected}', got '{actual}'"
            ))
            .into_result()
            .map(|()| self)
        }
    }

    /// Assert the named field currently holds `expected`.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when the field is missing or holds another value.
    pub fn see_in_field(&self, name: &str, expected: &str) -> NavegarResult<&Self> {
        let doc = self.document()?;
        let actual = self.session.engine().field_value(doc, name)?;
        match actual.as_ref().and_then(|value| value.as_str()) {
            Some(actual) if actual == expected => Ok(self),
            Some(actual) => AssertionResult::fail(format!(
                "expected field '{name}' to hold '{expected}', got '{actual}'"
            ))
            .into_result()
            .map(|()| self),
            None => AssertionResult::fail(format!(
                "expected field '{name}' to hold '{expected}', but no such field"
            ))
            .into_result()
            .map(|()| self),
        }
    }

    /// Assert the current route matches.
    ///
    /// Only meaningful after a route dispatch: after an event dispatch (or
    /// none at all) this is a usage error, not an assertion failure.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when the last dispatch was not route-based;
    /// `AssertionFailed` when the route does not match.
    pub fn see_current_route(&self, matcher: &RouteMatcher) -> NavegarResult<&Self> {
        match self.session.last_dispatch_kind() {
            Some(DispatchKind::Route) => {}
            Some(DispatchKind::Event) => {
                return Err(NavegarError::invalid_request(
                    "current route is only meaningful after a route dispatch; \
                     the last dispatch used an event",
                ))
            }
            None => {
                return Err(NavegarError::invalid_request(
                    "current route is unknown; no dispatch has completed",
                ))
            }
        }
        match self.session.current_target() {
            Some(Target::Route(route)) => {
                if matcher.matches(route) {
                    Ok(self)
                } else {
                    AssertionResult::fail(format!(
                        "expected current route '{route}' to match {matcher:?}"
                    ))
                    .into_result()
                    .map(|()| self)
                }
            }
            _ => Err(NavegarError::invalid_request(
                "the last dispatch landed on an event, not a route",
            )),
        }
    }

    fn document(&self) -> NavegarResult<&E::Document> {
        self.session.document().ok_or_else(|| {
            NavegarError::invalid_request("assertion requires a page; dispatch a request first")
        })
    }
}

impl<D, E> Expect<'_, D, E>
where
    D: FrameworkDriver + StateInspector,
    E: DocumentEngine,
{
    /// Assert the framework rendered the named view.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when another (or no) view was rendered.
    pub fn see_view(&self, name: &str) -> NavegarResult<&Self> {
        match self.session.driver().current_view() {
            Some(view) if view == name => Ok(self),
            Some(view) => {
                AssertionResult::fail(format!("expected view '{name}', got '{view}'"))
                    .into_result()
                    .map(|()| self)
            }
            None => AssertionResult::fail(format!("expected view '{name}', but none was rendered"))
                .into_result()
                .map(|()| self),
        }
    }

    /// Assert a request-collection value (params, session, flash, ...).
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when the key is absent or holds another value.
    pub fn see_request_value(
        &self,
        collection: &str,
        key: &str,
        expected: &str,
    ) -> NavegarResult<&Self> {
        match self.session.driver().request_value(collection, key) {
            Some(actual) if actual == expected => Ok(self),
            Some(actual) => AssertionResult::fail(format!(
                "expected {collection}.{key} to be '{expected}', got '{actual}'"
            ))
            .into_result()
            .map(|()| self),
            None => AssertionResult::fail(format!(
                "expected {collection}.{key} to be '{expected}', but the key is absent"
            ))
            .into_result()
            .map(|()| self),
        }
    }
}
