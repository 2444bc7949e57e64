//! Simulated request and dispatch-outcome model.

use crate::inputs::PendingInputs;
use crate::result::{NavegarError, NavegarResult};
use serde::{Deserialize, Serialize};

/// HTTP verbs accepted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// PATCH request
    Patch,
    /// HEAD request
    Head,
    /// OPTIONS request
    Options,
}

impl Method {
    /// Parse from string, normalizing case.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a verb outside the accepted set.
    pub fn parse(s: &str) -> NavegarResult<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(NavegarError::invalid_request(format!(
                "unknown HTTP method '{s}'"
            ))),
        }
    }

    /// Canonical uppercase form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = NavegarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Dispatch target: a router path or a framework-internal event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// URL-like path dispatched through the host framework's router
    Route(String),
    /// Handler/action identifier dispatched directly, bypassing routing
    Event(String),
}

impl Target {
    /// Create a route target
    pub fn route(path: impl Into<String>) -> Self {
        Self::Route(path.into())
    }

    /// Create an event target
    pub fn event(name: impl Into<String>) -> Self {
        Self::Event(name.into())
    }

    /// Build from optional route/event inputs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` unless exactly one of the two is supplied.
    pub fn from_parts(route: Option<&str>, event: Option<&str>) -> NavegarResult<Self> {
        match (route, event) {
            (Some(route), None) => Ok(Self::route(route)),
            (None, Some(event)) => Ok(Self::event(event)),
            _ => Err(NavegarError::invalid_request(
                "must supply exactly one of route or event",
            )),
        }
    }

    /// Which kind of dispatch this target produces
    #[must_use]
    pub const fn kind(&self) -> DispatchKind {
        match self {
            Self::Route(_) => DispatchKind::Route,
            Self::Event(_) => DispatchKind::Event,
        }
    }

    /// The route path or event name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Route(s) | Self::Event(s) => s,
        }
    }
}

/// Which kind of target a completed dispatch used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchKind {
    /// Dispatched through the router
    Route,
    /// Dispatched directly to a handler event
    Event,
}

/// A single simulated request handed to the framework driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// HTTP verb
    pub method: Method,
    /// Route or event to dispatch to
    pub target: Target,
    /// Parameter set submitted with the request
    pub parameters: PendingInputs,
}

impl DispatchRequest {
    /// Create a new request
    #[must_use]
    pub const fn new(method: Method, target: Target, parameters: PendingInputs) -> Self {
        Self {
            method,
            target,
            parameters,
        }
    }

    /// Serialize the request for diagnostics and failure messages.
    ///
    /// # Errors
    ///
    /// Returns `Json` when serialization fails.
    pub fn to_json(&self) -> NavegarResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Redirect instruction returned by the framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Where the framework wants the next dispatch to go
    pub target: Target,
    /// Parameters the redirect carries along
    pub parameters: PendingInputs,
}

/// Outcome of one dispatch through the framework driver.
///
/// `R` is the framework's own response metadata, opaque to this crate.
/// A redirect always carries its target; the invariant lives in the type.
#[derive(Debug, Clone)]
pub struct DispatchOutcome<R> {
    /// Present when the framework answered with a redirect
    pub redirect: Option<Redirect>,
    /// Rendered page body
    pub html: String,
    /// Framework-specific response metadata
    pub response: R,
}

impl<R> DispatchOutcome<R> {
    /// Terminal outcome with a rendered page
    pub fn page(html: impl Into<String>, response: R) -> Self {
        Self {
            redirect: None,
            html: html.into(),
            response,
        }
    }

    /// Redirect outcome pointing at the next target
    pub fn redirect_to(target: Target, parameters: PendingInputs, response: R) -> Self {
        Self {
            redirect: Some(Redirect { target, parameters }),
            html: String::new(),
            response,
        }
    }

    /// Whether this outcome is a redirect
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod method_tests {
        use super::*;

        #[test]
        fn test_parse_normalizes_case() {
            assert_eq!(Method::parse("get").unwrap(), Method::Get);
            assert_eq!(Method::parse("Post").unwrap(), Method::Post);
            assert_eq!(Method::parse("DELETE").unwrap(), Method::Delete);
        }

        #[test]
        fn test_parse_rejects_unknown_verb() {
            let err = Method::parse("FETCH").unwrap_err();
            assert!(matches!(err, NavegarError::InvalidRequest { .. }));
        }

        #[test]
        fn test_as_str_is_uppercase() {
            assert_eq!(Method::Patch.as_str(), "PATCH");
            assert_eq!(Method::Get.to_string(), "GET");
        }
    }

    mod target_tests {
        use super::*;

        #[test]
        fn test_from_parts_route() {
            let target = Target::from_parts(Some("/users"), None).unwrap();
            assert_eq!(target, Target::route("/users"));
            assert_eq!(target.kind(), DispatchKind::Route);
        }

        #[test]
        fn test_from_parts_event() {
            let target = Target::from_parts(None, Some("users.index")).unwrap();
            assert_eq!(target, Target::event("users.index"));
            assert_eq!(target.kind(), DispatchKind::Event);
        }

        #[test]
        fn test_from_parts_rejects_both() {
            let err = Target::from_parts(Some("/users"), Some("users.index")).unwrap_err();
            assert!(matches!(err, NavegarError::InvalidRequest { .. }));
            assert!(err.to_string().contains("exactly one"));
        }

        #[test]
        fn test_from_parts_rejects_neither() {
            let err = Target::from_parts(None, None).unwrap_err();
            assert!(matches!(err, NavegarError::InvalidRequest { .. }));
        }
    }

    mod request_tests {
        use super::*;

        #[test]
        fn test_request_serializes_for_diagnostics() {
            let mut parameters = PendingInputs::new();
            parameters.store("name", "Eric", false);
            let request =
                DispatchRequest::new(Method::Post, Target::route("/register"), parameters);
            let json = request.to_json().unwrap();
            assert!(json.contains("/register"));
            assert!(json.contains("Eric"));
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_page_outcome_is_terminal() {
            let outcome = DispatchOutcome::page("<html></html>", ());
            assert!(!outcome.is_redirect());
            assert_eq!(outcome.html, "<html></html>");
        }

        #[test]
        fn test_redirect_outcome_carries_target() {
            let outcome = DispatchOutcome::redirect_to(Target::route("/"), PendingInputs::new(), ());
            assert!(outcome.is_redirect());
            let redirect = outcome.redirect.unwrap();
            assert_eq!(redirect.target, Target::route("/"));
            assert!(redirect.parameters.is_empty());
        }
    }
}
