//! Navegar: browser-style integration testing for server-side MVC apps.
//!
//! Navegar simulates a user session against an application dispatched
//! in-process: no network listener, no browser. Tests visit routes or
//! framework events, fill and submit forms, follow redirects, and assert
//! on the rendered page — all through a fluent session handle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    NAVEGAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐    ┌────────────┐    ┌───────────────────┐     │
//! │  │ Test     │    │ Session    │    │ FrameworkDriver   │     │
//! │  │ (fluent  │───►│ (inputs,   │───►│ (in-process       │     │
//! │  │  calls)  │    │  redirects)│    │  dispatch)        │     │
//! │  └──────────┘    └─────┬──────┘    └───────────────────┘     │
//! │                        │                                     │
//! │                  ┌─────▼──────┐                              │
//! │                  │ Document   │                              │
//! │                  │ Engine     │                              │
//! │                  └────────────┘                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The framework under test sits behind [`FrameworkDriver`] (one dispatch
//! primitive) and [`StateInspector`] (read-only state for assertions); page
//! parsing and queries sit behind [`DocumentEngine`], with [`HtmlEngine`]
//! as the `scraper`-backed default. [`MockFramework`] scripts dispatch
//! outcomes for unit tests.
//!
//! # Example
//!
//! ```
//! use navegar::{MockFramework, RouteMatcher, Session, Target};
//!
//! let driver = MockFramework::new()
//!     .page(r#"<html><form action="/register" method="post">
//!               <input type="text" name="name" />
//!               <input type="submit" value="Register" />
//!           </form></html>"#)
//!     .redirect(Target::route("/welcome"))
//!     .page("<html><h1>Welcome!</h1></html>");
//!
//! let mut session = Session::start(driver);
//! session.visit("/signup")?;
//! session.type_text("name", "Eric");
//! session.press("Register")?;
//! session
//!     .expect()
//!     .see_text("Welcome!")?
//!     .see_current_route(&RouteMatcher::exact("/welcome"))?;
//! # Ok::<(), navegar::NavegarError>(())
//! ```

#![warn(missing_docs)]

mod assertion;
mod dispatch;
mod dom;
mod driver;
mod inputs;
mod request;
mod result;
mod session;

pub use assertion::{AssertionResult, Expect, RouteMatcher};
pub use dispatch::{DispatchConfig, DEFAULT_MAX_REDIRECTS};
pub use dom::{DocumentEngine, HtmlEngine};
pub use driver::{
    FrameworkDriver, MockFramework, MockFrameworkError, MockResponse, MockStep, StateInspector,
};
pub use inputs::{FieldValue, PendingInputs};
pub use request::{DispatchKind, DispatchOutcome, DispatchRequest, Method, Redirect, Target};
pub use result::{NavegarError, NavegarResult};
pub use session::Session;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::{AssertionResult, Expect, RouteMatcher};
    pub use super::dispatch::{DispatchConfig, DEFAULT_MAX_REDIRECTS};
    pub use super::dom::{DocumentEngine, HtmlEngine};
    pub use super::driver::{
        FrameworkDriver, MockFramework, MockFrameworkError, MockResponse, MockStep, StateInspector,
    };
    pub use super::inputs::{FieldValue, PendingInputs};
    pub use super::request::{
        DispatchKind, DispatchOutcome, DispatchRequest, Method, Redirect, Target,
    };
    pub use super::result::{NavegarError, NavegarResult};
    pub use super::session::Session;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod event_dispatch_tests {
        use super::*;

        #[test]
        fn test_event_visit_renders_page_and_records_kind() {
            let mut session = Session::start(
                MockFramework::new().page("<html><h1>Welcome</h1></html>"),
            );
            session.visit_event("register.new").unwrap();
            assert_eq!(session.last_dispatch_kind(), Some(DispatchKind::Event));
            session.expect().see_text("Welcome").unwrap();

            let request = &session.driver().requests()[0];
            assert_eq!(request.method, Method::Get);
            assert_eq!(request.target, Target::event("register.new"));
            assert!(request.parameters.is_empty());
        }
    }

    mod redirect_tests {
        use super::*;

        #[test]
        fn test_post_redirect_is_followed_with_redirect_parameters() {
            let mut session = Session::start(
                MockFramework::new()
                    .redirect(Target::route("/"))
                    .page("<html>Home</html>"),
            );
            session.type_text("name", "Eric");
            session.submit_request("POST", Some("/register"), None).unwrap();

            assert_eq!(session.last_dispatch_kind(), Some(DispatchKind::Route));
            assert_eq!(session.current_target(), Some(&Target::route("/")));
            assert!(session.html().unwrap().contains("Home"));

            let requests = session.driver().requests();
            assert_eq!(requests.len(), 2);
            // The hop re-uses the verb but carries only the redirect's own
            // (here empty) parameters.
            assert_eq!(requests[1].method, Method::Post);
            assert!(requests[1].parameters.is_empty());
            assert!(session.pending().is_empty());
        }

        #[test]
        fn test_original_kind_survives_redirect_to_other_kind() {
            let mut session = Session::start(
                MockFramework::new()
                    .redirect(Target::route("/fallback"))
                    .page("<html></html>"),
            );
            session.visit_event("orders.create").unwrap();
            // The chain landed on a route, but the recorded kind belongs to
            // the original call.
            assert_eq!(session.last_dispatch_kind(), Some(DispatchKind::Event));
            assert_eq!(session.current_target(), Some(&Target::route("/fallback")));
        }

        #[test]
        fn test_chain_below_cap_terminates() {
            let mut session = Session::start(
                MockFramework::new()
                    .redirect(Target::route("/a"))
                    .redirect(Target::route("/b"))
                    .page("<html>b</html>"),
            )
            .with_config(DispatchConfig::new().with_max_redirects(5));
            session.visit("/").unwrap();
            assert_eq!(session.current_target(), Some(&Target::route("/b")));
            assert!(session.pending().is_empty());
        }

        #[test]
        fn test_self_redirect_fails_at_cap() {
            let mut session = Session::start(
                MockFramework::new().always_redirect(Target::route("/loop")),
            )
            .with_config(DispatchConfig::new().with_max_redirects(2));
            let err = session.visit("/loop").unwrap_err();
            assert!(matches!(err, NavegarError::RedirectLoop { hops: 2 }));
            assert_eq!(session.driver().requests().len(), 2);
            // A failed chain reports no kind and keeps nothing pending.
            assert_eq!(session.last_dispatch_kind(), None);
            assert!(session.pending().is_empty());
        }
    }

    mod full_flow_tests {
        use super::*;

        const SIGNUP_PAGE: &str = r#"
            <html><body>
                <h1>Sign up</h1>
                <form action="/register" method="post">
                    <input type="text" name="name" />
                    <input type="checkbox" name="tos" />
                    <input type="submit" name="go" value="Register" />
                </form>
            </body></html>
        "#;

        #[test]
        fn test_registration_flow_end_to_end() {
            let driver = MockFramework::new()
                .page(SIGNUP_PAGE)
                .redirect(Target::route("/welcome"))
                .page("<html><h1>Welcome, Eric!</h1></html>")
                .with_value("flash", "notice", "Account created");

            let mut session = Session::start(driver);
            session.visit("/signup").unwrap();
            session.type_text("name", "Eric").check("tos");
            session.press("Register").unwrap();

            session
                .expect()
                .see_text("Welcome, Eric!")
                .unwrap()
                .see_current_route(&RouteMatcher::exact("/welcome"))
                .unwrap()
                .see_request_value("flash", "notice", "Account created")
                .unwrap();

            let requests = session.driver().requests();
            assert_eq!(requests.len(), 3);
            assert_eq!(requests[1].method, Method::Post);
            assert_eq!(requests[1].target, Target::route("/register"));
            assert_eq!(
                requests[1].parameters.get("name"),
                Some(&FieldValue::text("Eric"))
            );
            assert_eq!(
                requests[1].parameters.get("tos"),
                Some(&FieldValue::Checked(true))
            );
            assert_eq!(session.last_dispatch_kind(), Some(DispatchKind::Route));
            assert!(session.pending().is_empty());
        }

        #[test]
        fn test_framework_error_reaches_the_test_unchanged() {
            let mut session =
                Session::start(MockFramework::new().fail("no route matched GET /nope"));
            let err = session.visit("/nope").unwrap_err();
            assert!(matches!(err, NavegarError::Framework(_)));
            assert_eq!(err.to_string(), "no route matched GET /nope");
        }
    }
}
