//! Result and error types for Navegar.

use thiserror::Error;

/// Result type for Navegar operations
pub type NavegarResult<T> = Result<T, NavegarError>;

/// Errors that can occur in Navegar
#[derive(Debug, Error)]
pub enum NavegarError {
    /// Malformed request (usage error at the call site)
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message
        message: String,
    },

    /// Redirect chain exceeded the configured hop cap
    #[error("Redirect loop: gave up after {hops} hops")]
    RedirectLoop {
        /// Hops dispatched before giving up
        hops: usize,
    },

    /// Error raised by the host framework during dispatch.
    ///
    /// Passed through unchanged so the framework's own diagnostic reaches
    /// the test author.
    #[error(transparent)]
    Framework(Box<dyn std::error::Error + Send + Sync>),

    /// Malformed document query
    #[error("Selector error: {message}")]
    Selector {
        /// Error message
        message: String,
    },

    /// No element matched the query
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// The selector or text that matched nothing
        selector: String,
    },

    /// No form matched the query
    #[error("Form not found: {selector}")]
    FormNotFound {
        /// The selector that matched no form
        selector: String,
    },

    /// Assertion failed (raised only by assertion helpers)
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NavegarError {
    /// Wrap a framework-level error for transparent propagation
    pub fn framework<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Framework(Box::new(source))
    }

    /// Build an invalid-request usage error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
