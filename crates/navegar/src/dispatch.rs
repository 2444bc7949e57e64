//! Request orchestration: driving the framework and following redirects.

use crate::driver::FrameworkDriver;
use crate::request::{DispatchOutcome, DispatchRequest, Target};
use crate::result::{NavegarError, NavegarResult};

/// Default redirect hop cap per top-level dispatch
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Dispatch behavior configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum driver invocations per top-level dispatch; a chain that is
    /// still redirecting at this count fails with `RedirectLoop`
    pub max_redirects: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl DispatchConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the redirect hop cap
    #[must_use]
    pub const fn with_max_redirects(mut self, cap: usize) -> Self {
        self.max_redirects = cap;
        self
    }
}

/// Dispatch `request` and follow redirects until a terminal outcome.
///
/// Each hop re-uses the original method and carries only the parameters the
/// redirect itself supplies; accumulated inputs are never restored. Driver
/// errors propagate unchanged. Returns the terminal outcome together with
/// the target the chain landed on.
pub(crate) fn run<D: FrameworkDriver>(
    driver: &mut D,
    config: &DispatchConfig,
    mut request: DispatchRequest,
) -> NavegarResult<(DispatchOutcome<D::Response>, Target)> {
    let mut hops = 0usize;
    loop {
        hops += 1;
        tracing::debug!(
            method = request.method.as_str(),
            target = request.target.as_str(),
            hops,
            "dispatching"
        );
        let outcome = driver.dispatch(&request)?;
        let Some(redirect) = outcome.redirect else {
            return Ok((
                DispatchOutcome {
                    redirect: None,
                    html: outcome.html,
                    response: outcome.response,
                },
                request.target,
            ));
        };
        if hops >= config.max_redirects {
            tracing::debug!(hops, "redirect cap reached");
            return Err(NavegarError::RedirectLoop { hops });
        }
        tracing::debug!(target = redirect.target.as_str(), "following redirect");
        request = DispatchRequest::new(request.method, redirect.target, redirect.parameters);
    }
}
