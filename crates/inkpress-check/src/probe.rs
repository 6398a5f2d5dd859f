//! Trait seam between the checkers and the browser automation backend.

use futures::future::BoxFuture;

use crate::target::CheckTarget;

/// Errors a probe can produce.
///
/// All of these are distinct from a width mismatch: a mismatch is a valid
/// measurement of a misbehaving page, while these mean no measurement exists.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to fetch page: {0}")]
    Navigation(String),

    #[error("failed to measure page width: {0}")]
    Evaluation(String),
}

/// Measures the rendered content width of a page.
///
/// Implementations load the target URL in a browser sized to the target's
/// viewport, wait for the load-finished signal, and report
/// `document.body.scrollWidth`.
pub trait PageProbe: Send + Sync {
    /// Load the page and measure its scroll width in pixels.
    fn measure<'a>(&'a self, target: &'a CheckTarget) -> BoxFuture<'a, Result<u32, ProbeError>>;
}
