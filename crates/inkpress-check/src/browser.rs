//! Headless-browser probe backed by chromiumoxide.

use std::future::Future;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::future::BoxFuture;
use futures::StreamExt;

use crate::probe::{PageProbe, ProbeError};
use crate::target::CheckTarget;

/// Default settle delay applied after the load-finished signal.
///
/// Gives late asynchronous layout work (web fonts, responsive JS) a chance
/// to finish before the width is read. A heuristic, not a guarantee.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Probe that launches one isolated headless Chromium instance per target.
#[derive(Debug, Clone)]
pub struct BrowserProbe {
    settle_delay: Duration,
}

impl BrowserProbe {
    /// Create a probe with the default settle delay.
    pub fn new() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Override the settle delay.
    pub fn with_settle_delay(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }
}

impl Default for BrowserProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl PageProbe for BrowserProbe {
    fn measure<'a>(&'a self, target: &'a CheckTarget) -> BoxFuture<'a, Result<u32, ProbeError>> {
        // Runs on its own task so browser teardown still happens when the
        // caller's deadline drops this future mid-flight.
        Box::pin(run_detached(measure_page(
            target.clone(),
            self.settle_delay,
        )))
    }
}

/// Run browser work on a spawned task and await its outcome.
///
/// The spawned task keeps running to completion even if the returned future
/// is dropped, so the teardown at the end of [`measure_page`] always runs.
async fn run_detached<T, F>(work: F) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, ProbeError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(result) => result,
        Err(e) => Err(ProbeError::Launch(format!("browser task failed: {}", e))),
    }
}

async fn measure_page(target: CheckTarget, settle_delay: Duration) -> Result<u32, ProbeError> {
    let viewport = chromiumoxide::handler::viewport::Viewport {
        width: target.viewport.width,
        height: target.viewport.height,
        ..Default::default()
    };

    let config = BrowserConfig::builder()
        .window_size(target.viewport.width, target.viewport.height)
        .viewport(viewport)
        .build()
        .map_err(ProbeError::Launch)?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| ProbeError::Launch(e.to_string()))?;

    // The handler stream must be driven for the browser to make progress.
    let driver = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let result = load_and_measure(&browser, &target, settle_delay).await;

    if let Err(e) = browser.close().await {
        tracing::debug!("browser close failed: {}", e);
    }
    let _ = browser.wait().await;
    driver.abort();

    result
}

async fn load_and_measure(
    browser: &Browser,
    target: &CheckTarget,
    settle_delay: Duration,
) -> Result<u32, ProbeError> {
    let page = browser
        .new_page(target.url.as_str())
        .await
        .map_err(|e| ProbeError::Navigation(e.to_string()))?;

    page.wait_for_navigation()
        .await
        .map_err(|e| ProbeError::Navigation(e.to_string()))?;

    tokio::time::sleep(settle_delay).await;

    // scrollWidth includes any oversized content, which is exactly
    // what an overflowing non-responsive page produces.
    let width: u32 = page
        .evaluate("document.body.scrollWidth")
        .await
        .map_err(|e| ProbeError::Evaluation(e.to_string()))?
        .into_value()
        .map_err(|e| ProbeError::Evaluation(e.to_string()))?;

    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn detached_work_survives_caller_timeout() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let work = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(0u32)
        };

        let outcome = tokio::time::timeout(Duration::from_millis(5), run_detached(work)).await;
        assert!(outcome.is_err(), "deadline should expire first");

        // The spawned task must have kept running after the caller gave up.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn detached_errors_propagate() {
        let work = async { Err::<u32, _>(ProbeError::Navigation("refused".into())) };

        let result = run_detached(work).await;
        assert!(matches!(result, Err(ProbeError::Navigation(_))));
    }
}
