//! Single-page and multi-page check runners.

use std::time::Duration;

use crate::probe::PageProbe;
use crate::target::{CheckResult, CheckTarget, Viewport};

/// Options for a multi-page run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Deadline for each page to produce an outcome.
    ///
    /// Guarantees forward progress: a page whose load hangs becomes a
    /// `TimedOut` result instead of stalling the whole run.
    pub per_page_timeout: Duration,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            per_page_timeout: Duration::from_secs(30),
        }
    }
}

/// Check a single page against its expected viewport width.
pub async fn check_page(probe: &dyn PageProbe, target: &CheckTarget) -> CheckResult {
    match probe.measure(target).await {
        Ok(width) => CheckResult::measured(target, width),
        Err(e) => CheckResult::load_failed(target, e.to_string()),
    }
}

/// Check many pages concurrently against one expected viewport width.
///
/// Completion order across pages is unspecified; the returned results are
/// in input order regardless of which page finished first. The run is
/// complete only once every target has exactly one recorded outcome.
pub async fn check_pages(
    probe: &dyn PageProbe,
    urls: &[String],
    width: u32,
    opts: &CheckOptions,
) -> Vec<CheckResult> {
    let targets: Vec<CheckTarget> = urls
        .iter()
        .map(|url| CheckTarget::new(url.clone(), Viewport::at_width(width)))
        .collect();

    let checks = targets.iter().map(|target| async move {
        match tokio::time::timeout(opts.per_page_timeout, probe.measure(target)).await {
            Ok(Ok(measured)) => CheckResult::measured(target, measured),
            Ok(Err(e)) => CheckResult::load_failed(target, e.to_string()),
            Err(_) => CheckResult::timed_out(target),
        }
    });

    futures::future::join_all(checks).await
}
