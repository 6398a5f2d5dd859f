//! Responsiveness check commands.

use std::process::ExitCode;
use std::time::Duration;

use inkpress_check::{
    check_page, check_pages, failure_lines, report_lines, BrowserProbe, CheckOptions, CheckResult,
    CheckTarget, Viewport,
};

/// Check a single page against an explicit viewport width.
///
/// Exit code 0 when the measured width matches, 1 on a mismatch or a page
/// that failed to load.
pub async fn run_single(url: String, width: u32, settle_ms: u64) -> ExitCode {
    let probe = BrowserProbe::with_settle_delay(Duration::from_millis(settle_ms));
    let target = CheckTarget::new(url, Viewport::at_width(width));

    let result = check_page(&probe, &target).await;

    for line in failure_lines(std::slice::from_ref(&result)) {
        println!("{}", line);
    }
    ExitCode::from(single_exit_code(&result))
}

/// Check many pages concurrently against one viewport width.
///
/// Prints one line per non-passing page and a terminal marker, then exits
/// 1 if anything failed unless `exit_zero` is set.
pub async fn run_many(
    urls: Vec<String>,
    width: u32,
    settle_ms: u64,
    timeout_secs: u64,
    exit_zero: bool,
) -> ExitCode {
    let probe = BrowserProbe::with_settle_delay(Duration::from_millis(settle_ms));
    let opts = CheckOptions {
        per_page_timeout: Duration::from_secs(timeout_secs),
    };

    let results = check_pages(&probe, &urls, width, &opts).await;

    for line in report_lines(&results) {
        println!("{}", line);
    }
    ExitCode::from(aggregate_exit_code(&results, exit_zero))
}

fn single_exit_code(result: &CheckResult) -> u8 {
    if result.passed() {
        0
    } else {
        1
    }
}

fn aggregate_exit_code(results: &[CheckResult], exit_zero: bool) -> u8 {
    if exit_zero || results.iter().all(CheckResult::passed) {
        0
    } else {
        1
    }
}
