//! Plain-text reporting for check runs.

use crate::target::{CheckResult, PageOutcome};

/// Terminal marker printed after a multi-page run, pass or fail.
pub const FINISHED_MARKER: &str = "responsiveness checks finished";

/// One diagnostic line per non-passing result, in result order.
pub fn failure_lines(results: &[CheckResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.passed())
        .map(|r| match &r.outcome {
            PageOutcome::Measured { scroll_width } => format!(
                "{}: expected width {}, got {}",
                r.url, r.expected_width, scroll_width
            ),
            PageOutcome::LoadFailed { reason } => {
                format!("{}: failed to fetch page: {}", r.url, reason)
            }
            PageOutcome::TimedOut => {
                format!("{}: no result before the per-page deadline", r.url)
            }
        })
        .collect()
}

/// Full report for a multi-page run: failure lines, then the marker.
pub fn report_lines(results: &[CheckResult]) -> Vec<String> {
    let mut lines = failure_lines(results);
    lines.push(FINISHED_MARKER.to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{CheckTarget, Viewport};

    #[test]
    fn passing_results_produce_no_lines() {
        let target = CheckTarget::new("http://a/", Viewport::at_width(568));
        let results = vec![CheckResult::measured(&target, 568)];

        assert!(failure_lines(&results).is_empty());
    }

    #[test]
    fn report_ends_with_the_marker_even_when_clean() {
        let target = CheckTarget::new("http://a/", Viewport::at_width(568));
        let lines = report_lines(&[CheckResult::measured(&target, 568)]);

        assert_eq!(lines, vec![FINISHED_MARKER.to_string()]);
    }

    #[test]
    fn report_lists_failures_before_the_marker() {
        let ok = CheckTarget::new("http://a/", Viewport::at_width(568));
        let bad = CheckTarget::new("http://b/", Viewport::at_width(320));
        let results = vec![
            CheckResult::measured(&ok, 568),
            CheckResult::measured(&bad, 412),
        ];

        let lines = report_lines(&results);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("http://b/"));
        assert!(lines[0].contains("320"));
        assert_eq!(lines[1], FINISHED_MARKER);
    }

    #[test]
    fn timeout_line_names_the_url() {
        let target = CheckTarget::new("http://hung/", Viewport::at_width(568));
        let lines = failure_lines(&[CheckResult::timed_out(&target)]);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("http://hung/"));
    }
}
