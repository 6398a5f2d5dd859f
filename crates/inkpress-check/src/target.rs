//! Check targets and their outcomes.

/// Browser viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Horizontal dimension
    pub width: u32,
    /// Vertical dimension
    pub height: u32,
}

/// Default viewport height for responsiveness checks.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 320;

impl Viewport {
    /// A viewport of the given width at the default check height.
    pub fn at_width(width: u32) -> Self {
        Self {
            width,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// One page to check: a URL and the viewport it must fit exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTarget {
    /// Page URL
    pub url: String,
    /// Viewport the browser is sized to before loading
    pub viewport: Viewport,
}

impl CheckTarget {
    /// Create a new check target.
    pub fn new(url: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            url: url.into(),
            viewport,
        }
    }
}

/// What happened when a target was probed.
///
/// Every probe attempt resolves to exactly one outcome; a page that never
/// signals completion becomes `TimedOut` rather than stalling the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page loaded and its content width was measured
    Measured {
        /// `document.body.scrollWidth` after the settle delay
        scroll_width: u32,
    },

    /// The load-finished signal reported failure (network error, bad URL)
    LoadFailed {
        /// Human-readable cause
        reason: String,
    },

    /// No result arrived before the per-page deadline
    TimedOut,
}

/// The recorded result for one check target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Page URL
    pub url: String,
    /// Viewport width the page was expected to fit
    pub expected_width: u32,
    /// What the probe observed
    pub outcome: PageOutcome,
}

impl CheckResult {
    /// A result for a page whose width was measured.
    pub fn measured(target: &CheckTarget, scroll_width: u32) -> Self {
        Self {
            url: target.url.clone(),
            expected_width: target.viewport.width,
            outcome: PageOutcome::Measured { scroll_width },
        }
    }

    /// A result for a page that failed to load.
    pub fn load_failed(target: &CheckTarget, reason: impl Into<String>) -> Self {
        Self {
            url: target.url.clone(),
            expected_width: target.viewport.width,
            outcome: PageOutcome::LoadFailed {
                reason: reason.into(),
            },
        }
    }

    /// A result for a page that produced no outcome before the deadline.
    pub fn timed_out(target: &CheckTarget) -> Self {
        Self {
            url: target.url.clone(),
            expected_width: target.viewport.width,
            outcome: PageOutcome::TimedOut,
        }
    }

    /// True when the measured width equals the expected width.
    pub fn passed(&self) -> bool {
        matches!(
            self.outcome,
            PageOutcome::Measured { scroll_width } if scroll_width == self.expected_width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_width_passes() {
        let target = CheckTarget::new("http://example.com/", Viewport::at_width(568));
        assert!(CheckResult::measured(&target, 568).passed());
    }

    #[test]
    fn oversized_content_fails() {
        let target = CheckTarget::new("http://example.com/", Viewport::at_width(568));
        assert!(!CheckResult::measured(&target, 600).passed());
    }

    #[test]
    fn load_failure_is_not_a_pass() {
        let target = CheckTarget::new("http://example.com/", Viewport::at_width(568));
        assert!(!CheckResult::load_failed(&target, "dns failure").passed());
        assert!(!CheckResult::timed_out(&target).passed());
    }

    #[test]
    fn default_height_is_320() {
        assert_eq!(Viewport::at_width(568).height, 320);
    }
}
