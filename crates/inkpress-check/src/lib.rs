//! Responsiveness checks for built blog pages.
//!
//! Loads each page in a headless browser sized to a fixed viewport and
//! asserts that the rendered content width matches the viewport exactly.

pub mod browser;
pub mod probe;
pub mod report;
pub mod runner;
pub mod target;

pub use browser::BrowserProbe;
pub use probe::{PageProbe, ProbeError};
pub use report::{failure_lines, report_lines, FINISHED_MARKER};
pub use runner::{check_page, check_pages, CheckOptions};
pub use target::{CheckResult, CheckTarget, PageOutcome, Viewport};
