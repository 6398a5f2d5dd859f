//! CSS inlining and page minification.

/// Head marker the generator leaves in each page for the compiled CSS.
pub const CSS_MARKER: &str = "<!-- inline:head:css -->";

/// Script tag appended to pages when live reload is on.
const RELOAD_SCRIPT_TAG: &str = r#"<script src="/__reload.js"></script>"#;

/// Embeds compiled CSS into generated pages and minifies the result.
///
/// Inlining avoids a separate stylesheet request on first visit, which is
/// the common case for blog traffic.
pub struct Inliner {
    css: String,
    minify: bool,
    live_reload: bool,
}

impl Inliner {
    /// Create an inliner for one compiled CSS blob.
    pub fn new(css: String, minify: bool, live_reload: bool) -> Self {
        Self {
            css,
            minify,
            live_reload,
        }
    }

    /// Process one page: replace the head marker with a style tag, append
    /// the live-reload script when enabled, then minify the document.
    ///
    /// A page without the marker passes through unchanged apart from
    /// minification.
    pub fn inline(&self, html: &str) -> String {
        let mut page = if html.contains(CSS_MARKER) {
            html.replace(CSS_MARKER, &format!("<style>{}</style>", self.css))
        } else {
            tracing::warn!("page has no CSS marker, leaving head untouched");
            html.to_string()
        };

        if self.live_reload {
            if page.contains("</body>") {
                page = page.replacen("</body>", &format!("{}</body>", RELOAD_SCRIPT_TAG), 1);
            } else {
                page.push_str(RELOAD_SCRIPT_TAG);
            }
        }

        if self.minify {
            minify_document(&page)
        } else {
            page
        }
    }
}

/// Minify a whole HTML document.
///
/// Inline CSS is left alone: the style tag contents were already minified
/// by the stylesheet bundle.
fn minify_document(html: &str) -> String {
    let cfg = minify_html::Cfg {
        minify_css: false,
        ..Default::default()
    };

    String::from_utf8_lossy(&minify_html::minify(html.as_bytes(), &cfg)).into_owned()
}
