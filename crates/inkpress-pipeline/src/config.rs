//! Build configuration.

use std::path::PathBuf;

/// Configuration for building the blog.
///
/// Threaded explicitly through every step; there is no global mode flag.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Blog source root (contains posts/, styles/, images/, ...)
    pub source_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Generator script, relative to the source root
    pub generator_script: PathBuf,

    /// Interpreter candidates, tried in order; the first one that exists
    /// and is executable wins
    pub interpreters: Vec<PathBuf>,

    /// Stylesheet compiled into every post page, relative to the source root
    pub post_style: PathBuf,

    /// Stylesheet compiled into the index page, relative to the source root
    pub index_style: PathBuf,

    /// Stylesheets bundled after the page stylesheet (reset, syntax
    /// highlighting), relative to the source root
    pub shared_styles: Vec<PathBuf>,

    /// Minify HTML and inlined CSS
    pub minify: bool,

    /// Production build: run copied images through an optimizer if one
    /// is available
    pub production: bool,

    /// Append the live-reload client script to each page (set by serve)
    pub live_reload: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            generator_script: PathBuf::from("app.py"),
            interpreters: vec![
                PathBuf::from("env/bin/python"),
                PathBuf::from("python3"),
                PathBuf::from("python"),
            ],
            post_style: PathBuf::from("styles/post-template.css"),
            index_style: PathBuf::from("styles/main-page.css"),
            shared_styles: vec![
                PathBuf::from("styles/normalize.css"),
                PathBuf::from("styles/pygments.css"),
            ],
            minify: true,
            production: false,
            live_reload: false,
        }
    }
}
