//! Build pipeline for the blog.
//!
//! Shells out to the external page generator, inlines compiled CSS into each
//! generated page, minifies the result, and copies images, videos, scripts,
//! and the RSS feed into the output directory.

pub mod assets;
pub mod builder;
pub mod config;
pub mod generator;
pub mod inline;
pub mod styles;

pub use builder::{BuildError, BuildReport, SiteBuilder};
pub use config::BuildConfig;
pub use generator::{resolve_command, GeneratorError, SiteGenerator};
pub use inline::{Inliner, CSS_MARKER};
pub use styles::{StyleBundle, StyleError};
