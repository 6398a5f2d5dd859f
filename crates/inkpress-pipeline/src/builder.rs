//! Build orchestration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::assets::{copy_tree, optimize_images, AssetError, IMAGE_OPTIMIZER_CANDIDATES};
use crate::config::BuildConfig;
use crate::generator::{resolve_command, GeneratorError, SiteGenerator};
use crate::inline::Inliner;
use crate::styles::{StyleBundle, StyleError};

/// Result of a build.
#[derive(Debug)]
pub struct BuildReport {
    /// Pages written (posts plus the index)
    pub pages: usize,

    /// Asset files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("generator produced no pages in {0}")]
    NoPages(String),

    #[error("failed to create staging directory: {0}")]
    Staging(std::io::Error),
}

/// Orchestrates the whole pipeline: generate, inline, minify, copy.
pub struct SiteBuilder {
    config: BuildConfig,
}

impl SiteBuilder {
    /// Create a builder for the given configuration.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline: content plus every asset step.
    pub async fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        let pages = self.rebuild_content().await?;

        let mut assets = 0;
        assets += self.copy_images()?;
        assets += self.copy_videos()?;
        assets += self.copy_scripts()?;
        assets += self.copy_supporting_files()?;

        Ok(BuildReport {
            pages,
            assets,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Regenerate and republish the content: posts, index, RSS feed.
    pub async fn rebuild_content(&self) -> Result<usize, BuildError> {
        let staging = tempfile::tempdir().map_err(BuildError::Staging)?;
        let generator = SiteGenerator::resolve(&self.config)?;
        generator.generate(staging.path()).await?;
        self.publish(staging.path())
    }

    /// Publish already-generated content from a staging directory.
    ///
    /// Split out from generation so the content steps are testable without
    /// running the generator subprocess.
    pub fn publish(&self, staging: &Path) -> Result<usize, BuildError> {
        fs::create_dir_all(&self.config.output_dir).map_err(|e| BuildError::Write {
            path: self.config.output_dir.display().to_string(),
            source: e,
        })?;

        let mut pages = 0;
        pages += self.inline_posts(staging)?;
        pages += self.inline_index(staging)?;

        if pages == 0 {
            return Err(BuildError::NoPages(staging.display().to_string()));
        }

        self.copy_rss(staging)?;

        tracing::info!("published {} pages", pages);
        Ok(pages)
    }

    /// Inline CSS into every generated post and write it to output/posts.
    fn inline_posts(&self, staging: &Path) -> Result<usize, BuildError> {
        let posts_dir = staging.join("posts");
        if !posts_dir.is_dir() {
            return Ok(0);
        }

        let css = self.style_bundle(&self.config.post_style)
            .compile(self.config.minify)?;
        let inliner = Inliner::new(css, self.config.minify, self.config.live_reload);

        let out_dir = self.config.output_dir.join("posts");
        fs::create_dir_all(&out_dir).map_err(|e| BuildError::Write {
            path: out_dir.display().to_string(),
            source: e,
        })?;

        let posts: Vec<PathBuf> = fs::read_dir(&posts_dir)
            .map_err(|e| BuildError::Read {
                path: posts_dir.display().to_string(),
                source: e,
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();

        posts.par_iter().try_for_each(|post| {
            let name = post.file_name().unwrap_or_default();
            self.inline_one(&inliner, post, &out_dir.join(name))
        })?;

        Ok(posts.len())
    }

    /// The index page gets its own stylesheet but the same treatment.
    fn inline_index(&self, staging: &Path) -> Result<usize, BuildError> {
        let index = staging.join("index.htm");
        if !index.is_file() {
            return Ok(0);
        }

        let css = self.style_bundle(&self.config.index_style)
            .compile(self.config.minify)?;
        let inliner = Inliner::new(css, self.config.minify, self.config.live_reload);

        self.inline_one(&inliner, &index, &self.config.output_dir.join("index.htm"))?;
        Ok(1)
    }

    fn inline_one(&self, inliner: &Inliner, from: &Path, to: &Path) -> Result<(), BuildError> {
        let html = fs::read_to_string(from).map_err(|e| BuildError::Read {
            path: from.display().to_string(),
            source: e,
        })?;

        fs::write(to, inliner.inline(&html)).map_err(|e| BuildError::Write {
            path: to.display().to_string(),
            source: e,
        })
    }

    /// Page stylesheet first, then the shared sheets, all source-relative.
    fn style_bundle(&self, page_style: &Path) -> StyleBundle {
        let mut sheets = vec![self.config.source_dir.join(page_style)];
        sheets.extend(
            self.config
                .shared_styles
                .iter()
                .map(|s| self.config.source_dir.join(s)),
        );
        StyleBundle::new(sheets)
    }

    fn copy_rss(&self, staging: &Path) -> Result<(), BuildError> {
        let rss = staging.join("rss.xml");
        if !rss.is_file() {
            tracing::warn!("generator produced no rss.xml");
            return Ok(());
        }

        let dest = self.config.output_dir.join("rss.xml");
        fs::copy(&rss, &dest).map_err(|e| BuildError::Write {
            path: dest.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Copy images; in production runs them through an optimizer when one
    /// is installed.
    pub fn copy_images(&self) -> Result<usize, BuildError> {
        let dest = self.config.output_dir.join("images");
        let copied = copy_tree(&self.config.source_dir.join("images"), &dest)?;

        if self.config.production && copied > 0 {
            let candidates: Vec<PathBuf> = IMAGE_OPTIMIZER_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect();

            match resolve_command(&candidates) {
                Some(optimizer) => {
                    let optimized = optimize_images(&dest, &optimizer)?;
                    tracing::info!(
                        "optimized {} images with {}",
                        optimized,
                        optimizer.display()
                    );
                }
                None => {
                    tracing::warn!("no image optimizer found, copying images as-is");
                }
            }
        }

        Ok(copied)
    }

    pub fn copy_videos(&self) -> Result<usize, BuildError> {
        Ok(copy_tree(
            &self.config.source_dir.join("videos"),
            &self.config.output_dir.join("videos"),
        )?)
    }

    pub fn copy_scripts(&self) -> Result<usize, BuildError> {
        Ok(copy_tree(
            &self.config.source_dir.join("javascript"),
            &self.config.output_dir.join("javascript"),
        )?)
    }

    pub fn copy_supporting_files(&self) -> Result<usize, BuildError> {
        Ok(copy_tree(
            &self.config.source_dir.join("supporting-files"),
            &self.config.output_dir.join("supporting-files"),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MARKED_PAGE: &str = "<html><head><!-- inline:head:css --></head>\
                               <body><p>post</p></body></html>";

    fn site_fixture(root: &Path) -> BuildConfig {
        let styles = root.join("styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("post-template.css"), ".post { margin: 0; }").unwrap();
        fs::write(styles.join("main-page.css"), ".index { margin: 0; }").unwrap();
        fs::write(styles.join("normalize.css"), "body { margin: 0; }").unwrap();
        fs::write(styles.join("pygments.css"), ".hl { color: green; }").unwrap();

        BuildConfig {
            source_dir: root.to_path_buf(),
            output_dir: root.join("output"),
            ..Default::default()
        }
    }

    fn staging_fixture(root: &Path) -> PathBuf {
        let staging = root.join("staging");
        fs::create_dir_all(staging.join("posts")).unwrap();
        fs::write(staging.join("posts").join("first-post.htm"), MARKED_PAGE).unwrap();
        fs::write(staging.join("posts").join("second-post.htm"), MARKED_PAGE).unwrap();
        fs::write(staging.join("index.htm"), MARKED_PAGE).unwrap();
        fs::write(staging.join("rss.xml"), "<rss/>").unwrap();
        staging
    }

    #[test]
    fn publishes_posts_index_and_rss() {
        let temp = tempdir().unwrap();
        let config = site_fixture(temp.path());
        let staging = staging_fixture(temp.path());

        let builder = SiteBuilder::new(config.clone());
        let pages = builder.publish(&staging).unwrap();

        assert_eq!(pages, 3);
        assert!(config.output_dir.join("posts").join("first-post.htm").is_file());
        assert!(config.output_dir.join("index.htm").is_file());
        assert!(config.output_dir.join("rss.xml").is_file());
    }

    #[test]
    fn published_pages_carry_inlined_css() {
        let temp = tempdir().unwrap();
        let config = site_fixture(temp.path());
        let staging = staging_fixture(temp.path());

        SiteBuilder::new(config.clone()).publish(&staging).unwrap();

        let post =
            fs::read_to_string(config.output_dir.join("posts").join("first-post.htm")).unwrap();
        assert!(post.contains("<style>"));
        assert!(post.contains(".post"));
        assert!(!post.contains("inline:head:css"));
    }

    #[test]
    fn empty_staging_is_an_error() {
        let temp = tempdir().unwrap();
        let config = site_fixture(temp.path());
        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();

        let err = SiteBuilder::new(config).publish(&staging).unwrap_err();

        assert!(matches!(err, BuildError::NoPages(_)));
    }

    #[test]
    fn live_reload_pages_reference_the_client_script() {
        let temp = tempdir().unwrap();
        let mut config = site_fixture(temp.path());
        config.live_reload = true;
        let staging = staging_fixture(temp.path());

        SiteBuilder::new(config.clone()).publish(&staging).unwrap();

        let index = fs::read_to_string(config.output_dir.join("index.htm")).unwrap();
        assert!(index.contains("/__reload.js"));
    }

    #[test]
    fn copies_asset_trees() {
        let temp = tempdir().unwrap();
        let config = site_fixture(temp.path());
        fs::create_dir_all(temp.path().join("images")).unwrap();
        fs::write(temp.path().join("images").join("logo.png"), b"png").unwrap();
        fs::create_dir_all(temp.path().join("javascript")).unwrap();
        fs::write(temp.path().join("javascript").join("entry.js"), "// js").unwrap();

        let builder = SiteBuilder::new(config.clone());
        let images = builder.copy_images().unwrap();
        let scripts = builder.copy_scripts().unwrap();
        let videos = builder.copy_videos().unwrap();

        assert_eq!(images, 1);
        assert_eq!(scripts, 1);
        assert_eq!(videos, 0);
        assert!(config.output_dir.join("images").join("logo.png").is_file());
    }
}
