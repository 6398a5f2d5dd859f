//! Site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use inkpress_pipeline::SiteBuilder;

use super::settings::ConfigFile;

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    production: bool,
    no_minify: bool,
) -> Result<()> {
    tracing::info!("Building site...");

    let minify = if no_minify { Some(false) } else { None };
    let config = ConfigFile::load(config_path)?.into_build_config(output, production, minify, false);

    let report = SiteBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} pages and {} asset files in {}ms",
        report.pages,
        report.assets,
        report.duration_ms
    );
    tracing::info!("Output: {}", report.output_dir.display());

    Ok(())
}
