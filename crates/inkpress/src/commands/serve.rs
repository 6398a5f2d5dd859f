//! Serve command: build, watch, and serve with live reload.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use inkpress_pipeline::SiteBuilder;
use inkpress_server::{
    FileWatcher, PreviewConfig, PreviewServer, RebuildScope, ReloadMessage, WatchEvent,
};

use super::settings::ConfigFile;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    let config = ConfigFile::load(config_path)?.into_build_config(None, false, None, true);

    // Initial build so there is something to serve.
    let builder = Arc::new(SiteBuilder::new(config.clone()));
    let report = builder.build().await?;
    tracing::info!("Built {} pages, watching for changes", report.pages);

    let server = PreviewServer::new(PreviewConfig {
        site_dir: config.output_dir.clone(),
        port,
        open,
        ..Default::default()
    });
    let hub = server.hub();

    let (watcher, mut rx) = FileWatcher::new(&[config.source_dir.clone()])?;

    // The output dir may sit inside the watched source tree; ignore our own
    // writes or every rebuild would trigger the next one.
    let output_dir = config
        .output_dir
        .canonicalize()
        .unwrap_or_else(|_| config.output_dir.clone());

    // Rebuild the matching step on each change, then push a reload.
    let rebuild_builder = Arc::clone(&builder);
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if event.path.starts_with(&output_dir) {
                continue;
            }
            match rebuild(&rebuild_builder, &event).await {
                Ok(()) => hub.send(ReloadMessage::Reload),
                Err(e) => tracing::warn!("rebuild after {} failed: {}", event.path.display(), e),
            }
        }
        drop(watcher);
    });

    server.start().await?;

    Ok(())
}

async fn rebuild(
    builder: &SiteBuilder,
    event: &WatchEvent,
) -> Result<(), inkpress_pipeline::BuildError> {
    tracing::info!("change detected: {}", event.path.display());

    match event.scope {
        RebuildScope::Content => builder.rebuild_content().await.map(|_| ()),
        RebuildScope::Images => builder.copy_images().map(|_| ()),
        RebuildScope::Videos => builder.copy_videos().map(|_| ()),
        RebuildScope::Scripts => builder.copy_scripts().map(|_| ()),
        RebuildScope::Supporting => builder.copy_supporting_files().map(|_| ()),
    }
}
