//! File watching for rebuild-on-change.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Which pipeline step a change requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildScope {
    /// Posts, templates, stylesheets, generator sources: regenerate content
    Content,

    /// Files under images/
    Images,

    /// Files under videos/
    Videos,

    /// Files under javascript/
    Scripts,

    /// Files under supporting-files/
    Supporting,
}

/// A change detected in the blog sources.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// Step the change maps to
    pub scope: RebuildScope,

    /// Path that changed
    pub path: PathBuf,
}

/// File watcher over the blog source tree.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new watcher for the given paths.
    ///
    /// Returns the watcher and a channel of debounced, classified events.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Forward events into the async channel, collapsing bursts.
        std::thread::spawn(move || {
            let debounce_window = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                let event = latest_in_burst(&sync_rx, event, debounce_window);

                for path in event.paths {
                    if let Some(e) = classify_change(&path, &event.kind) {
                        let _ = async_tx.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Drain a burst of events, keeping the most recent one.
///
/// Editors save with create/write/rename sequences; only the final state
/// matters, so we wait out the quiet window and forward the last event.
fn latest_in_burst(
    rx: &mpsc::Receiver<notify::Event>,
    first: notify::Event,
    window: Duration,
) -> notify::Event {
    let mut latest = first;
    while let Ok(next) = rx.recv_timeout(window) {
        latest = next;
    }
    latest
}

/// Map a filesystem event onto the pipeline step it invalidates.
///
/// Classification is by the top-level source directory the path sits in;
/// anything outside the asset directories means content must regenerate.
fn classify_change(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_) => {
            let scope = if in_dir(path, "images") {
                RebuildScope::Images
            } else if in_dir(path, "videos") {
                RebuildScope::Videos
            } else if in_dir(path, "javascript") {
                RebuildScope::Scripts
            } else if in_dir(path, "supporting-files") {
                RebuildScope::Supporting
            } else {
                RebuildScope::Content
            };

            Some(WatchEvent {
                scope,
                path: path.to_path_buf(),
            })
        }
        _ => None,
    }
}

fn in_dir(path: &Path, dir: &str) -> bool {
    path.components().any(|c| c.as_os_str() == dir)
}
