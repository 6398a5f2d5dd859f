//! Preview server for the built blog.
//!
//! Serves the output directory, watches the blog sources, and pushes a
//! reload message to connected pages over a WebSocket when a rebuild lands.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{PreviewConfig, PreviewServer, ServerError};
pub use watcher::{FileWatcher, RebuildScope, WatchEvent};
pub use websocket::{reload_client_script, ReloadHub, ReloadMessage};
