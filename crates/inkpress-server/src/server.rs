//! Preview server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Built site directory to serve
    pub site_dir: PathBuf,

    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// File served when a path does not resolve
    pub fallback: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("output"),
            host: "127.0.0.1".to_string(),
            port: 9103,
            fallback: "index.htm".to_string(),
            open: false,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid listen address {0}: {1}")]
    Address(String, String),

    #[error("failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),
}

/// Preview server over the built site.
pub struct PreviewServer {
    config: PreviewConfig,
    hub: ReloadHub,
}

impl PreviewServer {
    /// Create a new preview server.
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            hub: ReloadHub::new(),
        }
    }

    /// Handle for pushing reload messages to connected pages.
    pub fn hub(&self) -> ReloadHub {
        self.hub.clone()
    }

    /// Start serving. Runs until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let raw_addr = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::Address(raw_addr, e.to_string()))?;

        let fallback = ServeFile::new(self.config.site_dir.join(&self.config.fallback));
        let site = ServeDir::new(&self.config.site_dir).fallback(fallback);

        let app = Router::new()
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .fallback_service(site)
            .with_state(self.hub.clone());

        tracing::info!(
            "serving {} at http://{}",
            self.config.site_dir.display(),
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<ReloadHub>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, hub))
}

/// Forward reload messages to one connected page.
async fn handle_ws(mut socket: WebSocket, hub: ReloadHub) {
    let mut rx = hub.subscribe();

    let msg = match serde_json::to_string(&ReloadMessage::Connected) {
        Ok(msg) => msg,
        Err(_) => return,
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload_msg) = rx.recv().await {
        let json = match serde_json::to_string(&reload_msg) {
            Ok(json) => json,
            Err(_) => continue,
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    let script = reload_client_script("/__reload");
    ([("content-type", "application/javascript")], script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_serve_task() {
        let config = PreviewConfig::default();

        assert_eq!(config.port, 9103);
        assert_eq!(config.fallback, "index.htm");
        assert!(!config.open);
    }

    #[test]
    fn server_exposes_its_hub() {
        let server = PreviewServer::new(PreviewConfig::default());
        let hub = server.hub();

        hub.send(ReloadMessage::Reload);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
