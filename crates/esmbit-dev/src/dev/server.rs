//! HTTP side of the development server.
//!
//! Content requests go through the CMS middleware before reaching static file
//! serving; the timestamp endpoint and the reload client script are answered
//! directly.

use crate::config::{DevConfig, RELOAD_SCRIPT_PATH};
use crate::dev::{cms_middleware, SharedState};
use crate::error::{CliError, Result};
use axum::{
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

const RELOAD_SCRIPT: &str = include_str!("../../assets/dev/reload-client.js");

/// Reload client script with the WebSocket port and build directory filled in.
pub fn render_reload_script(ws_port: u16, build_dir: &str) -> String {
    RELOAD_SCRIPT
        .replace("__ESMBIT_WS_PORT__", &ws_port.to_string())
        .replace("__ESMBIT_BUILD_DIR__", build_dir.trim_matches('/'))
}

/// Development HTTP server.
pub struct DevServer {
    config: DevConfig,
    state: SharedState,
}

impl DevServer {
    pub fn new(config: DevConfig, state: SharedState) -> Self {
        Self { config, state }
    }

    /// Bind the configured address and serve until the process exits.
    ///
    /// # Errors
    ///
    /// Returns error if server cannot bind to configured address
    pub async fn start(self) -> Result<()> {
        let addr = self.config.addr();
        let app = build_router(&self.config, self.state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        crate::ui::success(&format!(
            "Development server running at {}/index.html",
            self.config.server_url()
        ));

        axum::serve(listener, app)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }
}

/// Build the HTTP router.
pub fn build_router(config: &DevConfig, state: SharedState) -> Router {
    let content = Router::new()
        .fallback_service(ServeDir::new(&config.web_root))
        .layer(middleware::from_fn_with_state(state, cms_middleware));

    let reload_script = render_reload_script(config.ws_port, &config.build_dir);

    Router::new()
        .route("/ts", get(handle_timestamp))
        .route(
            RELOAD_SCRIPT_PATH,
            get(move || handle_reload_script(reload_script.clone())),
        )
        .fallback_service(content)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Current time in milliseconds since the epoch.
async fn handle_timestamp() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

async fn handle_reload_script(script: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        script,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reload_script() {
        let script = render_reload_script(2021, "/esmbit-dist/");
        assert!(script.contains("2021"));
        assert!(script.contains("esmbit-dist"));
        assert!(!script.contains("__ESMBIT_WS_PORT__"));
        assert!(!script.contains("__ESMBIT_BUILD_DIR__"));
    }
}
