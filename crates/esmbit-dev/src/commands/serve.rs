//! Serve command implementation.
//!
//! Startup is strictly ordered: configuration, app metadata (fatal on
//! error), change-tracker seeding, the WebSocket port bind, then the HTTP
//! server, the WebSocket server and the watcher. Runs until Ctrl+C.

use crate::cli::ServeArgs;
use crate::config::DevConfig;
use crate::dev::{
    bind_websocket, run_change_loop, serve_websocket, DevServer, DevServerState, FileWatcher,
};
use crate::error::{Result, ResultExt};
use crate::ui;
use esmbit_cms::{ChangeTracker, MetadataStore};
use std::sync::Arc;
use tokio::signal;

/// Execute the serve command.
///
/// # Errors
///
/// Returns errors for invalid configuration, unloadable app metadata or a
/// port that cannot be bound.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = DevConfig::load(&args)?;
    config.validate()?;

    ui::info(&format!("Content root: {}", config.web_root.display()));

    // Load the route table before accepting any request
    let metadata = MetadataStore::new(config.metadata_path());
    let table = metadata.table()?;
    ui::info(&format!(
        "Loaded {} app(s) and {} redirect rule(s) from {}",
        table.apps().len(),
        table.rules().len(),
        metadata.path().display()
    ));

    let build_path = config.build_path();
    let watch_root = if config.watch {
        match build_path.canonicalize() {
            Ok(path) => Some(path),
            Err(_) => {
                ui::warning(&format!(
                    "Build directory {} not found, live reload disabled",
                    build_path.display()
                ));
                config.watch = false;
                None
            }
        }
    } else {
        None
    };

    let mut tracker = ChangeTracker::new();
    if let Some(root) = &watch_root {
        let seeded = tracker.seed(root);
        tracing::debug!("Seeded change tracker with {} file(s)", seeded);
    }

    // Bound up front so a taken port fails startup instead of a background task
    let ws_listener = match &watch_root {
        Some(_) => Some(bind_websocket(config.ws_addr()).await?),
        _ => None,
    };

    let state = Arc::new(DevServerState::with_metadata(&config, metadata));

    let server = DevServer::new(config.clone(), state.clone());
    let mut server_handle = tokio::spawn(server.start());

    // Keep the watcher alive for the lifetime of the command
    let _watcher = match (watch_root, ws_listener) {
        (Some(root), Some(listener)) => {
            let ws_state = state.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_websocket(listener, ws_state).await {
                    ui::error(&e.to_string());
                }
            });

            let (watcher, changes) =
                FileWatcher::new(&root).context("Failed to watch build output")?;
            ui::info(&format!("Watching {}", watcher.root().display()));
            tokio::spawn(run_change_loop(state.clone(), changes, tracker));
            Some(watcher)
        }
        _ => None,
    };

    ui::info("Press Ctrl+C to stop");

    tokio::select! {
        _ = signal::ctrl_c() => {
            ui::info("Shutting down development server...");
        }
        result = &mut server_handle => {
            match result {
                Ok(Err(e)) => return Err(e),
                Ok(Ok(())) => ui::warning("Server task completed unexpectedly"),
                Err(e) => ui::error(&format!("Server task failed: {}", e)),
            }
        }
    }

    ui::success("Development server stopped");
    Ok(())
}
