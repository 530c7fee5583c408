//! Live-reload WebSocket channel.
//!
//! Clients connect to a dedicated port and only ever receive JSON text
//! frames. Watch events are processed one at a time by a single task that
//! owns the [`ChangeTracker`].

use crate::dev::{FileChange, SharedState};
use crate::error::{CliError, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Router,
};
use esmbit_cms::{ChangeTracker, ReloadMessage};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Router accepting WebSocket upgrades on any path.
pub fn websocket_router(state: SharedState) -> Router {
    Router::new().fallback(handle_upgrade).with_state(state)
}

/// Bind the live-reload port. Done before serving so a taken port fails
/// startup.
pub async fn bind_websocket(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("Failed to bind WebSocket port {}: {}", addr, e)))
}

/// Serve live-reload connections on `listener` until the process exits.
pub async fn serve_websocket(listener: TcpListener, state: SharedState) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Live reload listening on ws://{}", addr);
    }

    axum::serve(listener, websocket_router(state))
        .await
        .map_err(|e| CliError::Server(format!("WebSocket server error: {}", e)))
}

async fn handle_upgrade(ws: WebSocketUpgrade, State(state): State<SharedState>) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, state))
}

/// Pump registry messages into one socket until either side goes away.
async fn client_session(socket: WebSocket, state: SharedState) {
    let (id, mut rx) = state.register_client();
    tracing::info!("Client {} connected ({} open)", id, state.client_count());

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            outgoing = rx.recv() => match outgoing {
                Some(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Clients have nothing to say; pings are answered by axum
                Some(Ok(_)) => {}
            },
        }
    }

    state.unregister_client(id);
    tracing::info!("Client {} disconnected", id);
}

/// Process one watch event.
///
/// Returns the message broadcast, or `None` when the event was ignored
/// (removal, directory, unchanged content).
pub async fn handle_change(
    state: &SharedState,
    tracker: &mut ChangeTracker,
    change: &FileChange,
) -> std::io::Result<Option<ReloadMessage>> {
    if matches!(change, FileChange::Removed(_)) {
        return Ok(None);
    }

    let path = change.path();
    if tokio::fs::metadata(path).await?.is_dir() {
        return Ok(None);
    }

    let content = tokio::fs::read(path).await?;
    if !tracker.observe(path, content) {
        tracing::debug!("Unchanged: {}", path.display());
        return Ok(None);
    }

    let message = ReloadMessage::for_path(path, chrono::Utc::now().timestamp_millis());
    let delivered = state.broadcast(&message);
    tracing::info!(
        "{} changed, notified {} client(s)",
        path.display(),
        delivered
    );

    Ok(Some(message))
}

/// Drain watch events until the watcher is dropped. A failing event is
/// logged and never stops the loop.
pub async fn run_change_loop(
    state: SharedState,
    mut changes: mpsc::Receiver<FileChange>,
    mut tracker: ChangeTracker,
) {
    while let Some(change) = changes.recv().await {
        if let Err(e) = handle_change(&state, &mut tracker, &change).await {
            // Files are routinely replaced mid-read during a build
            tracing::warn!("Failed to process {}: {}", change.path().display(), e);
        }
    }
}
