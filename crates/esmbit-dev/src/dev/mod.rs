//! Development server module.
//!
//! - HTTP server with `cms://` expansion and app routing middleware
//! - Live reload over a WebSocket on a separate port
//! - File watching over the build output

pub mod live_reload;
pub mod middleware;
pub mod server;
pub mod state;
pub mod watcher;

// Re-exports
pub use live_reload::{
    bind_websocket, handle_change, run_change_loop, serve_websocket, websocket_router,
};
pub use middleware::cms_middleware;
pub use server::{build_router, render_reload_script, DevServer};
pub use state::{ClientRegistry, DevServerState, SharedState};
pub use watcher::{FileChange, FileWatcher};
