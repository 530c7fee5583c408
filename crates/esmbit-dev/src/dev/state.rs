//! Shared state for the development server.
//!
//! The route table is immutable once loaded and shared as an `Arc`. The only
//! mutable shared state is the live-reload client registry, guarded by a
//! parking_lot RwLock.

use crate::config::DevConfig;
use esmbit_cms::{
    render_app_page, AppDescriptor, ExpandError, Expander, MetadataError, MetadataStore,
    PageLayout, ReloadMessage, RouteTable,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Messages buffered per client before it is considered stalled.
pub const CLIENT_BUFFER: usize = 100;

/// Connected live-reload clients, keyed by connection id.
pub type ClientRegistry = Arc<RwLock<HashMap<usize, mpsc::Sender<String>>>>;

/// Shared development server state.
pub struct DevServerState {
    /// Lazily loaded, memoized app metadata
    pub metadata: MetadataStore,

    /// `cms://` expander rooted at the content root
    pub expander: Expander,

    /// Layout of generated app pages
    pub layout: PageLayout,

    /// Connected WebSocket clients
    pub clients: ClientRegistry,

    /// Next client ID
    pub next_client_id: RwLock<usize>,

    /// Port the reload client script connects to
    pub ws_port: u16,
}

impl DevServerState {
    pub fn new(config: &DevConfig) -> Self {
        Self::with_metadata(config, MetadataStore::new(config.metadata_path()))
    }

    /// Create state around an already prepared metadata store.
    pub fn with_metadata(config: &DevConfig, metadata: MetadataStore) -> Self {
        Self {
            metadata,
            expander: Expander::new(config.web_root.clone()),
            layout: config.page_layout(),
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: RwLock::new(0),
            ws_port: config.ws_port,
        }
    }

    /// The route table, loading it on first use.
    pub fn route_table(&self) -> Result<Arc<RouteTable>, MetadataError> {
        self.metadata.table()
    }

    /// Render and expand the page for `app`.
    pub fn render_page(&self, app: &AppDescriptor) -> Result<String, ExpandError> {
        self.expander.expand_str(&render_app_page(app, &self.layout))
    }

    /// Register a new live-reload client.
    ///
    /// # Returns
    ///
    /// Client ID and receiver for messages
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_client_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send `message` to every connected client without waiting on any of
    /// them. A client whose buffer is full or whose channel is closed is
    /// dropped from the registry; dropping its sender ends its session.
    ///
    /// Returns the number of clients the message reached.
    pub fn broadcast(&self, message: &ReloadMessage) -> usize {
        let json = message.to_json();

        // Snapshot so the lock is not held while sending
        let clients = self.clients.read().clone();

        let mut failed_ids = Vec::new();
        let mut delivered = 0;

        for (id, tx) in clients {
            match tx.try_send(json.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Client {} is not keeping up, disconnecting", id);
                    failed_ids.push(id);
                }
                Err(TrySendError::Closed(_)) => failed_ids.push(id),
            }
        }

        for id in failed_ids {
            self.unregister_client(id);
        }

        delivered
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

/// Shared state handle for passing around the application.
pub type SharedState = Arc<DevServerState>;
