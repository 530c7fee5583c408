//! Dev server configuration with multi-source loading.
//!
//! Merges settings from CLI args, environment variables (`ESMBIT_` prefix)
//! and `esmbit.config.json`.
//! Priority: CLI > Environment > File > Defaults

mod defaults;
mod loading;
mod validation;

use esmbit_cms::PageLayout;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub use defaults::*;

/// URL path of the live-reload client script.
pub const RELOAD_SCRIPT_PATH: &str = "/__esmbit_reload__.js";

/// Dev server configuration - loaded from esmbit.config.json, env or CLI args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevConfig {
    /// Served-content root
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WebSocket port for live-reload notifications
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,

    /// Build-output directory, relative to `web_root`
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// App metadata file, relative to `web_root`
    #[serde(default = "default_metadata")]
    pub metadata: String,

    /// Import-map HTML fragment, relative to `web_root`
    #[serde(default = "default_import_map")]
    pub import_map: String,

    /// Watch the build output and push live-reload messages
    #[serde(default = "default_watch")]
    pub watch: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            host: default_host(),
            port: default_port(),
            ws_port: default_ws_port(),
            build_dir: default_build_dir(),
            metadata: default_metadata(),
            import_map: default_import_map(),
            watch: default_watch(),
        }
    }
}

impl DevConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn ws_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.ws_port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}", self.addr())
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.web_root.join(self.metadata.trim_start_matches('/'))
    }

    pub fn build_path(&self) -> PathBuf {
        self.web_root.join(self.build_dir.trim_start_matches('/'))
    }

    /// Layout of generated app pages; the reload script is only referenced
    /// when watching is enabled.
    pub fn page_layout(&self) -> PageLayout {
        PageLayout {
            build_dir: self.build_dir.clone(),
            import_map: self.import_map.clone(),
            reload_script: self.watch.then(|| RELOAD_SCRIPT_PATH.to_string()),
        }
    }
}
