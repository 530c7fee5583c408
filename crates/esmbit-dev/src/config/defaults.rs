use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "esmbit.config.json";

pub fn default_web_root() -> PathBuf {
    PathBuf::from("./www-root")
}

pub fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

pub fn default_port() -> u16 {
    2020
}

pub fn default_ws_port() -> u16 {
    2021
}

pub fn default_build_dir() -> String {
    "esmbit-dist".to_string()
}

pub fn default_metadata() -> String {
    "esmbit-dist/app.metadata.json".to_string()
}

pub fn default_import_map() -> String {
    "esmbit-dist/esmbit-import-map.html".to_string()
}

pub fn default_watch() -> bool {
    true
}
