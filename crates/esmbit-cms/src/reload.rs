//! Live-reload notifications.
//!
//! Everything here is independent of the transport: the dev server feeds file
//! contents into a [`ChangeTracker`] and pushes the resulting
//! [`ReloadMessage`]s to its WebSocket clients.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static CSS_MODULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^css\.(.+)\.esm\.js$").expect("valid regex"));

/// Kind of change pushed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadKind {
    /// A widget's generated CSS module changed; the client hot-swaps styles
    CssUpdate,
    /// Any other build output changed
    FileUpdate,
}

/// JSON message sent to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadMessage {
    #[serde(rename = "type")]
    pub kind: ReloadKind,
    pub widget_name: Option<String>,
    /// Milliseconds since the epoch; clients use it to bust import caches
    pub timestamp: i64,
}

impl ReloadMessage {
    /// Build the message for a change to `path`.
    pub fn for_path(path: &Path, timestamp: i64) -> Self {
        let widget_name = widget_name(path);
        let kind = if widget_name.is_some() {
            ReloadKind::CssUpdate
        } else {
            ReloadKind::FileUpdate
        };
        Self {
            kind,
            widget_name,
            timestamp,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Widget name of a generated CSS module (`css.<widget>.esm.js`).
pub fn widget_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    CSS_MODULE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Last observed content of every watched file.
///
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last_seen: HashMap<PathBuf, Vec<u8>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current content of every file under `root` without
    /// reporting changes. Returns the number of files recorded.
    pub fn seed(&mut self, root: &Path) -> usize {
        let mut count = 0;
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            match std::fs::read(entry.path()) {
                Ok(content) => {
                    self.last_seen.insert(entry.path().to_path_buf(), content);
                    count += 1;
                }
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), error = %e, "Skipping unreadable file");
                }
            }
        }
        count
    }

    /// Record `content` for `path`; true when it differs from the last
    /// observation (or the file was never seen).
    pub fn observe(&mut self, path: &Path, content: Vec<u8>) -> bool {
        if self.last_seen.get(path) == Some(&content) {
            return false;
        }
        self.last_seen.insert(path.to_path_buf(), content);
        true
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_widget_name_from_css_module() {
        assert_eq!(
            widget_name(Path::new("/www/esmbit-dist/css.header.esm.js")),
            Some("header".to_string())
        );
        assert_eq!(
            widget_name(Path::new("css.stopwatch_timer.esm.js")),
            Some("stopwatch_timer".to_string())
        );
        assert_eq!(widget_name(Path::new("/www/esmbit-dist/header.js")), None);
        assert_eq!(widget_name(Path::new("/www/css.header.esm.js.map")), None);
        assert_eq!(widget_name(Path::new("/www/css..esm.js")), None);
    }

    #[test]
    fn test_message_kind_follows_naming_convention() {
        let css = ReloadMessage::for_path(Path::new("dist/css.header.esm.js"), 42);
        assert_eq!(css.kind, ReloadKind::CssUpdate);
        assert_eq!(css.widget_name.as_deref(), Some("header"));

        let other = ReloadMessage::for_path(Path::new("dist/header.js"), 42);
        assert_eq!(other.kind, ReloadKind::FileUpdate);
        assert_eq!(other.widget_name, None);
    }

    #[test]
    fn test_message_json_shape() {
        let json = ReloadMessage::for_path(Path::new("css.header.esm.js"), 1700000000000).to_json();
        assert_eq!(
            json,
            r#"{"type":"css-update","widget_name":"header","timestamp":1700000000000}"#
        );

        let json = ReloadMessage::for_path(Path::new("app.js"), 5).to_json();
        assert_eq!(json, r#"{"type":"file-update","widget_name":null,"timestamp":5}"#);
    }

    #[test]
    fn test_identical_content_is_suppressed() {
        let mut tracker = ChangeTracker::new();
        let path = Path::new("/dist/css.header.esm.js");

        assert!(tracker.observe(path, b"A".to_vec()));
        assert!(tracker.observe(path, b"B".to_vec()));
        assert!(!tracker.observe(path, b"B".to_vec()));
        assert!(tracker.observe(path, b"A".to_vec()));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_paths_are_tracked_separately() {
        let mut tracker = ChangeTracker::new();
        assert!(tracker.observe(Path::new("/a.js"), b"x".to_vec()));
        assert!(tracker.observe(Path::new("/b.js"), b"x".to_vec()));
        assert!(!tracker.observe(Path::new("/a.js"), b"x".to_vec()));
    }

    #[test]
    fn test_seed_records_existing_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("css.header.esm.js"), "A").unwrap();
        fs::write(root.join("nested/app.js"), "app").unwrap();

        let mut tracker = ChangeTracker::new();
        assert_eq!(tracker.seed(root), 2);
        assert!(!tracker.observe(&root.join("css.header.esm.js"), b"A".to_vec()));
        assert!(tracker.observe(&root.join("css.header.esm.js"), b"B".to_vec()));
    }
}
