//! File system watcher over the build output.
//!
//! Raw notify events are forwarded as [`FileChange`]s through a tokio
//! channel. No debouncing happens here; duplicate writes are filtered later
//! by comparing file contents.

use crate::error::{Result, ResultExt};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_event(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Recursive watcher; dropping it stops the watch.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Watch `root` recursively.
    ///
    /// The root is canonicalized so reported paths line up with the ones the
    /// change tracker was seeded with.
    ///
    /// # Errors
    ///
    /// Returns error if the directory doesn't exist or the watcher cannot be
    /// created
    pub fn new(root: &Path) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let root = root.canonicalize().with_path(root)?;

        let (tx, rx) = mpsc::channel(100);
        let root_clone = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Watch error: {}", e);
                    return;
                }
            };

            for path in event.paths {
                if Self::should_ignore(&path, &root_clone) {
                    continue;
                }
                if let Some(change) = FileChange::from_event(&event.kind, path) {
                    // Receiver gone means the server is shutting down
                    let _ = tx.blocking_send(change);
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Paths outside the root and hidden files (editor swap files, `.DS_Store`)
    /// are ignored.
    fn should_ignore(path: &Path, root: &Path) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_should_ignore_hidden_files() {
        let root = PathBuf::from("/www-root/esmbit-dist");

        assert!(FileWatcher::should_ignore(
            &root.join(".css.nav.esm.js.swp"),
            &root
        ));
        assert!(FileWatcher::should_ignore(&root.join(".cache/a.js"), &root));
        assert!(!FileWatcher::should_ignore(&root.join("css.nav.esm.js"), &root));
    }

    #[test]
    fn test_should_ignore_outside_root() {
        let root = PathBuf::from("/www-root/esmbit-dist");
        assert!(FileWatcher::should_ignore(
            Path::new("/www-root/index.html"),
            &root
        ));
    }

    #[test]
    fn test_file_change_from_event() {
        let path = PathBuf::from("/www-root/esmbit-dist/app.js");

        let change = FileChange::from_event(
            &EventKind::Modify(notify::event::ModifyKind::Any),
            path.clone(),
        );
        assert_eq!(change, Some(FileChange::Modified(path.clone())));
        assert_eq!(change.unwrap().path(), path.as_path());

        assert!(FileChange::from_event(
            &EventKind::Access(notify::event::AccessKind::Any),
            path
        )
        .is_none());
    }

    #[test]
    fn test_missing_root() {
        let result = FileWatcher::new(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }
}
