//! App metadata loading.
//!
//! `app.metadata.json` is a JSON array of app descriptors. Loading it produces
//! a [`RouteTable`]: the apps in declaration order plus the redirect and rewrite
//! rules derived from them, also in declaration order. Both lists are consulted
//! first-match-wins, so they are kept as ordered vectors rather than maps.

use crate::error::MetadataError;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One application served by the dev server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Canonical route, absolute (e.g. `/docs`)
    #[serde(default)]
    pub route: String,

    /// Page title
    pub title: String,

    /// Build-artifact module identifier, served as `/<build_dir>/<module>.js`
    pub module: String,

    /// Source patterns that redirect the client to `route`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirect_from: Vec<String>,

    /// Source patterns that are served as `route` without a redirect
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<String>,
}

/// How a redirect source pattern is compared against a request path.
#[derive(Debug, Clone)]
pub enum PathMatcher {
    /// Whole-path string equality
    Exact(String),
    /// Regular expression test (unanchored unless the pattern anchors itself)
    Regex(Regex),
}

impl PathMatcher {
    /// Classify and compile a source pattern.
    ///
    /// Patterns starting with `^` are regular expressions; patterns starting
    /// with `/` are exact paths. Anything else is rejected. `route` is only
    /// used for error messages.
    pub fn parse(pattern: &str, route: &str) -> Result<Self, MetadataError> {
        if pattern.starts_with('^') {
            Regex::new(pattern)
                .map(PathMatcher::Regex)
                .map_err(|source| MetadataError::InvalidRegex {
                    route: route.to_string(),
                    pattern: pattern.to_string(),
                    source,
                })
        } else if pattern.starts_with('/') {
            Ok(PathMatcher::Exact(pattern.to_string()))
        } else {
            Err(MetadataError::InvalidPattern {
                route: route.to_string(),
                pattern: pattern.to_string(),
            })
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(p) => p == path,
            PathMatcher::Regex(re) => re.is_match(path),
        }
    }

    /// The pattern as written in the metadata.
    pub fn as_str(&self) -> &str {
        match self {
            PathMatcher::Exact(p) => p,
            PathMatcher::Regex(re) => re.as_str(),
        }
    }
}

/// Whether a matched rule is visible to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Client-visible HTTP redirect
    Redirect,
    /// Internal re-resolution of the target path
    Rewrite,
}

/// A compiled `redirect_from` or `routes` entry.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    pub matcher: PathMatcher,
    pub target: String,
    pub kind: RuleKind,
}

impl RedirectRule {
    pub fn redirect(matcher: PathMatcher, target: impl Into<String>) -> Self {
        Self {
            matcher,
            target: target.into(),
            kind: RuleKind::Redirect,
        }
    }

    pub fn rewrite(matcher: PathMatcher, target: impl Into<String>) -> Self {
        Self {
            matcher,
            target: target.into(),
            kind: RuleKind::Rewrite,
        }
    }

    pub fn is_rewrite(&self) -> bool {
        self.kind == RuleKind::Rewrite
    }
}

/// Immutable app and rule tables, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    apps: Vec<AppDescriptor>,
    rules: Vec<RedirectRule>,
}

impl RouteTable {
    /// Build a table from already-compiled parts.
    pub fn new(apps: Vec<AppDescriptor>, rules: Vec<RedirectRule>) -> Self {
        Self { apps, rules }
    }

    /// Validate descriptors and derive their redirect rules.
    ///
    /// For each app, `redirect_from` entries become redirects and `routes`
    /// entries become rewrites, both targeting the app's `route`.
    pub fn from_descriptors(apps: Vec<AppDescriptor>) -> Result<Self, MetadataError> {
        let mut rules = Vec::new();

        for app in &apps {
            if !app.route.starts_with('/') {
                return Err(MetadataError::InvalidRoute {
                    title: app.title.clone(),
                    route: app.route.clone(),
                });
            }

            for pattern in &app.redirect_from {
                let matcher = PathMatcher::parse(pattern, &app.route)?;
                rules.push(RedirectRule::redirect(matcher, &app.route));
            }
            for pattern in &app.routes {
                let matcher = PathMatcher::parse(pattern, &app.route)?;
                rules.push(RedirectRule::rewrite(matcher, &app.route));
            }
        }

        Ok(Self { apps, rules })
    }

    /// Parse metadata JSON. `path` is only used for error messages.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, MetadataError> {
        let apps: Vec<AppDescriptor> =
            serde_json::from_str(json).map_err(|source| MetadataError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_descriptors(apps)
    }

    /// Read and parse a metadata file.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let json = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&json, path)?;

        tracing::debug!(
            path = %path.display(),
            apps = table.apps.len(),
            rules = table.rules.len(),
            "Loaded app metadata"
        );

        Ok(table)
    }

    pub fn apps(&self) -> &[AppDescriptor] {
        &self.apps
    }

    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }
}

/// Lazily loaded, memoized route table.
///
/// The first successful [`table`](Self::table) call reads the metadata file;
/// later calls return the same table without touching the disk. A failed load
/// is not memoized.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    table: OnceCell<Arc<RouteTable>>,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    /// A store whose table is already known (no file is ever read).
    pub fn with_table(path: impl Into<PathBuf>, table: RouteTable) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::with_value(Arc::new(table)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> Result<Arc<RouteTable>, MetadataError> {
        self.table
            .get_or_try_init(|| RouteTable::load(&self.path).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
