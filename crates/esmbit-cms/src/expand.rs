//! `cms://` reference expansion.
//!
//! Two transforms run over every piece of served content:
//!
//! - quoted `"cms://x"` / `'cms://x'` literals become root-relative paths
//!   (`"/x"`), unless `x` already starts with `/` or `.`;
//! - `{{ cms://path }}` placeholders are replaced by the expanded contents of
//!   `path` under the content root, recursively.
//!
//! Expansion is synchronous and re-reads every file on every call; this is a
//! development server and always serves what is on disk.

use crate::error::ExpandError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

static CMS_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""cms://([^"\n]*)"|'cms://([^'\n]*)'"#).expect("valid regex"));

static CMS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*cms://(.*?)\s*\}\}").expect("valid regex"));

/// Rewrite quoted `cms://` literals into plain paths. Performs no I/O.
///
/// ```
/// use esmbit_cms::expand::rewrite_cms_urls;
///
/// assert_eq!(rewrite_cms_urls(r#"src="cms://img/a.png""#), r#"src="/img/a.png""#);
/// assert_eq!(rewrite_cms_urls("'cms://./b.png'"), "'./b.png'");
/// ```
pub fn rewrite_cms_urls(content: &str) -> Cow<'_, str> {
    CMS_URL.replace_all(content, |caps: &Captures| {
        let (quote, path) = match caps.get(1) {
            Some(m) => ('"', m.as_str()),
            None => ('\'', caps.get(2).map_or("", |m| m.as_str())),
        };
        if path.starts_with('/') || path.starts_with('.') {
            format!("{quote}{path}{quote}")
        } else {
            format!("{quote}/{path}{quote}")
        }
    })
}

/// Placeholder left in place of a block reference whose file does not exist.
pub fn missing_placeholder(path: &Path) -> String {
    format!("{{{{ ?? {} }}}}", path.display())
}

/// Expands `cms://` references relative to a content root.
#[derive(Debug, Clone)]
pub struct Expander {
    root: PathBuf,
}

impl Expander {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a `cms://` path onto the content root. `cms://a` and `cms:///a`
    /// name the same file.
    pub fn resolve_path(&self, cms_path: &str) -> PathBuf {
        self.root.join(cms_path.trim_start_matches('/'))
    }

    /// Read and fully expand the file at `path`.
    pub fn expand_file(&self, path: &Path) -> Result<String, ExpandError> {
        let mut stack = Vec::new();
        self.expand_file_with(path, &mut stack)
    }

    /// Fully expand in-memory content (e.g. a generated page).
    pub fn expand_str(&self, content: &str) -> Result<String, ExpandError> {
        let mut stack = Vec::new();
        self.expand_content(content, &mut stack)
    }

    /// Expand one file. `stack` holds the files currently being expanded,
    /// outermost first; meeting one of them again is a cycle.
    fn expand_file_with(&self, path: &Path, stack: &mut Vec<PathBuf>) -> Result<String, ExpandError> {
        if stack.iter().any(|p| p == path) {
            let mut chain = stack.clone();
            chain.push(path.to_path_buf());
            return Err(ExpandError::Cycle { chain });
        }

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::error!(
                    path = %path.display(),
                    stack = ?stack,
                    "CMS file not found"
                );
                return Ok(missing_placeholder(path));
            }
            Err(source) => {
                return Err(ExpandError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        stack.push(path.to_path_buf());
        let expanded = self.expand_content(&raw, stack);
        stack.pop();
        expanded
    }

    fn expand_content(&self, content: &str, stack: &mut Vec<PathBuf>) -> Result<String, ExpandError> {
        let content = rewrite_cms_urls(content);

        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        for caps in CMS_BLOCK.captures_iter(&content) {
            let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&content[last..whole.start()]);
            let inline_path = self.resolve_path(target.as_str());
            out.push_str(&self.expand_file_with(&inline_path, stack)?);
            last = whole.end();
        }
        out.push_str(&content[last..]);

        Ok(out)
    }
}
