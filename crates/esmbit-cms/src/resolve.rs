//! Request path resolution against the app and redirect tables.

use crate::error::RouteError;
use crate::metadata::{AppDescriptor, RouteTable, RuleKind};

/// Maximum number of rewrite hops before resolution fails.
pub const MAX_REWRITE_DEPTH: usize = 20;

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'t> {
    /// Serve the generated page for this app
    Page(&'t AppDescriptor),
    /// Send the client a redirect (query string already reattached)
    Redirect { location: String },
    /// Not an app route; serve `path` from the content root
    PassThrough { path: String, query: String },
}

impl Resolution<'_> {
    /// True when the resolver produced the whole response.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Resolution::PassThrough { .. })
    }
}

/// Split `url` into its path and query string (query keeps its leading `?`).
pub fn split_query(url: &str) -> (&str, &str) {
    match url.find('?') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    }
}

/// Resolve a request path (optionally carrying a query string).
///
/// App routes are checked before redirect rules; both first-match-wins in
/// declaration order. A request for `<route>/` redirects to `<route>`. Rewrite
/// rules re-resolve their target, each hop adding one to the depth; a depth
/// above [`MAX_REWRITE_DEPTH`] is an error naming every visited path.
pub fn resolve<'t>(table: &'t RouteTable, url: &str) -> Result<Resolution<'t>, RouteError> {
    let (path, query) = split_query(url);
    let mut current = path.to_string();
    let mut chain: Vec<String> = Vec::new();

    for depth in 0.. {
        chain.push(current.clone());
        if depth > MAX_REWRITE_DEPTH {
            return Err(RouteError::DepthExceeded {
                depth,
                limit: MAX_REWRITE_DEPTH,
                chain,
            });
        }

        if let Some(resolution) = match_app(table, &current, query) {
            return Ok(resolution);
        }

        let Some(rule) = table.rules().iter().find(|r| r.matcher.matches(&current)) else {
            break;
        };

        match rule.kind {
            RuleKind::Redirect => {
                return Ok(Resolution::Redirect {
                    location: format!("{}{}", rule.target, query),
                });
            }
            RuleKind::Rewrite => {
                tracing::debug!(from = %current, to = %rule.target, depth, "Rewriting path");
                current = rule.target.clone();
            }
        }
    }

    Ok(Resolution::PassThrough {
        path: current,
        query: query.to_string(),
    })
}

fn match_app<'t>(table: &'t RouteTable, path: &str, query: &str) -> Option<Resolution<'t>> {
    for app in table.apps() {
        if app.route == path {
            return Some(Resolution::Page(app));
        }
        if path.strip_suffix('/') == Some(app.route.as_str()) {
            return Some(Resolution::Redirect {
                location: format!("{}{}", app.route, query),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{PathMatcher, RedirectRule};

    fn app(route: &str, module: &str) -> AppDescriptor {
        AppDescriptor {
            route: route.to_string(),
            title: module.to_string(),
            module: module.to_string(),
            redirect_from: vec![],
            routes: vec![],
        }
    }

    fn exact(p: &str) -> PathMatcher {
        PathMatcher::parse(p, "/").unwrap()
    }

    /// `len` rewrite rules: /p0 -> /p1 -> ... -> /p{len}
    fn rewrite_chain(len: usize) -> RouteTable {
        let rules = (0..len)
            .map(|i| RedirectRule::rewrite(exact(&format!("/p{}", i)), format!("/p{}", i + 1)))
            .collect();
        RouteTable::new(vec![], rules)
    }

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("/a?x=1&y"), ("/a", "?x=1&y"));
        assert_eq!(split_query("/a"), ("/a", ""));
        assert_eq!(split_query("/a?"), ("/a", "?"));
    }

    #[test]
    fn test_exact_app_route_serves_page() {
        let table = RouteTable::new(vec![app("/docs", "docs_app")], vec![]);
        match resolve(&table, "/docs?tab=2").unwrap() {
            Resolution::Page(a) => assert_eq!(a.module, "docs_app"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_trailing_slash_redirects_to_canonical() {
        let table = RouteTable::new(vec![app("/docs", "docs_app")], vec![]);
        assert_eq!(
            resolve(&table, "/docs/").unwrap(),
            Resolution::Redirect {
                location: "/docs".to_string()
            }
        );
        assert_eq!(
            resolve(&table, "/docs/?q=1").unwrap(),
            Resolution::Redirect {
                location: "/docs?q=1".to_string()
            }
        );
    }

    #[test]
    fn test_unmatched_path_passes_through_unchanged() {
        let table = RouteTable::new(vec![app("/docs", "docs_app")], vec![]);
        let resolution = resolve(&table, "/esmbit-dist/docs_app.js?t=1").unwrap();
        assert!(!resolution.is_handled());
        assert_eq!(
            resolution,
            Resolution::PassThrough {
                path: "/esmbit-dist/docs_app.js".to_string(),
                query: "?t=1".to_string()
            }
        );
    }

    #[test]
    fn test_redirect_rule_reattaches_query() {
        let table = RouteTable::new(
            vec![app("/docs", "docs_app")],
            vec![RedirectRule::redirect(exact("/old-docs"), "/docs")],
        );
        assert_eq!(
            resolve(&table, "/old-docs?page=3").unwrap(),
            Resolution::Redirect {
                location: "/docs?page=3".to_string()
            }
        );
    }

    #[test]
    fn test_rewrite_rule_serves_target_app() {
        let table = RouteTable::new(
            vec![app("/docs", "docs_app")],
            vec![RedirectRule::rewrite(
                PathMatcher::parse("^/docs/.+", "/docs").unwrap(),
                "/docs",
            )],
        );
        match resolve(&table, "/docs/getting-started").unwrap() {
            Resolution::Page(a) => assert_eq!(a.route, "/docs"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_app_routes_win_over_rules() {
        let table = RouteTable::new(
            vec![app("/a", "a")],
            vec![RedirectRule::redirect(exact("/a"), "/elsewhere")],
        );
        assert!(matches!(resolve(&table, "/a").unwrap(), Resolution::Page(_)));
    }

    #[test]
    fn test_first_rule_wins() {
        let table = RouteTable::new(
            vec![],
            vec![
                RedirectRule::redirect(PathMatcher::parse("^/x", "/").unwrap(), "/first"),
                RedirectRule::redirect(exact("/x"), "/second"),
            ],
        );
        assert_eq!(
            resolve(&table, "/x").unwrap(),
            Resolution::Redirect {
                location: "/first".to_string()
            }
        );
    }

    #[test]
    fn test_first_app_wins() {
        let table = RouteTable::new(vec![app("/a", "first"), app("/a", "second")], vec![]);
        match resolve(&table, "/a").unwrap() {
            Resolution::Page(a) => assert_eq!(a.module, "first"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_chain_of_twenty_resolves() {
        let table = rewrite_chain(MAX_REWRITE_DEPTH);
        assert_eq!(
            resolve(&table, "/p0?k=v").unwrap(),
            Resolution::PassThrough {
                path: "/p20".to_string(),
                query: "?k=v".to_string()
            }
        );
    }

    #[test]
    fn test_rewrite_chain_of_twenty_one_fails() {
        let table = rewrite_chain(MAX_REWRITE_DEPTH + 1);
        match resolve(&table, "/p0").unwrap_err() {
            RouteError::DepthExceeded { depth, chain, .. } => {
                assert_eq!(depth, 21);
                assert_eq!(chain.len(), 22);
                assert_eq!(chain.first().map(String::as_str), Some("/p0"));
                assert_eq!(chain.last().map(String::as_str), Some("/p21"));
            }
        }
    }

    #[test]
    fn test_rewrite_loop_fails_instead_of_spinning() {
        let table = RouteTable::new(
            vec![],
            vec![
                RedirectRule::rewrite(exact("/a"), "/b"),
                RedirectRule::rewrite(exact("/b"), "/a"),
            ],
        );
        assert!(resolve(&table, "/a").is_err());
    }
}
