//! HTML shell served for app routes.
//!
//! The shell is written with `cms://` references and is meant to be passed
//! through [`Expander::expand_str`](crate::expand::Expander::expand_str), which
//! inlines the import map and makes the module path absolute.

use crate::metadata::AppDescriptor;

/// Paths the page shell refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Build-output directory under the content root (e.g. `esmbit-dist`)
    pub build_dir: String,
    /// Import-map HTML fragment under the content root
    pub import_map: String,
    /// URL of the live-reload client script, if live reload is enabled
    pub reload_script: Option<String>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            build_dir: "esmbit-dist".to_string(),
            import_map: "esmbit-dist/esmbit-import-map.html".to_string(),
            reload_script: None,
        }
    }
}

/// Render the (unexpanded) page for an app.
pub fn render_app_page(app: &AppDescriptor, layout: &PageLayout) -> String {
    let reload = layout
        .reload_script
        .as_deref()
        .map(|src| format!("\n    <script src=\"{}\"></script>", escape_html(src)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    {{{{ cms://{import_map} }}}}{reload}
  </head>
  <body>
    <script type="module" src="cms://{build_dir}/{module}.js"></script>
  </body>
</html>
"#,
        title = escape_html(&app.title),
        import_map = layout.import_map.trim_start_matches('/'),
        reload = reload,
        build_dir = layout.build_dir.trim_matches('/'),
        module = app.module,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::Expander;
    use std::fs;
    use tempfile::TempDir;

    fn app() -> AppDescriptor {
        AppDescriptor {
            route: "/test".to_string(),
            title: "Tests & <Friends>".to_string(),
            module: "test_app".to_string(),
            redirect_from: vec![],
            routes: vec![],
        }
    }

    #[test]
    fn test_page_references_module_and_import_map() {
        let html = render_app_page(&app(), &PageLayout::default());
        assert!(html.contains(r#"src="cms://esmbit-dist/test_app.js""#));
        assert!(html.contains("{{ cms://esmbit-dist/esmbit-import-map.html }}"));
        assert!(html.contains("<title>Tests &amp; &lt;Friends&gt;</title>"));
        assert!(!html.contains("<script src="));
    }

    #[test]
    fn test_page_includes_reload_script() {
        let layout = PageLayout {
            reload_script: Some("/__esmbit_reload__.js".to_string()),
            ..PageLayout::default()
        };
        let html = render_app_page(&app(), &layout);
        assert!(html.contains(r#"<script src="/__esmbit_reload__.js"></script>"#));
    }

    #[test]
    fn test_expanded_page_inlines_import_map() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("esmbit-dist")).unwrap();
        fs::write(
            root.join("esmbit-dist/esmbit-import-map.html"),
            "<script type=\"importmap\">\n{ \"imports\": {{ cms://esmbit-dist/esmbit-import-map.json }} }\n</script>",
        )
        .unwrap();
        fs::write(
            root.join("esmbit-dist/esmbit-import-map.json"),
            r#"{ "test_app": "cms:///esmbit-dist/test_app.js" }"#,
        )
        .unwrap();

        let html = Expander::new(root)
            .expand_str(&render_app_page(&app(), &PageLayout::default()))
            .unwrap();

        assert!(html.contains(r#"{ "imports": { "test_app": "/esmbit-dist/test_app.js" } }"#));
        assert!(html.contains(r#"<script type="module" src="/esmbit-dist/test_app.js"></script>"#));
        assert!(!html.contains("cms://"));
    }
}
