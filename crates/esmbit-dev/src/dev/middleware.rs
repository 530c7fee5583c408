//! Request middleware tying routing and `cms://` expansion together.
//!
//! Every content request is resolved against the route table first. App pages
//! and redirects are answered here; `.html`, `.css` and `.js` files are read
//! and expanded; anything else continues to static file serving.

use crate::dev::SharedState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use esmbit_cms::{resolve, Resolution, RouteError};
use std::path::Path;

/// Content type for extensions whose files are expanded before serving.
pub fn template_content_type(path: &str) -> Option<&'static str> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" => Some("text/html; charset=utf-8"),
        "css" => Some("text/css"),
        "js" => Some("application/javascript"),
        _ => None,
    }
}

fn has_parent_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..")
}

/// CMS middleware. Failures are logged and the request falls through to the
/// next handler.
pub async fn cms_middleware(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let table = match state.route_table() {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(path = %original, "Failed to load app metadata: {}", e);
            return next.run(request).await;
        }
    };

    let resolution = match resolve(&table, &original) {
        Ok(resolution) => resolution,
        Err(e) => {
            let RouteError::DepthExceeded { chain, .. } = &e;
            tracing::error!(
                original = %original,
                resolved = chain.last().map(String::as_str).unwrap_or(""),
                "{}",
                e
            );
            return next.run(request).await;
        }
    };

    match resolution {
        Resolution::Page(app) => match state.render_page(app) {
            Ok(html) => (
                StatusCode::OK,
                [(header::CACHE_CONTROL, "no-cache")],
                Html(html),
            )
                .into_response(),
            Err(e) => {
                tracing::error!(original = %original, resolved = %app.route, "{}", e);
                next.run(request).await
            }
        },
        Resolution::Redirect { location } => {
            tracing::debug!("{} -> {}", original, location);
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Resolution::PassThrough { path, query } => {
            serve_pass_through(&state, request, next, &original, &path, &query).await
        }
    }
}

async fn serve_pass_through(
    state: &SharedState,
    mut request: Request,
    next: Next,
    original: &str,
    path: &str,
    query: &str,
) -> Response {
    if has_parent_segment(path) {
        return next.run(request).await;
    }

    let Some(content_type) = template_content_type(path) else {
        if path != request.uri().path() {
            match Uri::try_from(format!("{path}{query}")) {
                Ok(uri) => *request.uri_mut() = uri,
                Err(e) => {
                    tracing::error!(original = %original, resolved = %path, "Invalid rewritten URI: {}", e);
                }
            }
        }
        return next.run(request).await;
    };

    let file = state.expander.resolve_path(path);
    if !file.is_file() {
        tracing::warn!("404 - {}", file.display());
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.expander.expand_file(&file) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(original = %original, resolved = %path, "{}", e);
            next.run(request).await
        }
    }
}
