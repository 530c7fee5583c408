//! Core of the esmbit development server.
//!
//! - [`metadata`] - `app.metadata.json` loading into an immutable [`RouteTable`]
//! - [`resolve`] - app route, redirect and rewrite resolution
//! - [`expand`] - `cms://` literal rewriting and `{{ cms://... }}` inlining
//! - [`page`] - the HTML shell served for app routes
//! - [`reload`] - change tracking and live-reload messages
//!
//! Nothing in this crate speaks HTTP; the `esmbit-dev` crate wires it into a
//! server.

pub mod error;
pub mod expand;
pub mod metadata;
pub mod page;
pub mod reload;
pub mod resolve;

pub use error::{ExpandError, MetadataError, RouteError};
pub use expand::{rewrite_cms_urls, Expander};
pub use metadata::{AppDescriptor, MetadataStore, PathMatcher, RedirectRule, RouteTable, RuleKind};
pub use page::{render_app_page, PageLayout};
pub use reload::{widget_name, ChangeTracker, ReloadKind, ReloadMessage};
pub use resolve::{resolve, Resolution, MAX_REWRITE_DEPTH};
