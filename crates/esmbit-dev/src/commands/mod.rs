//! Command implementations.
//!
//! - [`serve`] - development server with live reload
//! - [`check`] - configuration and metadata validation

pub mod check;
pub mod serve;

pub use check::execute as check_execute;
pub use serve::execute as serve_execute;
