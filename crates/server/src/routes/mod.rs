//! HTTP route handlers
//!
//! - `gallery`: HTML pages, jump navigation and the JSON render tree
//! - `save`: save forwarding
//! - `health`: liveness and metadata

pub mod gallery;
pub mod health;
pub mod save;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
