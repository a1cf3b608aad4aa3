//! HTTP/JSON interface to the catalog.
//!
//! Admin routes expose create, read, update and delete for every entity; report routes
//! expose the read-only catalog reports. All handlers share one database connection.

pub mod admin;
pub mod error;
pub mod health;
pub mod reports;

pub use error::ErrorResponse;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Catalog database connection (internally pooled).
    pub db: DatabaseConnection,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(reports::routes())
        .merge(admin::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
