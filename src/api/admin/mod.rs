//! Admin CRUD endpoints under `/admin`.
//!
//! Every entity gets `GET` (filtered list) and `POST` on the collection, and `GET`,
//! `PUT` and `DELETE` on `/:id`. Writes go through the validated core operations.

pub mod aggregates;
pub mod categories;
pub mod enum_values;
pub mod measures;
pub mod parameter_values;
pub mod parameters;
pub mod products;

use axum::Router;

use crate::api::AppState;

/// All admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(measures::routes())
        .merge(categories::routes())
        .merge(enum_values::routes())
        .merge(parameters::routes())
        .merge(products::routes())
        .merge(parameter_values::routes())
        .merge(aggregates::routes())
}
