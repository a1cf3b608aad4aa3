//! `/admin/measures`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    core::measure::{self, MeasureInput},
    entities::measure::Model,
    errors::Result,
};

/// Measure routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/measures", get(list).post(create))
        .route("/admin/measures/:id", get(read).put(update).delete(remove))
}

/// `?search=...`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Substring of the name or short name
    pub search: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(
        measure::list_measures(&state.db, query.search.as_deref()).await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<MeasureInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = measure::create_measure(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(measure::require_measure(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MeasureInput>,
) -> Result<Json<Model>> {
    Ok(Json(measure::update_measure(&state.db, id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    measure::delete_measure(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
