//! `/admin/parameter-aggregates`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    api::AppState,
    core::aggregate::{self, AggregateFilter, AggregateInput},
    entities::parameter_aggregate::Model,
    errors::Result,
};

/// Parameter aggregate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/parameter-aggregates", get(list).post(create))
        .route(
            "/admin/parameter-aggregates/:id",
            get(read).put(update).delete(remove),
        )
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AggregateFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(aggregate::list_aggregates(&state.db, &filter).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<AggregateInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = aggregate::create_aggregate(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(aggregate::require_aggregate(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AggregateInput>,
) -> Result<Json<Model>> {
    Ok(Json(aggregate::update_aggregate(&state.db, id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    aggregate::delete_aggregate(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
