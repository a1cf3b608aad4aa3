//! `/admin/categories`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    api::AppState,
    core::category::{self, CategoryFilter, CategoryInput},
    entities::category::Model,
    errors::Result,
};

/// Category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/categories", get(list).post(create))
        .route("/admin/categories/parent-choices", get(parent_choices))
        .route("/admin/categories/:id", get(read).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(category::list_categories(&state.db, &filter).await?))
}

async fn parent_choices(State(state): State<AppState>) -> Result<Json<Vec<Model>>> {
    Ok(Json(category::parent_choices(&state.db).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = category::create_category(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(category::require_category(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Model>> {
    Ok(Json(category::update_category(&state.db, id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    category::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
