//! `/admin/products`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    api::AppState,
    core::product::{self, ProductFilter, ProductInput},
    entities::product::Model,
    errors::Result,
};

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(list).post(create))
        .route("/admin/products/:id", get(read).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(product::list_products(&state.db, &filter).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = product::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(product::require_product(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Model>> {
    Ok(Json(product::update_product(&state.db, id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    product::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
