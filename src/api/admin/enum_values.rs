//! `/admin/enum-values`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    api::AppState,
    core::enum_value::{self, EnumValueFilter, EnumValueInput},
    entities::enum_value::Model,
    errors::Result,
};

/// Enum value routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/enum-values", get(list).post(create))
        .route("/admin/enum-values/:id", get(read).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<EnumValueFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(enum_value::list_enum_values(&state.db, &filter).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<EnumValueInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = enum_value::create_enum_value(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(enum_value::require_enum_value(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<EnumValueInput>,
) -> Result<Json<Model>> {
    Ok(Json(enum_value::update_enum_value(&state.db, id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    enum_value::delete_enum_value(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{api::create_router, test_utils::*};
    use serde_json::json;

    #[tokio::test]
    async fn test_enum_value_routes() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let material = create_test_enum_category(&db, "Material", None, measure.id).await?;
        let app = create_router(AppState::new(db));

        let (status, body) = api(
            &app,
            "POST",
            "/admin/enum-values",
            Some(json!({"category_id": material.id, "code": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, created) = api(
            &app,
            "POST",
            "/admin/enum-values",
            Some(json!({"category_id": material.id, "code": "1", "value_str": "Metal"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["priority"], 0);

        let uri = format!("/admin/enum-values?category_id={}", material.id);
        let (_, listed) = api(&app, "GET", &uri, None).await;
        assert_eq!(listed[0]["value_str"], "Metal");
        Ok(())
    }
}
