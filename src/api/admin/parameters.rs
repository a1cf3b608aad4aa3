//! `/admin/parameters`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    api::AppState,
    core::parameter::{self, ParameterFilter, ParameterInput},
    entities::{category, parameter::Model},
    errors::Result,
};

/// Parameter routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/parameters", get(list).post(create))
        .route("/admin/parameters/enum-choices", get(enum_choices))
        .route("/admin/parameters/:id", get(read).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ParameterFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(parameter::list_parameters(&state.db, &filter).await?))
}

async fn enum_choices(State(state): State<AppState>) -> Result<Json<Vec<category::Model>>> {
    Ok(Json(parameter::enum_choices(&state.db).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<ParameterInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = parameter::create_parameter(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(parameter::require_parameter(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ParameterInput>,
) -> Result<Json<Model>> {
    Ok(Json(parameter::update_parameter(&state.db, id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    parameter::delete_parameter(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{api::create_router, test_utils::*};
    use serde_json::json;

    #[tokio::test]
    async fn test_parameter_routes() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let colors = create_test_enum_category(&db, "Colors", None, measure.id).await?;
        create_test_category(&db, "Phones", None, measure.id).await?;
        let app = create_router(AppState::new(db));

        let (_, choices) = api(&app, "GET", "/admin/parameters/enum-choices", None).await;
        assert_eq!(choices.as_array().unwrap().len(), 1);
        assert_eq!(choices[0]["id"], colors.id);

        let (status, _) = api(
            &app,
            "POST",
            "/admin/parameters",
            Some(json!({"name": "Color", "name_short": "c", "data_type": "enum"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, created) = api(
            &app,
            "POST",
            "/admin/parameters",
            Some(json!({
                "name": "Color",
                "name_short": "c",
                "data_type": "enum",
                "enum_id": colors.id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data_type"], "enum");

        let (_, listed) = api(&app, "GET", "/admin/parameters?data_type=int", None).await;
        assert_eq!(listed, json!([]));
        Ok(())
    }
}
