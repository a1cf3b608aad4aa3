//! `/admin/parameter-values`

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    core::parameter_value::{self, ParameterValueFilter, ParameterValueInput},
    entities::{enum_value, parameter_value::Model},
    errors::{Error, Result},
};

/// Parameter value routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/parameter-values", get(list).post(create))
        .route("/admin/parameter-values/enum-choices", get(enum_choices))
        .route(
            "/admin/parameter-values/:id",
            get(read).put(update).delete(remove),
        )
}

/// `?param=ID`
#[derive(Debug, Deserialize)]
pub struct ParamQuery {
    /// Parameter whose enum values are offered
    pub param: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ParameterValueFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(
        parameter_value::list_parameter_values(&state.db, &filter).await?,
    ))
}

async fn enum_choices(
    State(state): State<AppState>,
    Query(query): Query<ParamQuery>,
) -> Result<Json<Vec<enum_value::Model>>> {
    let param_id = query
        .param
        .ok_or_else(|| Error::validation("Query parameter `param` is required"))?;
    Ok(Json(
        parameter_value::enum_value_choices(&state.db, param_id).await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<ParameterValueInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = parameter_value::create_parameter_value(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Model>> {
    Ok(Json(
        parameter_value::require_parameter_value(&state.db, id).await?,
    ))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ParameterValueInput>,
) -> Result<Json<Model>> {
    Ok(Json(
        parameter_value::update_parameter_value(&state.db, id, input).await?,
    ))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    parameter_value::delete_parameter_value(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
