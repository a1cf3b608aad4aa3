//! Report endpoints.
//!
//! The subject of a report is selected by a query parameter; a missing parameter is a
//! validation error and an unknown id is reported as not found.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    core::{
        report::{
            self, AggregateParamsReport, CategoryChainReport, DescendantsReport,
            ProductParameterRow, ProductParamsReport,
        },
        tree::ClassifierLine,
    },
    errors::{Error, Result},
};

/// Report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/classifier", get(classifier))
        .route("/reports/descendants", get(descendants))
        .route("/reports/parents", get(parents))
        .route("/reports/terminals", get(terminals))
        .route("/reports/products-with-params", get(products_with_params))
        .route("/reports/all-products-with-params", get(all_products_with_params))
        .route("/reports/product-params", get(product_params))
        .route("/reports/aggregate-params", get(aggregate_params))
}

/// `?category=ID`
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// Selected category
    pub category: Option<i64>,
}

/// `?product=ID`
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Selected product
    pub product: Option<i64>,
}

/// `?parent_param_id=ID`
#[derive(Debug, Deserialize)]
pub struct AggregateQuery {
    /// Selected grouping parameter
    pub parent_param_id: Option<i64>,
}

fn required(field: &str, value: Option<i64>) -> Result<i64> {
    value.ok_or_else(|| Error::validation(format!("Query parameter `{field}` is required")))
}

async fn classifier(State(state): State<AppState>) -> Result<Json<Vec<ClassifierLine>>> {
    Ok(Json(report::classifier(&state.db).await?))
}

async fn descendants(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<DescendantsReport>> {
    let category = required("category", query.category)?;
    Ok(Json(report::descendants(&state.db, category).await?))
}

async fn parents(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoryChainReport>> {
    let category = required("category", query.category)?;
    Ok(Json(report::parents(&state.db, category).await?))
}

async fn terminals(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoryChainReport>> {
    let category = required("category", query.category)?;
    Ok(Json(report::terminals(&state.db, category).await?))
}

async fn products_with_params(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<ProductParameterRow>>> {
    let category = required("category", query.category)?;
    Ok(Json(report::products_with_params(&state.db, category).await?))
}

async fn all_products_with_params(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductParameterRow>>> {
    Ok(Json(report::all_products_with_params(&state.db).await?))
}

async fn product_params(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductParamsReport>> {
    let product = required("product", query.product)?;
    Ok(Json(report::product_params(&state.db, product).await?))
}

async fn aggregate_params(
    State(state): State<AppState>,
    Query(query): Query<AggregateQuery>,
) -> Result<Json<AggregateParamsReport>> {
    let parent_param_id = required("parent_param_id", query.parent_param_id)?;
    Ok(Json(report::aggregate_params(&state.db, parent_param_id).await?))
}
