//! Shared test utilities for the catalog.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        category::{self, CategoryInput},
        enum_value::{self, EnumValueInput},
        measure::{self, MeasureInput},
        parameter::{self, ParameterInput},
        parameter_value::{self, ParameterValueInput},
        product::{self, ProductInput},
        validation::{Owner, ValueFields},
    },
    entities::{self, DataType},
    errors::Result,
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test measure.
pub async fn create_test_measure(
    db: &DatabaseConnection,
    name: &str,
    name_short: &str,
) -> Result<entities::measure::Model> {
    measure::create_measure(
        db,
        MeasureInput {
            name: name.to_string(),
            name_short: name_short.to_string(),
        },
    )
    .await
}

/// Creates a taxonomy (non-enum) category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    parent_id: Option<i64>,
    measure_id: i64,
) -> Result<entities::category::Model> {
    category::create_category(
        db,
        CategoryInput {
            name: name.to_string(),
            parent_id,
            is_enum: false,
            measure_id,
        },
    )
    .await
}

/// Creates an enum category.
pub async fn create_test_enum_category(
    db: &DatabaseConnection,
    name: &str,
    parent_id: Option<i64>,
    measure_id: i64,
) -> Result<entities::category::Model> {
    category::create_category(
        db,
        CategoryInput {
            name: name.to_string(),
            parent_id,
            is_enum: true,
            measure_id,
        },
    )
    .await
}

/// Creates an enum value with a string payload and priority 0.
pub async fn create_test_enum_value(
    db: &DatabaseConnection,
    category_id: i64,
    code: &str,
    value_str: &str,
) -> Result<entities::enum_value::Model> {
    enum_value::create_enum_value(
        db,
        EnumValueInput {
            category_id,
            code: code.to_string(),
            value_str: Some(value_str.to_string()),
            ..Default::default()
        },
    )
    .await
}

/// Creates a parameter named after its short code, without measure or bounds.
pub async fn create_test_parameter(
    db: &DatabaseConnection,
    name_short: &str,
    data_type: DataType,
    enum_id: Option<i64>,
) -> Result<entities::parameter::Model> {
    parameter::create_parameter(
        db,
        ParameterInput {
            name: format!("Parameter {name_short}"),
            name_short: name_short.to_string(),
            data_type,
            measure_id: None,
            enum_id,
            min_val: None,
            max_val: None,
        },
    )
    .await
}

/// Creates a test product.
///
/// # Defaults
/// * amount: 0
/// * price: 10.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductInput {
            category_id,
            name: name.to_string(),
            amount: 0,
            price: 10.0,
        },
    )
    .await
}

/// Attaches a value to a product or a category.
pub async fn create_test_value(
    db: &DatabaseConnection,
    owner: Owner,
    param_id: i64,
    value: ValueFields,
) -> Result<entities::parameter_value::Model> {
    parameter_value::create_parameter_value(
        db,
        ParameterValueInput {
            product_id: owner.product_id(),
            category_id: owner.category_id(),
            param_id,
            value,
        },
    )
    .await
}

/// Sets up a test database with a "Piece" (`pcs`) measure.
/// Returns (db, measure) for common test scenarios.
pub async fn setup_with_measure() -> Result<(DatabaseConnection, entities::measure::Model)> {
    let db = setup_test_db().await?;
    let measure = create_test_measure(&db, "Piece", "pcs").await?;
    Ok((db, measure))
}

/// Sends one request through `router` and decodes the JSON response body.
///
/// An empty body (e.g. `204 No Content`) decodes to `null`.
#[allow(clippy::unwrap_used)]
pub async fn api(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
