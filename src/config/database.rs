//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust models; the composite uniqueness rules that the
//! entity attributes cannot express are added as unique indexes.

use crate::entities::{
    Category, EnumValue, Measure, Parameter, ParameterAggregate, ParameterValue, Product,
    enum_value, parameter_aggregate, parameter_value, product,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable.
///
/// Falls back to a local `SQLite` file that is created on first use.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!("Connecting to database at {database_url}");
    ensure_sqlite_dir(&database_url)?;
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding the database file of a `sqlite://` URL, if it has one.
fn sqlite_dir(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let file = rest.split('?').next()?;
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// `SQLite` creates missing files (`mode=rwc`) but not missing directories.
fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    if let Some(dir) = sqlite_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Creates all catalog tables and unique indexes if they do not exist yet.
///
/// Tables are created in foreign key order: measures, categories, enum values,
/// parameters, products, parameter values, parameter aggregates.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Measure).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, EnumValue).await?;
    create_table(db, &schema, Parameter).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, ParameterValue).await?;
    create_table(db, &schema, ParameterAggregate).await?;

    for index in unique_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement))
        .await?;
    Ok(())
}

/// Multi-column uniqueness rules of the catalog.
fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("ux_enum_values_category_code")
            .table(EnumValue)
            .col(enum_value::Column::CategoryId)
            .col(enum_value::Column::Code)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("ux_products_category_name")
            .table(Product)
            .col(product::Column::CategoryId)
            .col(product::Column::Name)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("ux_parameter_values_param_product")
            .table(ParameterValue)
            .col(parameter_value::Column::ParamId)
            .col(parameter_value::Column::ProductId)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("ux_parameter_values_param_category")
            .table(ParameterValue)
            .col(parameter_value::Column::ParamId)
            .col(parameter_value::Column::CategoryId)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("ux_parameter_aggregates_parent_param")
            .table(ParameterAggregate)
            .col(parameter_aggregate::Column::ParentParamId)
            .col(parameter_aggregate::Column::ParamId)
            .unique()
            .to_owned(),
    ]
}
