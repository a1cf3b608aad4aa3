//! Measure business logic - Units of measurement.
//!
//! Measures are referenced by categories (default unit) and parameters (unit of values).
//! Deleting a measure that is still referenced is rejected by the database.

use crate::{
    core::validation::{MEASURE_NAME_MAX_LEN, MEASURE_SHORT_MAX_LEN, required_text},
    entities::{Measure, measure},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Submitted fields of a measure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureInput {
    /// Full name
    pub name: String,
    /// Unique short code
    pub name_short: String,
}

impl MeasureInput {
    fn validate(self) -> Result<Self> {
        Ok(Self {
            name: required_text("name", &self.name, MEASURE_NAME_MAX_LEN)?,
            name_short: required_text("name_short", &self.name_short, MEASURE_SHORT_MAX_LEN)?,
        })
    }
}

/// Lists measures ordered by name, optionally filtered by a substring of either name.
pub async fn list_measures<C: ConnectionTrait>(
    db: &C,
    search: Option<&str>,
) -> Result<Vec<measure::Model>> {
    let mut query = Measure::find();
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(measure::Column::Name.contains(term))
                .add(measure::Column::NameShort.contains(term)),
        );
    }
    query
        .order_by_asc(measure::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a measure by id.
pub async fn get_measure_by_id<C: ConnectionTrait>(
    db: &C,
    measure_id: i64,
) -> Result<Option<measure::Model>> {
    Measure::find_by_id(measure_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a measure by id, failing with [`Error::NotFound`] when missing.
pub async fn require_measure<C: ConnectionTrait>(db: &C, measure_id: i64) -> Result<measure::Model> {
    get_measure_by_id(db, measure_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "measure",
            id: measure_id,
        })
}

/// Finds a measure by its short code.
pub async fn get_measure_by_short_name<C: ConnectionTrait>(
    db: &C,
    name_short: &str,
) -> Result<Option<measure::Model>> {
    Measure::find()
        .filter(measure::Column::NameShort.eq(name_short))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new measure.
///
/// # Errors
/// Returns an error if a field is blank or too long, or the short code is taken.
pub async fn create_measure<C: ConnectionTrait>(
    db: &C,
    input: MeasureInput,
) -> Result<measure::Model> {
    let input = input.validate()?;
    let measure = measure::ActiveModel {
        name: Set(input.name),
        name_short: Set(input.name_short),
        ..Default::default()
    };
    measure
        .insert(db)
        .await
        .map_err(|e| Error::from_write("measure", e))
}

/// Replaces the fields of an existing measure.
pub async fn update_measure<C: ConnectionTrait>(
    db: &C,
    measure_id: i64,
    input: MeasureInput,
) -> Result<measure::Model> {
    let input = input.validate()?;
    let mut measure: measure::ActiveModel = require_measure(db, measure_id).await?.into();
    measure.name = Set(input.name);
    measure.name_short = Set(input.name_short);
    measure
        .update(db)
        .await
        .map_err(|e| Error::from_write("measure", e))
}

/// Deletes a measure that nothing references any more.
pub async fn delete_measure<C: ConnectionTrait>(db: &C, measure_id: i64) -> Result<()> {
    let result = Measure::delete_by_id(measure_id)
        .exec(db)
        .await
        .map_err(|e| Error::from_write("measure", e))?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "measure",
            id: measure_id,
        });
    }
    Ok(())
}
