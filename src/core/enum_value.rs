//! Enum value business logic - Members of enum categories.
//!
//! Values may only be added to enum categories, codes are unique per category, and
//! each value carries exactly one payload.

use crate::{
    core::{
        category::{as_choice, require_category},
        validation::{
            CODE_MAX_LEN, ValueFields, check_enum_value_category,
            exactly_one_value, required_text,
        },
    },
    entities::{EnumValue, ParameterValue, enum_value, parameter_value},
    errors::{Error, Result},
};
use sea_orm::{Condition, PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Submitted fields of an enum value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumValueInput {
    /// Enum category
    pub category_id: i64,
    /// Code unique within the category
    pub code: String,
    /// Display ordering
    #[serde(default)]
    pub priority: i16,
    /// String payload
    #[serde(default)]
    pub value_str: Option<String>,
    /// Integer payload
    #[serde(default)]
    pub value_int: Option<i64>,
    /// Real payload
    #[serde(default)]
    pub value_real: Option<f64>,
    /// Path payload
    #[serde(default)]
    pub value_path: Option<String>,
}

/// List filters for enum values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnumValueFilter {
    /// Only values of this category
    pub category_id: Option<i64>,
    /// Substring of the code or the string payload
    pub search: Option<String>,
}

/// The displayed payload: the first set field of string, integer, real and path.
#[must_use]
pub fn display_value(value: &enum_value::Model) -> Option<String> {
    value
        .value_str
        .clone()
        .or_else(|| value.value_int.map(|i| i.to_string()))
        .or_else(|| value.value_real.map(format_real))
        .or_else(|| value.value_path.clone())
}

/// Renders a real with at least one decimal place (`1.0`, `0.171`).
#[must_use]
pub fn format_real(value: f64) -> String {
    format!("{value:?}")
}

/// Lists enum values ordered by category, priority and code.
pub async fn list_enum_values<C: ConnectionTrait>(
    db: &C,
    filter: &EnumValueFilter,
) -> Result<Vec<enum_value::Model>> {
    let mut query = EnumValue::find();
    if let Some(category_id) = filter.category_id {
        query = query.filter(enum_value::Column::CategoryId.eq(category_id));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(enum_value::Column::Code.contains(term))
                .add(enum_value::Column::ValueStr.contains(term)),
        );
    }
    query
        .order_by_asc(enum_value::Column::CategoryId)
        .order_by_asc(enum_value::Column::Priority)
        .order_by_asc(enum_value::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an enum value by id.
pub async fn get_enum_value_by_id<C: ConnectionTrait>(
    db: &C,
    enum_value_id: i64,
) -> Result<Option<enum_value::Model>> {
    EnumValue::find_by_id(enum_value_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an enum value by id, failing with [`Error::NotFound`] when missing.
pub async fn require_enum_value<C: ConnectionTrait>(
    db: &C,
    enum_value_id: i64,
) -> Result<enum_value::Model> {
    get_enum_value_by_id(db, enum_value_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "enum value",
            id: enum_value_id,
        })
}

/// Finds a value of `category_id` by code.
pub async fn get_enum_value_by_code<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
    code: &str,
) -> Result<Option<enum_value::Model>> {
    EnumValue::find()
        .filter(enum_value::Column::CategoryId.eq(category_id))
        .filter(enum_value::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

struct ValidEnumValue {
    code: String,
    fields: ValueFields,
}

async fn validate_input<C: ConnectionTrait>(
    db: &C,
    input: EnumValueInput,
) -> Result<ValidEnumValue> {
    let code = required_text("code", &input.code, CODE_MAX_LEN)?;
    let value = exactly_one_value(ValueFields {
        value_enum_id: None,
        value_str: input.value_str,
        value_int: input.value_int,
        value_real: input.value_real,
        value_path: input.value_path,
    })?;

    let category = as_choice(
        "category_id",
        require_category(db, input.category_id).await,
    )?;
    check_enum_value_category(&category)?;

    Ok(ValidEnumValue {
        code,
        fields: value.into_fields(),
    })
}

/// Creates a new enum value.
///
/// # Errors
/// Returns an error if the category is not an enum category, the code is blank, too long
/// or already used in the category, or not exactly one payload is set.
pub async fn create_enum_value<C: ConnectionTrait>(
    db: &C,
    input: EnumValueInput,
) -> Result<enum_value::Model> {
    let category_id = input.category_id;
    let priority = input.priority;
    let valid = validate_input(db, input).await?;

    let value = enum_value::ActiveModel {
        category_id: Set(category_id),
        code: Set(valid.code),
        priority: Set(priority),
        value_str: Set(valid.fields.value_str),
        value_int: Set(valid.fields.value_int),
        value_real: Set(valid.fields.value_real),
        value_path: Set(valid.fields.value_path),
        ..Default::default()
    };
    value
        .insert(db)
        .await
        .map_err(|e| Error::from_write("enum value", e))
}

/// Replaces the fields of an existing enum value.
///
/// # Errors
/// On top of the creation checks, fails if the value is moved to another category while
/// parameter values still select it.
pub async fn update_enum_value<C: ConnectionTrait>(
    db: &C,
    enum_value_id: i64,
    input: EnumValueInput,
) -> Result<enum_value::Model> {
    let existing = require_enum_value(db, enum_value_id).await?;
    let category_id = input.category_id;
    let priority = input.priority;
    let valid = validate_input(db, input).await?;

    if category_id != existing.category_id {
        let selected = ParameterValue::find()
            .filter(parameter_value::Column::ValueEnumId.eq(enum_value_id))
            .count(db)
            .await?;
        if selected > 0 {
            return Err(Error::validation(format!(
                "'{}' is selected by {selected} parameter value(s) and cannot change category",
                existing.code
            )));
        }
    }

    let mut value: enum_value::ActiveModel = existing.into();
    value.category_id = Set(category_id);
    value.code = Set(valid.code);
    value.priority = Set(priority);
    value.value_str = Set(valid.fields.value_str);
    value.value_int = Set(valid.fields.value_int);
    value.value_real = Set(valid.fields.value_real);
    value.value_path = Set(valid.fields.value_path);
    value
        .update(db)
        .await
        .map_err(|e| Error::from_write("enum value", e))
}

/// Deletes an enum value no parameter value still selects.
pub async fn delete_enum_value<C: ConnectionTrait>(db: &C, enum_value_id: i64) -> Result<()> {
    let result = EnumValue::delete_by_id(enum_value_id)
        .exec(db)
        .await
        .map_err(|e| Error::from_write("enum value", e))?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "enum value",
            id: enum_value_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::validation::Owner, entities::DataType, test_utils::*};

    #[tokio::test]
    async fn test_values_only_for_enum_categories() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let plain = create_test_category(&db, "Anchors", None, measure.id).await?;

        let result = create_test_enum_value(&db, plain.id, "1", "Metal").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidChoice {
                field: "category_id",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_exactly_one_payload() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let material = create_test_enum_category(&db, "Material", None, measure.id).await?;

        let none_set = create_enum_value(
            &db,
            EnumValueInput {
                category_id: material.id,
                code: "1".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(none_set.unwrap_err(), Error::Validation { .. }));

        let two_set = create_enum_value(
            &db,
            EnumValueInput {
                category_id: material.id,
                code: "1".to_string(),
                value_str: Some("Metal".to_string()),
                value_int: Some(1),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(two_set.unwrap_err(), Error::Validation { .. }));

        let zero = create_enum_value(
            &db,
            EnumValueInput {
                category_id: material.id,
                code: "0".to_string(),
                value_int: Some(0),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(display_value(&zero).as_deref(), Some("0"));
        Ok(())
    }

    #[tokio::test]
    async fn test_code_unique_per_category() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let material = create_test_enum_category(&db, "Material", None, measure.id).await?;
        let picture = create_test_enum_category(&db, "Scheme", None, measure.id).await?;

        create_test_enum_value(&db, material.id, "1", "Metal").await?;
        create_test_enum_value(&db, picture.id, "1", "C:\\picture1.png").await?;

        let result = create_test_enum_value(&db, material.id, "1", "Plastic").await;
        assert!(matches!(result.unwrap_err(), Error::Duplicate { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_ordering_by_priority() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let picture = create_test_enum_category(&db, "Scheme", None, measure.id).await?;
        for (code, priority) in [("1", 1), ("2", 3), ("3", 2)] {
            create_enum_value(
                &db,
                EnumValueInput {
                    category_id: picture.id,
                    code: code.to_string(),
                    priority,
                    value_path: Some(format!("C:\\picture{code}.png")),
                    ..Default::default()
                },
            )
            .await?;
        }

        let values = list_enum_values(
            &db,
            &EnumValueFilter {
                category_id: Some(picture.id),
                ..Default::default()
            },
        )
        .await?;
        let codes: Vec<&str> = values.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["1", "3", "2"]);
        Ok(())
    }

    #[test]
    fn test_display_value_order() {
        let value = enum_value::Model {
            id: 1,
            category_id: 1,
            code: "1".to_string(),
            priority: 0,
            value_str: None,
            value_int: None,
            value_real: Some(1.0),
            value_path: None,
        };
        assert_eq!(display_value(&value).as_deref(), Some("1.0"));
        assert_eq!(format_real(0.171), "0.171");
    }

    #[tokio::test]
    async fn test_selected_value_stays_in_its_category() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let anchors = create_test_category(&db, "Anchors", None, measure.id).await?;
        let material = create_test_enum_category(&db, "Material", None, measure.id).await?;
        let scheme = create_test_enum_category(&db, "Scheme", None, measure.id).await?;
        let metal = create_test_enum_value(&db, material.id, "1", "Metal").await?;
        let mat = create_test_parameter(&db, "mat", DataType::Enum, Some(material.id)).await?;
        create_test_value(
            &db,
            Owner::Category(anchors.id),
            mat.id,
            ValueFields {
                value_enum_id: Some(metal.id),
                ..Default::default()
            },
        )
        .await?;

        let moved = update_enum_value(
            &db,
            metal.id,
            EnumValueInput {
                category_id: scheme.id,
                code: "1".to_string(),
                value_str: Some("Metal".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(moved.unwrap_err(), Error::Validation { .. }));
        assert_eq!(require_enum_value(&db, metal.id).await?.category_id, material.id);

        // Editing the payload in place is allowed
        let renamed = update_enum_value(
            &db,
            metal.id,
            EnumValueInput {
                category_id: material.id,
                code: "1".to_string(),
                value_str: Some("Steel".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(renamed.value_str.as_deref(), Some("Steel"));
        Ok(())
    }
}
