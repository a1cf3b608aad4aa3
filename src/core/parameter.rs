//! Parameter business logic - Typed attribute definitions.
//!
//! A parameter of type `enum` must reference an enum category; every other type must not.

use crate::{
    core::{
        category::{as_choice, require_category},
        measure::require_measure,
        validation::{
            CODE_MAX_LEN, NAME_MAX_LEN, ValueFields, check_bounds, check_parameter_enum,
            check_value_for_parameter, exactly_one_value, required_text,
        },
    },
    entities::{
        Category, DataType, EnumValue, Parameter, ParameterValue, category, enum_value,
        parameter, parameter_value,
    },
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Submitted fields of a parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInput {
    /// Human-readable name
    pub name: String,
    /// Unique short code
    pub name_short: String,
    /// Declared data type
    pub data_type: DataType,
    /// Measure of the values
    #[serde(default)]
    pub measure_id: Option<i64>,
    /// Enum category, required for `enum` parameters
    #[serde(default)]
    pub enum_id: Option<i64>,
    /// Lower bound for numeric values
    #[serde(default)]
    pub min_val: Option<i64>,
    /// Upper bound for numeric values
    #[serde(default)]
    pub max_val: Option<i64>,
}

/// List filters for parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterFilter {
    /// Only parameters of this type
    pub data_type: Option<DataType>,
    /// Substring of the name or short code
    pub search: Option<String>,
}

/// Lists parameters ordered by name.
pub async fn list_parameters<C: ConnectionTrait>(
    db: &C,
    filter: &ParameterFilter,
) -> Result<Vec<parameter::Model>> {
    let mut query = Parameter::find();
    if let Some(data_type) = filter.data_type {
        query = query.filter(parameter::Column::DataType.eq(data_type));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(parameter::Column::Name.contains(term))
                .add(parameter::Column::NameShort.contains(term)),
        );
    }
    query
        .order_by_asc(parameter::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Categories an enum parameter may reference: every enum category.
pub async fn enum_choices<C: ConnectionTrait>(db: &C) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::IsEnum.eq(true))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a parameter by id.
pub async fn get_parameter_by_id<C: ConnectionTrait>(
    db: &C,
    parameter_id: i64,
) -> Result<Option<parameter::Model>> {
    Parameter::find_by_id(parameter_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a parameter by id, failing with [`Error::NotFound`] when missing.
pub async fn require_parameter<C: ConnectionTrait>(
    db: &C,
    parameter_id: i64,
) -> Result<parameter::Model> {
    get_parameter_by_id(db, parameter_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "parameter",
            id: parameter_id,
        })
}

/// Ids of the parameters whose name contains `term`.
pub async fn ids_with_name_like<C: ConnectionTrait>(db: &C, term: &str) -> Result<Vec<i64>> {
    Parameter::find()
        .select_only()
        .column(parameter::Column::Id)
        .filter(parameter::Column::Name.contains(term))
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a parameter by its short code.
pub async fn get_parameter_by_short_name<C: ConnectionTrait>(
    db: &C,
    name_short: &str,
) -> Result<Option<parameter::Model>> {
    Parameter::find()
        .filter(parameter::Column::NameShort.eq(name_short))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn validate_input<C: ConnectionTrait>(
    db: &C,
    input: ParameterInput,
) -> Result<ParameterInput> {
    let name = required_text("name", &input.name, NAME_MAX_LEN)?;
    let name_short = required_text("name_short", &input.name_short, CODE_MAX_LEN)?;
    check_bounds(input.min_val, input.max_val)?;

    if let Some(measure_id) = input.measure_id {
        as_choice("measure_id", require_measure(db, measure_id).await)?;
    }
    let enum_category = match input.enum_id {
        Some(enum_id) => Some(as_choice("enum_id", require_category(db, enum_id).await)?),
        None => None,
    };
    check_parameter_enum(input.data_type, enum_category.as_ref())?;

    Ok(ParameterInput {
        name,
        name_short,
        ..input
    })
}

/// Creates a new parameter.
///
/// # Errors
/// Returns an error if a name is blank or too long, the short code is taken, the
/// data type and enum category do not fit together, or `min_val > max_val`.
pub async fn create_parameter<C: ConnectionTrait>(
    db: &C,
    input: ParameterInput,
) -> Result<parameter::Model> {
    let input = validate_input(db, input).await?;
    let parameter = parameter::ActiveModel {
        measure_id: Set(input.measure_id),
        data_type: Set(input.data_type),
        enum_id: Set(input.enum_id),
        name: Set(input.name),
        name_short: Set(input.name_short),
        min_val: Set(input.min_val),
        max_val: Set(input.max_val),
        ..Default::default()
    };
    parameter
        .insert(db)
        .await
        .map_err(|e| Error::from_write("parameter", e))
}

/// Checks every value stored for `candidate.id` against the new definition.
async fn check_stored_values<C: ConnectionTrait>(
    db: &C,
    candidate: &parameter::Model,
) -> Result<()> {
    let stored = ParameterValue::find()
        .filter(parameter_value::Column::ParamId.eq(candidate.id))
        .order_by_asc(parameter_value::Column::Id)
        .all(db)
        .await?;
    let member_ids: Vec<i64> = stored.iter().filter_map(|v| v.value_enum_id).collect();
    let members: HashMap<i64, enum_value::Model> = if member_ids.is_empty() {
        HashMap::new()
    } else {
        EnumValue::find()
            .filter(enum_value::Column::Id.is_in(member_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect()
    };

    for pv in stored {
        let id = pv.id;
        let member = pv.value_enum_id.and_then(|eid| members.get(&eid));
        exactly_one_value(ValueFields {
            value_enum_id: pv.value_enum_id,
            value_str: pv.value_str,
            value_int: pv.value_int,
            value_real: pv.value_real,
            value_path: pv.value_path,
        })
        .and_then(|value| check_value_for_parameter(candidate, &value, member))
        .map_err(|e| {
            Error::validation(format!(
                "Stored value {id} does not fit the new definition of '{}': {e}",
                candidate.name
            ))
        })?;
    }
    Ok(())
}

/// Replaces the fields of an existing parameter.
///
/// # Errors
/// On top of the creation checks, fails if a value already stored for the parameter
/// would no longer fit its data type, enum category or bounds.
pub async fn update_parameter<C: ConnectionTrait>(
    db: &C,
    parameter_id: i64,
    input: ParameterInput,
) -> Result<parameter::Model> {
    let existing = require_parameter(db, parameter_id).await?;
    let input = validate_input(db, input).await?;
    check_stored_values(
        db,
        &parameter::Model {
            id: existing.id,
            measure_id: input.measure_id,
            data_type: input.data_type,
            enum_id: input.enum_id,
            name: input.name.clone(),
            name_short: input.name_short.clone(),
            min_val: input.min_val,
            max_val: input.max_val,
        },
    )
    .await?;

    let mut parameter: parameter::ActiveModel = existing.into();
    parameter.measure_id = Set(input.measure_id);
    parameter.data_type = Set(input.data_type);
    parameter.enum_id = Set(input.enum_id);
    parameter.name = Set(input.name);
    parameter.name_short = Set(input.name_short);
    parameter.min_val = Set(input.min_val);
    parameter.max_val = Set(input.max_val);
    parameter
        .update(db)
        .await
        .map_err(|e| Error::from_write("parameter", e))
}

/// Deletes a parameter together with its values and aggregate links.
pub async fn delete_parameter<C: ConnectionTrait>(db: &C, parameter_id: i64) -> Result<()> {
    let result = Parameter::delete_by_id(parameter_id)
        .exec(db)
        .await
        .map_err(|e| Error::from_write("parameter", e))?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "parameter",
            id: parameter_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::validation::Owner, test_utils::*};

    fn input(name_short: &str, data_type: DataType, enum_id: Option<i64>) -> ParameterInput {
        ParameterInput {
            name: format!("Parameter {name_short}"),
            name_short: name_short.to_string(),
            data_type,
            measure_id: None,
            enum_id,
            min_val: None,
            max_val: None,
        }
    }

    #[tokio::test]
    async fn test_enum_parameter_requires_enum_category() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let colors = create_test_enum_category(&db, "Colors", None, measure.id).await?;
        let plain = create_test_category(&db, "Phones", None, measure.id).await?;

        let missing = create_parameter(&db, input("color", DataType::Enum, None)).await;
        assert!(matches!(missing.unwrap_err(), Error::Validation { .. }));

        let not_enum = create_parameter(&db, input("color", DataType::Enum, Some(plain.id))).await;
        assert!(matches!(
            not_enum.unwrap_err(),
            Error::InvalidChoice {
                field: "enum_id",
                ..
            }
        ));

        let stray = create_parameter(&db, input("weight", DataType::Real, Some(colors.id))).await;
        assert!(matches!(stray.unwrap_err(), Error::Validation { .. }));

        let color = create_parameter(&db, input("color", DataType::Enum, Some(colors.id))).await?;
        assert_eq!(color.data_type, DataType::Enum);
        assert_eq!(color.enum_id, Some(colors.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_short_name_unique_and_length() -> Result<()> {
        let db = setup_test_db().await?;
        create_parameter(&db, input("l", DataType::Int, None)).await?;

        let duplicate = create_parameter(&db, input("l", DataType::Str, None)).await;
        assert!(matches!(duplicate.unwrap_err(), Error::Duplicate { .. }));

        let too_long = create_parameter(&db, input("too_long_code", DataType::Int, None)).await;
        assert!(matches!(too_long.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_enum_choices() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let colors = create_test_enum_category(&db, "Colors", None, measure.id).await?;
        create_test_category(&db, "Phones", None, measure.id).await?;
        create_parameter(&db, input("w", DataType::Int, None)).await?;
        create_parameter(&db, input("c", DataType::Enum, Some(colors.id))).await?;

        let ints = list_parameters(
            &db,
            &ParameterFilter {
                data_type: Some(DataType::Int),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(ints.len(), 1);
        assert_eq!(ints[0].name_short, "w");

        assert_eq!(enum_choices(&db).await?, vec![colors]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_parameter_bounds() -> Result<()> {
        let db = setup_test_db().await?;
        let length = create_parameter(&db, input("l", DataType::Int, None)).await?;

        let bad = update_parameter(
            &db,
            length.id,
            ParameterInput {
                min_val: Some(10),
                max_val: Some(1),
                ..input("l", DataType::Int, None)
            },
        )
        .await;
        assert!(matches!(bad.unwrap_err(), Error::Validation { .. }));

        let updated = update_parameter(
            &db,
            length.id,
            ParameterInput {
                min_val: Some(1),
                max_val: Some(10),
                ..input("l", DataType::Int, None)
            },
        )
        .await?;
        assert_eq!(updated.max_val, Some(10));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_parameter_keeps_stored_values_valid() -> Result<()> {
        let (db, measure) = setup_with_measure().await?;
        let anchors = create_test_category(&db, "Anchors", None, measure.id).await?;
        let material = create_test_enum_category(&db, "Material", None, measure.id).await?;
        let scheme = create_test_enum_category(&db, "Scheme", None, measure.id).await?;
        let metal = create_test_enum_value(&db, material.id, "1", "Metal").await?;

        let length = create_parameter(&db, input("l", DataType::Int, None)).await?;
        create_test_value(
            &db,
            Owner::Category(anchors.id),
            length.id,
            ValueFields {
                value_int: Some(50),
                ..Default::default()
            },
        )
        .await?;

        // The stored int would land in the wrong column
        let retyped = update_parameter(&db, length.id, input("l", DataType::Str, None)).await;
        assert!(matches!(retyped.unwrap_err(), Error::Validation { .. }));

        // Narrowed bounds would exclude the stored value
        let narrowed = update_parameter(
            &db,
            length.id,
            ParameterInput {
                max_val: Some(10),
                ..input("l", DataType::Int, None)
            },
        )
        .await;
        assert!(matches!(narrowed.unwrap_err(), Error::Validation { .. }));
        assert_eq!(require_parameter(&db, length.id).await?.max_val, None);

        let mat = create_parameter(&db, input("mat", DataType::Enum, Some(material.id))).await?;
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

        // The selected member belongs to the old enum category
        let moved = update_parameter(&db, mat.id, input("mat", DataType::Enum, Some(scheme.id))).await;
        assert!(matches!(moved.unwrap_err(), Error::Validation { .. }));
        assert_eq!(require_parameter(&db, mat.id).await?.enum_id, Some(material.id));

        // Renaming keeps every value valid
        let renamed = update_parameter(
            &db,
            mat.id,
            ParameterInput {
                name: "Material".to_string(),
                ..input("mat", DataType::Enum, Some(material.id))
            },
        )
        .await?;
        assert_eq!(renamed.name, "Material");
        Ok(())
    }
}
