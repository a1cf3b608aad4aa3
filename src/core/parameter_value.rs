//! Parameter value business logic - Values bound to products or categories.
//!
//! A value has exactly one owner and exactly one populated value column, and the
//! populated column must fit the parameter's declared type and bounds.

use crate::{
    core::{
        category::{as_choice, require_category},
        enum_value::{self as enum_values, format_real},
        parameter::{ids_with_name_like, require_parameter},
        product::require_product,
        validation::{
            Owner, ParamValue, ValueFields, check_value_for_parameter, exactly_one_owner,
            exactly_one_value,
        },
    },
    entities::{DataType, EnumValue, ParameterValue, enum_value, parameter_value},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Submitted fields of a parameter value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterValueInput {
    /// Owning product
    #[serde(default)]
    pub product_id: Option<i64>,
    /// Owning category
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Parameter the value is for
    pub param_id: i64,
    /// Value columns
    #[serde(flatten)]
    pub value: ValueFields,
}

/// List filters for parameter values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterValueFilter {
    /// Only values of this parameter
    pub param_id: Option<i64>,
    /// Substring of the parameter name or the string value
    pub search: Option<String>,
}

/// The displayed value: the first set of string, integer, real, path and enum code.
///
/// `enum_value` is the row referenced by `value_enum_id`, when loaded.
#[must_use]
pub fn display_value(
    value: &parameter_value::Model,
    enum_value: Option<&enum_value::Model>,
) -> Option<String> {
    value
        .value_str
        .clone()
        .or_else(|| value.value_int.map(|i| i.to_string()))
        .or_else(|| value.value_real.map(format_real))
        .or_else(|| value.value_path.clone())
        .or_else(|| enum_value.map(|ev| ev.code.clone()))
}

/// Lists parameter values ordered by id.
pub async fn list_parameter_values<C: ConnectionTrait>(
    db: &C,
    filter: &ParameterValueFilter,
) -> Result<Vec<parameter_value::Model>> {
    let mut query = ParameterValue::find();
    if let Some(param_id) = filter.param_id {
        query = query.filter(parameter_value::Column::ParamId.eq(param_id));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let params = ids_with_name_like(db, term).await?;
        query = query.filter(
            Condition::any()
                .add(parameter_value::Column::ParamId.is_in(params))
                .add(parameter_value::Column::ValueStr.contains(term)),
        );
    }
    query
        .order_by_asc(parameter_value::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Values attached directly to a product, ordered by id.
pub async fn values_for_product<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
) -> Result<Vec<parameter_value::Model>> {
    ParameterValue::find()
        .filter(parameter_value::Column::ProductId.eq(product_id))
        .order_by_asc(parameter_value::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Values attached to a category, ordered by id.
pub async fn values_for_category<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
) -> Result<Vec<parameter_value::Model>> {
    ParameterValue::find()
        .filter(parameter_value::Column::CategoryId.eq(category_id))
        .order_by_asc(parameter_value::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Enum values selectable for `param_id`: the members of its enum category, or none for
/// parameters of other types.
pub async fn enum_value_choices<C: ConnectionTrait>(
    db: &C,
    param_id: i64,
) -> Result<Vec<enum_value::Model>> {
    let param = require_parameter(db, param_id).await?;
    match (param.data_type, param.enum_id) {
        (DataType::Enum, Some(category_id)) => {
            enum_values::list_enum_values(
                db,
                &enum_values::EnumValueFilter {
                    category_id: Some(category_id),
                    search: None,
                },
            )
            .await
        }
        _ => Ok(Vec::new()),
    }
}

/// Retrieves a parameter value by id.
pub async fn get_parameter_value_by_id<C: ConnectionTrait>(
    db: &C,
    value_id: i64,
) -> Result<Option<parameter_value::Model>> {
    ParameterValue::find_by_id(value_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a parameter value by id, failing with [`Error::NotFound`] when missing.
pub async fn require_parameter_value<C: ConnectionTrait>(
    db: &C,
    value_id: i64,
) -> Result<parameter_value::Model> {
    get_parameter_value_by_id(db, value_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "parameter value",
            id: value_id,
        })
}

async fn validate_input<C: ConnectionTrait>(
    db: &C,
    input: ParameterValueInput,
) -> Result<(Owner, i64, ValueFields)> {
    let owner = exactly_one_owner(input.product_id, input.category_id)?;
    let value = exactly_one_value(input.value)?;

    match owner {
        Owner::Product(id) => {
            as_choice("product_id", require_product(db, id).await)?;
        }
        Owner::Category(id) => {
            as_choice("category_id", require_category(db, id).await)?;
        }
    }
    let param = as_choice("param_id", require_parameter(db, input.param_id).await)?;

    let member = match value {
        ParamValue::Enum(id) => EnumValue::find_by_id(id).one(db).await?,
        _ => None,
    };
    check_value_for_parameter(&param, &value, member.as_ref())?;

    Ok((owner, param.id, value.into_fields()))
}

/// Creates a new parameter value.
///
/// # Errors
/// Returns an error if the owner or value rules are broken, the value does not fit the
/// parameter, or the owner already has a value for the parameter.
pub async fn create_parameter_value<C: ConnectionTrait>(
    db: &C,
    input: ParameterValueInput,
) -> Result<parameter_value::Model> {
    let (owner, param_id, fields) = validate_input(db, input).await?;
    let value = parameter_value::ActiveModel {
        product_id: Set(owner.product_id()),
        category_id: Set(owner.category_id()),
        param_id: Set(param_id),
        value_enum_id: Set(fields.value_enum_id),
        value_str: Set(fields.value_str),
        value_int: Set(fields.value_int),
        value_real: Set(fields.value_real),
        value_path: Set(fields.value_path),
        ..Default::default()
    };
    value
        .insert(db)
        .await
        .map_err(|e| Error::from_write("parameter value", e))
}

/// Replaces the fields of an existing parameter value.
pub async fn update_parameter_value<C: ConnectionTrait>(
    db: &C,
    value_id: i64,
    input: ParameterValueInput,
) -> Result<parameter_value::Model> {
    let existing = require_parameter_value(db, value_id).await?;
    let (owner, param_id, fields) = validate_input(db, input).await?;

    let mut value: parameter_value::ActiveModel = existing.into();
    value.product_id = Set(owner.product_id());
    value.category_id = Set(owner.category_id());
    value.param_id = Set(param_id);
    value.value_enum_id = Set(fields.value_enum_id);
    value.value_str = Set(fields.value_str);
    value.value_int = Set(fields.value_int);
    value.value_real = Set(fields.value_real);
    value.value_path = Set(fields.value_path);
    value
        .update(db)
        .await
        .map_err(|e| Error::from_write("parameter value", e))
}

/// Deletes a parameter value.
pub async fn delete_parameter_value<C: ConnectionTrait>(db: &C, value_id: i64) -> Result<()> {
    let result = ParameterValue::delete_by_id(value_id)
        .exec(db)
        .await
        .map_err(|e| Error::from_write("parameter value", e))?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "parameter value",
            id: value_id,
        });
    }
    Ok(())
}
