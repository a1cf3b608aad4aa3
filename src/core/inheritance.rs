//! Parameter inheritance - Which values apply to a product.
//!
//! A product uses its own values plus the values of its category for every parameter it
//! does not set itself. Only the product's direct category contributes.

use crate::{
    core::{
        enum_value::{display_value, format_real},
        parameter_value::{values_for_category, values_for_product},
    },
    entities::{DataType, enum_value, parameter, parameter_value, product},
    errors::Result,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::collections::HashSet;

/// Where a resolved value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Attached to the product
    Direct,
    /// Attached to the product's category
    Inherited,
}

/// A parameter value that applies to a product
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    /// The stored value row
    pub value: parameter_value::Model,
    /// Product or category level
    pub origin: Origin,
}

/// Merges product-level and category-level values.
///
/// Direct values come first; a category value is dropped when the product already has
/// a value for the same parameter.
#[must_use]
pub fn merge_parameter_values(
    direct: Vec<parameter_value::Model>,
    inherited: Vec<parameter_value::Model>,
) -> Vec<ResolvedValue> {
    let overridden: HashSet<i64> = direct.iter().map(|v| v.param_id).collect();
    let mut resolved: Vec<ResolvedValue> = direct
        .into_iter()
        .map(|value| ResolvedValue {
            value,
            origin: Origin::Direct,
        })
        .collect();
    resolved.extend(
        inherited
            .into_iter()
            .filter(|v| !overridden.contains(&v.param_id))
            .map(|value| ResolvedValue {
                value,
                origin: Origin::Inherited,
            }),
    );
    resolved
}

/// Reads the column matching the parameter's data type.
///
/// For enum parameters `enum_value` is the referenced member; its displayed payload is
/// returned. `None` when the expected column is empty.
#[must_use]
pub fn extract_value(
    param: &parameter::Model,
    value: &parameter_value::Model,
    enum_value: Option<&enum_value::Model>,
) -> Option<String> {
    match param.data_type {
        DataType::Int => value.value_int.map(|i| i.to_string()),
        DataType::Real => value.value_real.map(format_real),
        DataType::Str => value.value_str.clone(),
        DataType::Path => value.value_path.clone(),
        DataType::Enum => enum_value
            .filter(|ev| Some(ev.id) == value.value_enum_id)
            .and_then(display_value),
    }
}

/// Loads the values that apply to `product`, direct first, each group in id order.
pub async fn resolve_product_parameters<C: ConnectionTrait>(
    db: &C,
    product: &product::Model,
) -> Result<Vec<ResolvedValue>> {
    let direct = values_for_product(db, product.id).await?;
    let inherited = values_for_category(db, product.category_id).await?;
    Ok(merge_parameter_values(direct, inherited))
}
