//! Write-time invariant checks shared by the entity modules.
//!
//! Everything here is pure: callers load the referenced rows first and pass them in.
//! Raw form-like input is turned into typed values ([`Owner`], [`ParamValue`]) so the
//! "exactly one field" rules are enforced once, before anything is persisted.

use crate::{
    entities::{DataType, category, enum_value, parameter},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Maximum length of names of categories, products and parameters
pub const NAME_MAX_LEN: usize = 128;
/// Maximum length of a measure's full name
pub const MEASURE_NAME_MAX_LEN: usize = 64;
/// Maximum length of a measure's short code
pub const MEASURE_SHORT_MAX_LEN: usize = 16;
/// Maximum length of parameter short codes and enum value codes
pub const CODE_MAX_LEN: usize = 8;
/// Maximum length of string and path values
pub const VALUE_MAX_LEN: usize = 128;

/// Trims a required text field and checks it is non-blank and within `max_len` characters.
pub fn required_text(field: &'static str, value: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("`{field}` cannot be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(Error::validation(format!(
            "`{field}` must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank input counts as not set.
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>> {
    match value {
        Some(v) if !v.trim().is_empty() => required_text(field, &v, max_len).map(Some),
        _ => Ok(None),
    }
}

/// Owner of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Owner {
    /// Product-level value
    Product(i64),
    /// Category-level value, inherited by the category's products
    Category(i64),
}

impl Owner {
    /// Product id, if product-level.
    #[must_use]
    pub const fn product_id(self) -> Option<i64> {
        match self {
            Self::Product(id) => Some(id),
            Self::Category(_) => None,
        }
    }

    /// Category id, if category-level.
    #[must_use]
    pub const fn category_id(self) -> Option<i64> {
        match self {
            Self::Category(id) => Some(id),
            Self::Product(_) => None,
        }
    }
}

/// Requires exactly one of product / category to be set.
pub fn exactly_one_owner(product_id: Option<i64>, category_id: Option<i64>) -> Result<Owner> {
    match (product_id, category_id) {
        (Some(id), None) => Ok(Owner::Product(id)),
        (None, Some(id)) => Ok(Owner::Category(id)),
        _ => Err(Error::validation(
            "Exactly one of `product_id` and `category_id` must be set",
        )),
    }
}

/// Raw value columns as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueFields {
    /// Selected enum value (parameter values only)
    #[serde(default)]
    pub value_enum_id: Option<i64>,
    /// String value
    #[serde(default)]
    pub value_str: Option<String>,
    /// Integer value
    #[serde(default)]
    pub value_int: Option<i64>,
    /// Real value
    #[serde(default)]
    pub value_real: Option<f64>,
    /// Path value
    #[serde(default)]
    pub value_path: Option<String>,
}

/// A single validated value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Reference to an enum value
    Enum(i64),
    /// Text
    Str(String),
    /// Whole number
    Int(i64),
    /// Finite floating point number
    Real(f64),
    /// File path
    Path(String),
}

impl ParamValue {
    /// Data type this value satisfies.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Enum(_) => DataType::Enum,
            Self::Str(_) => DataType::Str,
            Self::Int(_) => DataType::Int,
            Self::Real(_) => DataType::Real,
            Self::Path(_) => DataType::Path,
        }
    }

    /// Splits the value back into storage columns.
    #[must_use]
    pub fn into_fields(self) -> ValueFields {
        let mut fields = ValueFields::default();
        match self {
            Self::Enum(id) => fields.value_enum_id = Some(id),
            Self::Str(s) => fields.value_str = Some(s),
            Self::Int(i) => fields.value_int = Some(i),
            Self::Real(r) => fields.value_real = Some(r),
            Self::Path(p) => fields.value_path = Some(p),
        }
        fields
    }
}

/// Requires exactly one value column to be set and returns it typed.
///
/// Blank strings count as not set. Reals must be finite.
pub fn exactly_one_value(fields: ValueFields) -> Result<ParamValue> {
    let value_str = optional_text("value_str", fields.value_str, VALUE_MAX_LEN)?;
    let value_path = optional_text("value_path", fields.value_path, VALUE_MAX_LEN)?;

    let mut values = Vec::with_capacity(1);
    if let Some(id) = fields.value_enum_id {
        values.push(ParamValue::Enum(id));
    }
    if let Some(s) = value_str {
        values.push(ParamValue::Str(s));
    }
    if let Some(i) = fields.value_int {
        values.push(ParamValue::Int(i));
    }
    if let Some(r) = fields.value_real {
        if !r.is_finite() {
            return Err(Error::validation("`value_real` must be a finite number"));
        }
        values.push(ParamValue::Real(r));
    }
    if let Some(p) = value_path {
        values.push(ParamValue::Path(p));
    }

    if values.len() != 1 {
        return Err(Error::validation("Exactly one value field must be set"));
    }
    values
        .pop()
        .ok_or_else(|| Error::validation("Exactly one value field must be set"))
}

/// Checks where a category may sit in the tree.
///
/// Only taxonomy (non-enum) categories are offered as parents; an enum category under
/// an enum parent gets its own message.
pub fn check_category_parent(is_enum: bool, parent: Option<&category::Model>) -> Result<()> {
    match parent {
        Some(parent) if parent.is_enum && is_enum => Err(Error::invalid_choice(
            "parent_id",
            format!(
                "An enum category cannot be a subcategory of the enum category '{}'",
                parent.name
            ),
        )),
        Some(parent) if parent.is_enum => Err(Error::invalid_choice(
            "parent_id",
            format!("'{}' is an enum category and cannot have subcategories", parent.name),
        )),
        _ => Ok(()),
    }
}

/// Checks that enum values are only added to enum categories.
pub fn check_enum_value_category(category: &category::Model) -> Result<()> {
    if category.is_enum {
        Ok(())
    } else {
        Err(Error::invalid_choice(
            "category_id",
            format!(
                "Values can only be added to enum categories; '{}' is not one",
                category.name
            ),
        ))
    }
}

/// Checks the data type / enum category pairing of a parameter.
pub fn check_parameter_enum(
    data_type: DataType,
    enum_category: Option<&category::Model>,
) -> Result<()> {
    match (data_type, enum_category) {
        (DataType::Enum, None) => Err(Error::validation(
            "Parameters of type 'enum' must reference an enum category",
        )),
        (DataType::Enum, Some(category)) if !category.is_enum => Err(Error::invalid_choice(
            "enum_id",
            format!("'{}' is not an enum category", category.name),
        )),
        (DataType::Enum, Some(_)) => Ok(()),
        (_, Some(_)) => Err(Error::validation(
            "Only parameters of type 'enum' may reference an enum category",
        )),
        (_, None) => Ok(()),
    }
}

/// Checks `min_val <= max_val` when both are set.
pub fn check_bounds(min_val: Option<i64>, max_val: Option<i64>) -> Result<()> {
    match (min_val, max_val) {
        (Some(min), Some(max)) if min > max => Err(Error::validation(format!(
            "`min_val` ({min}) cannot exceed `max_val` ({max})"
        ))),
        _ => Ok(()),
    }
}

/// Checks a validated value against the parameter it is for.
///
/// `enum_value` must be the row referenced by an enum value, when there is one.
#[allow(clippy::cast_precision_loss)]
pub fn check_value_for_parameter(
    param: &parameter::Model,
    value: &ParamValue,
    enum_value: Option<&enum_value::Model>,
) -> Result<()> {
    match (param.data_type, value) {
        (DataType::Enum, ParamValue::Enum(_)) => {}
        (DataType::Enum, _) => {
            return Err(Error::validation(format!(
                "Parameter '{}' is of type 'enum' and requires an enum value",
                param.name
            )));
        }
        (_, ParamValue::Enum(_)) => {
            return Err(Error::validation(
                "An enum value can only be set for parameters of type 'enum'",
            ));
        }
        (expected, given) if expected != given.data_type() => {
            return Err(Error::validation(format!(
                "Parameter '{}' expects a '{expected}' value, got '{}'",
                param.name,
                given.data_type()
            )));
        }
        _ => {}
    }

    if let ParamValue::Enum(id) = value {
        let member = enum_value.filter(|ev| ev.id == *id);
        let Some(member) = member else {
            return Err(Error::invalid_choice(
                "value_enum_id",
                format!("Enum value {id} does not exist"),
            ));
        };
        if param.enum_id != Some(member.category_id) {
            return Err(Error::invalid_choice(
                "value_enum_id",
                format!(
                    "Enum value '{}' does not belong to the enum of parameter '{}'",
                    member.code, param.name
                ),
            ));
        }
    }

    let numeric = match value {
        ParamValue::Int(i) => Some(*i as f64),
        ParamValue::Real(r) => Some(*r),
        _ => None,
    };
    if let Some(n) = numeric {
        if param.min_val.is_some_and(|min| n < min as f64)
            || param.max_val.is_some_and(|max| n > max as f64)
        {
            return Err(Error::validation(format!(
                "Value of parameter '{}' must be within [{}, {}]",
                param.name,
                param.min_val.map_or_else(|| "-inf".to_string(), |v| v.to_string()),
                param.max_val.map_or_else(|| "+inf".to_string(), |v| v.to_string()),
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn category(id: i64, name: &str, is_enum: bool) -> category::Model {
        category::Model {
            id,
            parent_id: None,
            is_enum,
            name: name.to_string(),
            measure_id: 1,
        }
    }

    fn parameter(data_type: DataType, enum_id: Option<i64>) -> parameter::Model {
        parameter::Model {
            id: 1,
            measure_id: None,
            data_type,
            enum_id,
            name: "Length".to_string(),
            name_short: "l".to_string(),
            min_val: None,
            max_val: None,
        }
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Bolt ", 10).unwrap(), "Bolt");
        assert!(matches!(
            required_text("name", "   ", 10),
            Err(Error::Validation { .. })
        ));
        assert!(required_text("code", "123456789", CODE_MAX_LEN).is_err());
    }

    #[test]
    fn test_exactly_one_owner() {
        assert_eq!(exactly_one_owner(Some(3), None).unwrap(), Owner::Product(3));
        assert_eq!(exactly_one_owner(None, Some(4)).unwrap(), Owner::Category(4));
        assert!(exactly_one_owner(None, None).is_err());
        assert!(exactly_one_owner(Some(1), Some(2)).is_err());
    }

    #[test]
    fn test_exactly_one_value() {
        let value = exactly_one_value(ValueFields {
            value_int: Some(0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value, ParamValue::Int(0));

        // Blank strings do not count
        let value = exactly_one_value(ValueFields {
            value_str: Some("  ".to_string()),
            value_path: Some("C:\\picture1.png".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value, ParamValue::Path("C:\\picture1.png".to_string()));

        assert!(exactly_one_value(ValueFields::default()).is_err());
        assert!(
            exactly_one_value(ValueFields {
                value_int: Some(1),
                value_real: Some(1.5),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            exactly_one_value(ValueFields {
                value_real: Some(f64::NAN),
                ..Default::default()
            })
            .is_err()
        );
    }

    #[test]
    fn test_into_fields_sets_one_column() {
        let fields = ParamValue::Str("Metal".to_string()).into_fields();
        assert_eq!(fields.value_str.as_deref(), Some("Metal"));
        assert!(fields.value_enum_id.is_none());
        assert!(fields.value_int.is_none());
        assert!(fields.value_real.is_none());
        assert!(fields.value_path.is_none());
    }

    #[test]
    fn test_enum_category_cannot_have_enum_parent() {
        let enum_parent = category(1, "Length", true);
        let taxonomy_parent = category(2, "Fasteners", false);

        assert!(matches!(
            check_category_parent(true, Some(&enum_parent)),
            Err(Error::InvalidChoice {
                field: "parent_id",
                ..
            })
        ));
        assert!(check_category_parent(false, Some(&enum_parent)).is_err());
        assert!(check_category_parent(true, Some(&taxonomy_parent)).is_ok());
        assert!(check_category_parent(true, None).is_ok());
    }

    #[test]
    fn test_check_parameter_enum() {
        let enum_category = category(5, "Material", true);
        let plain_category = category(6, "Anchors", false);

        assert!(check_parameter_enum(DataType::Enum, Some(&enum_category)).is_ok());
        assert!(check_parameter_enum(DataType::Enum, None).is_err());
        assert!(check_parameter_enum(DataType::Enum, Some(&plain_category)).is_err());
        assert!(check_parameter_enum(DataType::Int, Some(&enum_category)).is_err());
        assert!(check_parameter_enum(DataType::Int, None).is_ok());
    }

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(Some(1), Some(5)).is_ok());
        assert!(check_bounds(None, Some(5)).is_ok());
        assert!(check_bounds(Some(6), Some(5)).is_err());
    }

    #[test]
    fn test_value_must_match_declared_type() {
        let param = parameter(DataType::Int, None);
        assert!(check_value_for_parameter(&param, &ParamValue::Int(5), None).is_ok());
        assert!(check_value_for_parameter(&param, &ParamValue::Real(5.0), None).is_err());
        assert!(check_value_for_parameter(&param, &ParamValue::Enum(1), None).is_err());
    }

    #[test]
    fn test_enum_value_must_belong_to_parameter_enum() {
        let param = parameter(DataType::Enum, Some(7));
        let member = enum_value::Model {
            id: 11,
            category_id: 7,
            code: "1".to_string(),
            priority: 0,
            value_str: Some("Metal".to_string()),
            value_int: None,
            value_real: None,
            value_path: None,
        };
        let foreign = enum_value::Model {
            category_id: 8,
            ..member.clone()
        };

        assert!(check_value_for_parameter(&param, &ParamValue::Enum(11), Some(&member)).is_ok());
        assert!(matches!(
            check_value_for_parameter(&param, &ParamValue::Enum(11), Some(&foreign)),
            Err(Error::InvalidChoice { .. })
        ));
        assert!(check_value_for_parameter(&param, &ParamValue::Enum(11), None).is_err());
        assert!(check_value_for_parameter(&param, &ParamValue::Int(3), None).is_err());
    }

    #[test]
    fn test_numeric_bounds_are_enforced() {
        let param = parameter::Model {
            min_val: Some(0),
            max_val: Some(100),
            ..parameter(DataType::Int, None)
        };
        assert!(check_value_for_parameter(&param, &ParamValue::Int(100), None).is_ok());
        assert!(check_value_for_parameter(&param, &ParamValue::Int(101), None).is_err());
        assert!(check_value_for_parameter(&param, &ParamValue::Int(-1), None).is_err());
    }
}
