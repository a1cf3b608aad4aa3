//! Parameter entity - Typed attribute definitions.
//!
//! A parameter declares a data type; enum parameters point at the enum category
//! whose values they may take.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared data type of a parameter, stored as its short code.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Whole number
    #[sea_orm(string_value = "int")]
    Int,
    /// Free text
    #[sea_orm(string_value = "str")]
    Str,
    /// Floating point number
    #[sea_orm(string_value = "real")]
    Real,
    /// One of the values of an enum category
    #[sea_orm(string_value = "enum")]
    Enum,
    /// File path
    #[sea_orm(string_value = "path")]
    Path,
}

impl DataType {
    /// Short code used in storage and reports.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Str => "str",
            Self::Real => "real",
            Self::Enum => "enum",
            Self::Path => "path",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parameter database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parameters")]
pub struct Model {
    /// Unique identifier for the parameter
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Measure of the parameter's values, if any
    pub measure_id: Option<i64>,
    /// Declared data type
    pub data_type: DataType,
    /// Enum category for `enum` parameters, None otherwise
    pub enum_id: Option<i64>,
    /// Human-readable name (e.g., "Length")
    pub name: String,
    /// Short code, unique across parameters (e.g., "l")
    #[sea_orm(unique)]
    pub name_short: String,
    /// Lower bound for numeric values
    pub min_val: Option<i64>,
    /// Upper bound for numeric values
    pub max_val: Option<i64>,
}

/// Defines relationships between Parameter and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each parameter may have a measure
    #[sea_orm(
        belongs_to = "super::measure::Entity",
        from = "Column::MeasureId",
        to = "super::measure::Column::Id",
        on_delete = "Restrict"
    )]
    Measure,
    /// Enum parameters reference their enum category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::EnumId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Enum,
    /// One parameter has many values
    #[sea_orm(has_many = "super::parameter_value::Entity")]
    Values,
}

impl Related<super::measure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measure.def()
    }
}

impl Related<super::parameter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Values.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
