//! Enum value entity - Members of an enum category.
//!
//! Each value is identified by a short `code` within its category and stores exactly one
//! of a string, integer, real or path payload. `priority` orders values for display.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enum value database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enum_values")]
pub struct Model {
    /// Unique identifier for the enum value
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Enum category this value belongs to
    pub category_id: i64,
    /// Code unique within the category (e.g., "1", "BLACK")
    pub code: String,
    /// Display ordering, lower first
    pub priority: i16,
    /// String payload
    pub value_str: Option<String>,
    /// Integer payload
    pub value_int: Option<i64>,
    /// Real payload
    pub value_real: Option<f64>,
    /// File path payload (pictures, schemes)
    pub value_path: Option<String>,
}

/// Defines relationships between `EnumValue` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each enum value belongs to one enum category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
