//! Category entity - Nodes of the catalog tree.
//!
//! A category either classifies products (a taxonomy node) or, when `is_enum` is set,
//! acts as a closed set of selectable values whose members live in `enum_values`.
//! The tree is expressed through the nullable self-reference `parent_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent category, None for roots
    pub parent_id: Option<i64>,
    /// Whether this category is an enumeration rather than a taxonomy node
    pub is_enum: bool,
    /// Category name, unique across the catalog
    #[sea_orm(unique)]
    pub name: String,
    /// Default measure for products of this category
    pub measure_id: i64,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category may have a parent category
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    /// Each category has a default measure
    #[sea_orm(
        belongs_to = "super::measure::Entity",
        from = "Column::MeasureId",
        to = "super::measure::Column::Id",
        on_delete = "Restrict"
    )]
    Measure,
    /// One category has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    /// One enum category has many enum values
    #[sea_orm(has_many = "super::enum_value::Entity")]
    EnumValues,
}

impl Related<super::measure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measure.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::enum_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnumValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
