//! Product entity - Catalog items.
//!
//! Every product belongs to one taxonomy category; names are unique within a category.
//! Parameter values may be attached to the product directly or inherited from its category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category the product is filed under
    pub category_id: i64,
    /// Name of the product, unique within its category
    pub name: String,
    /// Quantity in stock, in the category's measure
    pub amount: i32,
    /// Unit price, rounded to cents
    pub price: f64,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
    /// One product has many parameter values
    #[sea_orm(has_many = "super::parameter_value::Entity")]
    ParameterValues,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::parameter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParameterValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
