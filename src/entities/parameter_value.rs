//! Parameter value entity - A parameter's value bound to a product or a category.
//!
//! Exactly one of `product_id` / `category_id` is set. A value keyed to a category is
//! inherited by the category's products unless a product carries its own value for the
//! same parameter. Exactly one of the value columns is set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameter value database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parameter_values")]
pub struct Model {
    /// Unique identifier for the parameter value
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning product, when the value is product-level
    pub product_id: Option<i64>,
    /// Owning category, when the value is category-level
    pub category_id: Option<i64>,
    /// Parameter this value is for
    pub param_id: i64,
    /// Selected enum value for `enum` parameters
    pub value_enum_id: Option<i64>,
    /// String value
    pub value_str: Option<String>,
    /// Integer value
    pub value_int: Option<i64>,
    /// Real value
    pub value_real: Option<f64>,
    /// Path value
    pub value_path: Option<String>,
}

/// Defines relationships between `ParameterValue` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Product-level values belong to a product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Category-level values belong to a category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    /// Each value is for one parameter
    #[sea_orm(
        belongs_to = "super::parameter::Entity",
        from = "Column::ParamId",
        to = "super::parameter::Column::Id",
        on_delete = "Cascade"
    )]
    Parameter,
    /// Enum values reference the selected member
    #[sea_orm(
        belongs_to = "super::enum_value::Entity",
        from = "Column::ValueEnumId",
        to = "super::enum_value::Column::Id",
        on_delete = "Restrict"
    )]
    EnumValue,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::parameter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parameter.def()
    }
}

impl Related<super::enum_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnumValue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
