//! Parameter aggregate entity - Declares that one parameter groups others.
//!
//! E.g. "Dimensions" aggregates "Length", "Width" and "Height".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameter aggregate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parameter_aggregates")]
pub struct Model {
    /// Unique identifier for the aggregate link
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The grouping parameter
    pub parent_param_id: i64,
    /// The grouped parameter
    pub param_id: i64,
}

/// Both ends of the link point at `parameters`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The grouping parameter
    #[sea_orm(
        belongs_to = "super::parameter::Entity",
        from = "Column::ParentParamId",
        to = "super::parameter::Column::Id",
        on_delete = "Cascade"
    )]
    ParentParam,
    /// The grouped parameter
    #[sea_orm(
        belongs_to = "super::parameter::Entity",
        from = "Column::ParamId",
        to = "super::parameter::Column::Id",
        on_delete = "Cascade"
    )]
    Param,
}

impl ActiveModelBehavior for ActiveModel {}
