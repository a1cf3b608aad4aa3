//! Measure entity - Units of measurement (pieces, metres, kilograms, ...).
//!
//! Categories carry a default measure and parameters may carry one for their values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Measure database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "measures")]
pub struct Model {
    /// Unique identifier for the measure
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name (e.g., "Kilogram")
    pub name: String,
    /// Short code shown next to values (e.g., "kg"), unique across measures
    #[sea_orm(unique)]
    pub name_short: String,
}

/// Defines relationships between Measure and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One measure is the default for many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One measure is used by many parameters
    #[sea_orm(has_many = "super::parameter::Entity")]
    Parameters,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::parameter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parameters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
