//! Entity module - Contains all SeaORM entity definitions for the catalog database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod enum_value;
pub mod measure;
pub mod parameter;
pub mod parameter_aggregate;
pub mod parameter_value;
pub mod product;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use enum_value::{Column as EnumValueColumn, Entity as EnumValue, Model as EnumValueModel};
pub use measure::{Column as MeasureColumn, Entity as Measure, Model as MeasureModel};
pub use parameter::{
    Column as ParameterColumn, DataType, Entity as Parameter, Model as ParameterModel,
};
pub use parameter_aggregate::{
    Column as ParameterAggregateColumn, Entity as ParameterAggregate,
    Model as ParameterAggregateModel,
};
pub use parameter_value::{
    Column as ParameterValueColumn, Entity as ParameterValue, Model as ParameterValueModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
