//! Parameter aggregate business logic - Grouping parameters under a parent parameter.

use crate::{
    core::{
        category::as_choice,
        parameter::{ids_with_name_like, require_parameter},
    },
    entities::{ParameterAggregate, parameter_aggregate},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Submitted fields of an aggregate link
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggregateInput {
    /// The grouping parameter
    pub parent_param_id: i64,
    /// The grouped parameter
    pub param_id: i64,
}

/// List filters for aggregate links
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateFilter {
    /// Only links of this parent
    pub parent_param_id: Option<i64>,
    /// Substring of the parent or child parameter name
    pub search: Option<String>,
}

/// Lists aggregate links ordered by id.
pub async fn list_aggregates<C: ConnectionTrait>(
    db: &C,
    filter: &AggregateFilter,
) -> Result<Vec<parameter_aggregate::Model>> {
    let mut query = ParameterAggregate::find();
    if let Some(parent_param_id) = filter.parent_param_id {
        query = query.filter(parameter_aggregate::Column::ParentParamId.eq(parent_param_id));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let params = ids_with_name_like(db, term).await?;
        query = query.filter(
            Condition::any()
                .add(parameter_aggregate::Column::ParentParamId.is_in(params.clone()))
                .add(parameter_aggregate::Column::ParamId.is_in(params)),
        );
    }
    query
        .order_by_asc(parameter_aggregate::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Ids of the parameters grouped under `parent_param_id`.
pub async fn child_param_ids<C: ConnectionTrait>(db: &C, parent_param_id: i64) -> Result<Vec<i64>> {
    ParameterAggregate::find()
        .select_only()
        .column(parameter_aggregate::Column::ParamId)
        .filter(parameter_aggregate::Column::ParentParamId.eq(parent_param_id))
        .order_by_asc(parameter_aggregate::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an aggregate link by id.
pub async fn get_aggregate_by_id<C: ConnectionTrait>(
    db: &C,
    aggregate_id: i64,
) -> Result<Option<parameter_aggregate::Model>> {
    ParameterAggregate::find_by_id(aggregate_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an aggregate link by id, failing with [`Error::NotFound`] when missing.
pub async fn require_aggregate<C: ConnectionTrait>(
    db: &C,
    aggregate_id: i64,
) -> Result<parameter_aggregate::Model> {
    get_aggregate_by_id(db, aggregate_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "parameter aggregate",
            id: aggregate_id,
        })
}

async fn validate_input<C: ConnectionTrait>(db: &C, input: AggregateInput) -> Result<()> {
    if input.parent_param_id == input.param_id {
        return Err(Error::validation("A parameter cannot aggregate itself"));
    }
    as_choice(
        "parent_param_id",
        require_parameter(db, input.parent_param_id).await,
    )?;
    as_choice("param_id", require_parameter(db, input.param_id).await)?;
    Ok(())
}

/// Links `param_id` under `parent_param_id`.
///
/// # Errors
/// Returns an error if either parameter is missing, both are the same, or the link exists.
pub async fn create_aggregate<C: ConnectionTrait>(
    db: &C,
    input: AggregateInput,
) -> Result<parameter_aggregate::Model> {
    validate_input(db, input).await?;
    let aggregate = parameter_aggregate::ActiveModel {
        parent_param_id: Set(input.parent_param_id),
        param_id: Set(input.param_id),
        ..Default::default()
    };
    let created = aggregate
        .insert(db)
        .await
        .map_err(|e| Error::from_write("parameter aggregate", e))?;
    debug!(
        parent = created.parent_param_id,
        param = created.param_id,
        "Linked aggregate parameter"
    );
    Ok(created)
}

/// Replaces both ends of an existing aggregate link.
pub async fn update_aggregate<C: ConnectionTrait>(
    db: &C,
    aggregate_id: i64,
    input: AggregateInput,
) -> Result<parameter_aggregate::Model> {
    let existing = require_aggregate(db, aggregate_id).await?;
    validate_input(db, input).await?;

    let mut aggregate: parameter_aggregate::ActiveModel = existing.into();
    aggregate.parent_param_id = Set(input.parent_param_id);
    aggregate.param_id = Set(input.param_id);
    aggregate
        .update(db)
        .await
        .map_err(|e| Error::from_write("parameter aggregate", e))
}

/// Deletes an aggregate link.
pub async fn delete_aggregate<C: ConnectionTrait>(db: &C, aggregate_id: i64) -> Result<()> {
    let result = ParameterAggregate::delete_by_id(aggregate_id)
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "parameter aggregate",
            id: aggregate_id,
        });
    }
    Ok(())
}
