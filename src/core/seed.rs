//! Applying a seed document to an empty catalog.
//!
//! Every row goes through the same validated `create_*` operations the admin API uses,
//! inside one database transaction. Names in the document are resolved to the ids of
//! rows created earlier in the same run.

use crate::{
    config::seed::{ParameterValueSeed, ProductRef, SeedConfig},
    core::{
        aggregate::{AggregateInput, create_aggregate},
        category::{CategoryInput, create_category},
        enum_value::{EnumValueInput, create_enum_value},
        measure::{MeasureInput, create_measure},
        parameter::{ParameterInput, create_parameter},
        parameter_value::{ParameterValueInput, create_parameter_value},
        product::{ProductInput, create_product},
        validation::ValueFields,
    },
    entities::{Measure, parameter},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

/// Number of rows created per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Measures created
    pub measures: usize,
    /// Categories created
    pub categories: usize,
    /// Enum values created
    pub enum_values: usize,
    /// Parameters created
    pub parameters: usize,
    /// Aggregate links created
    pub aggregates: usize,
    /// Products created
    pub products: usize,
    /// Parameter values created
    pub parameter_values: usize,
}

/// Ids of rows created so far, keyed by the names the document uses.
#[derive(Default)]
struct Names {
    measures: HashMap<String, i64>,
    categories: HashMap<String, i64>,
    enum_values: HashMap<(i64, String), i64>,
    parameters: HashMap<String, parameter::Model>,
    products: HashMap<ProductRef, i64>,
}

fn unknown(kind: &str, name: &str) -> Error {
    Error::Config {
        message: format!("Seed references unknown {kind} '{name}'"),
    }
}

impl Names {
    fn measure(&self, name_short: &str) -> Result<i64> {
        self.measures
            .get(name_short)
            .copied()
            .ok_or_else(|| unknown("measure", name_short))
    }

    fn category(&self, name: &str) -> Result<i64> {
        self.categories
            .get(name)
            .copied()
            .ok_or_else(|| unknown("category", name))
    }

    fn parameter(&self, name_short: &str) -> Result<&parameter::Model> {
        self.parameters
            .get(name_short)
            .ok_or_else(|| unknown("parameter", name_short))
    }

    fn product(&self, product: &ProductRef) -> Result<i64> {
        self.products.get(product).copied().ok_or_else(|| {
            unknown("product", &format!("{} / {}", product.category, product.name))
        })
    }
}

/// Seeds the catalog from `seed` unless it already has measures.
///
/// Returns whether anything was written. On failure the transaction is rolled back and
/// the error is logged and returned.
#[instrument(skip(db, seed))]
pub async fn seed_if_empty(db: &DatabaseConnection, seed: &SeedConfig) -> Result<bool> {
    let existing = Measure::find().count(db).await?;
    if existing > 0 {
        info!(existing, "Catalog already has data, skipping seed");
        return Ok(false);
    }

    let txn = db.begin().await?;
    let summary = match apply_seed(&txn, seed).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Failed to seed catalog: {}", e);
            txn.rollback().await?;
            return Err(e);
        }
    };
    txn.commit().await?;

    info!(?summary, "Seeded catalog");
    Ok(true)
}

/// Creates every row of `seed` in document order.
pub async fn apply_seed<C: ConnectionTrait>(db: &C, seed: &SeedConfig) -> Result<SeedSummary> {
    let mut names = Names::default();
    let mut summary = SeedSummary::default();

    for m in &seed.measures {
        let created = create_measure(
            db,
            MeasureInput {
                name: m.name.clone(),
                name_short: m.name_short.clone(),
            },
        )
        .await?;
        names.measures.insert(created.name_short, created.id);
        summary.measures += 1;
    }

    for c in &seed.categories {
        let parent_id = c.parent.as_deref().map(|p| names.category(p)).transpose()?;
        let created = create_category(
            db,
            CategoryInput {
                name: c.name.clone(),
                parent_id,
                is_enum: c.is_enum,
                measure_id: names.measure(&c.measure)?,
            },
        )
        .await?;
        names.categories.insert(created.name, created.id);
        summary.categories += 1;
    }

    for v in &seed.enum_values {
        let category_id = names.category(&v.category)?;
        let created = create_enum_value(
            db,
            EnumValueInput {
                category_id,
                code: v.code.clone(),
                priority: v.priority,
                value_str: v.value_str.clone(),
                value_int: v.value_int,
                value_real: v.value_real,
                value_path: v.value_path.clone(),
            },
        )
        .await?;
        names.enum_values.insert((category_id, created.code), created.id);
        summary.enum_values += 1;
    }

    for p in &seed.parameters {
        let measure_id = p.measure.as_deref().map(|m| names.measure(m)).transpose()?;
        let enum_id = p
            .enum_category
            .as_deref()
            .map(|c| names.category(c))
            .transpose()?;
        let created = create_parameter(
            db,
            ParameterInput {
                name: p.name.clone(),
                name_short: p.name_short.clone(),
                data_type: p.data_type,
                measure_id,
                enum_id,
                min_val: p.min_val,
                max_val: p.max_val,
            },
        )
        .await?;
        names.parameters.insert(created.name_short.clone(), created);
        summary.parameters += 1;
    }

    for a in &seed.aggregates {
        create_aggregate(
            db,
            AggregateInput {
                parent_param_id: names.parameter(&a.parent)?.id,
                param_id: names.parameter(&a.param)?.id,
            },
        )
        .await?;
        summary.aggregates += 1;
    }

    for p in &seed.products {
        let created = create_product(
            db,
            ProductInput {
                category_id: names.category(&p.category)?,
                name: p.name.clone(),
                amount: p.amount,
                price: p.price,
            },
        )
        .await?;
        names.products.insert(
            ProductRef {
                category: p.category.clone(),
                name: created.name,
            },
            created.id,
        );
        summary.products += 1;
    }

    for v in &seed.parameter_values {
        let input = parameter_value_input(&names, v)?;
        create_parameter_value(db, input).await?;
        summary.parameter_values += 1;
    }

    debug!(?summary, "Applied seed document");
    Ok(summary)
}

fn parameter_value_input(names: &Names, seed: &ParameterValueSeed) -> Result<ParameterValueInput> {
    let param = names.parameter(&seed.param)?;
    let value_enum_id = match (&seed.value_enum, param.enum_id) {
        (Some(code), Some(category_id)) => Some(
            names
                .enum_values
                .get(&(category_id, code.clone()))
                .copied()
                .ok_or_else(|| unknown("enum value", code))?,
        ),
        (Some(code), None) => return Err(unknown("enum value", code)),
        (None, _) => None,
    };

    Ok(ParameterValueInput {
        product_id: seed.product.as_ref().map(|p| names.product(p)).transpose()?,
        category_id: seed
            .category
            .as_deref()
            .map(|c| names.category(c))
            .transpose()?,
        param_id: param.id,
        value: ValueFields {
            value_enum_id,
            value_str: seed.value_str.clone(),
            value_int: seed.value_int,
            value_real: seed.value_real,
            value_path: seed.value_path.clone(),
        },
    })
}
