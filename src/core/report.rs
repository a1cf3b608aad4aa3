//! Report generation business logic.
//!
//! Reports read a fresh snapshot of the tables they need and return structured data;
//! rendering is left to the caller (the HTTP layer serializes them as JSON).

use crate::{
    core::{
        aggregate::child_param_ids,
        category::require_category,
        inheritance::{Origin, ResolvedValue, extract_value, resolve_product_parameters},
        parameter::require_parameter,
        parameter_value::values_for_product,
        product::{list_products, list_products_in, require_product},
        tree::{ClassifierLine, TreeEntry, load_category_tree},
    },
    entities::{
        Category, DataType, EnumValue, Measure, Parameter, Product, category, enum_value, measure,
        parameter, product,
    },
    errors::Result,
};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Message returned when a product has no parameter values of its own
pub const NO_PARAMETERS_MESSAGE: &str = "No parameters found for the selected product.";

/// One parameter of one product, flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductParameterRow {
    /// Category of the product
    pub category_id: i64,
    /// Category name
    pub category_name: String,
    /// Product id
    pub product_id: i64,
    /// Product name
    pub product_name: String,
    /// Quantity in stock
    pub amount: i32,
    /// Short name of the category's measure
    pub measure: String,
    /// Unit price
    pub price: f64,
    /// Parameter id
    pub param_id: i64,
    /// Parameter short name
    pub param_name: String,
    /// Parameter data type
    pub param_type: DataType,
    /// Extracted value, if the expected column is set
    pub value: Option<String>,
    /// Short name of the parameter's measure, empty when it has none
    pub param_measure: String,
    /// Product or category level
    pub origin: Origin,
}

/// Descendant categories of a category and the products filed under them.
#[derive(Debug, Clone, Serialize)]
pub struct DescendantsReport {
    /// The selected category
    pub category: category::Model,
    /// Every category below it, in tree preorder
    pub descendants: Vec<category::Model>,
    /// Products of the descendant categories
    pub products: Vec<product::Model>,
}

/// A category with a list of related tree entries.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryChainReport {
    /// The selected category
    pub category: category::Model,
    /// Ancestors (root first) or terminals, depending on the report
    pub entries: Vec<TreeEntry>,
}

/// Parameter rows for a product or a category subtree.
#[derive(Debug, Clone, Serialize)]
pub struct ProductParamsReport {
    /// The selected product
    pub product: product::Model,
    /// One row per own parameter value
    pub rows: Vec<ProductParameterRow>,
    /// Set when there are no rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Rows of products for the children of one aggregate parameter.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateParamsReport {
    /// The grouping parameter
    pub parent: parameter::Model,
    /// Matching rows of all products
    pub rows: Vec<ProductParameterRow>,
}

/// Lookup tables shared by the row builders.
struct RowContext {
    categories: HashMap<i64, category::Model>,
    measures: HashMap<i64, measure::Model>,
    parameters: HashMap<i64, parameter::Model>,
    enum_values: HashMap<i64, enum_value::Model>,
}

impl RowContext {
    async fn load<C: ConnectionTrait>(db: &C) -> Result<Self> {
        let categories = Category::find().all(db).await?;
        let measures = Measure::find().all(db).await?;
        let parameters = Parameter::find().all(db).await?;
        let enum_values = EnumValue::find().all(db).await?;
        Ok(Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            measures: measures.into_iter().map(|m| (m.id, m)).collect(),
            parameters: parameters.into_iter().map(|p| (p.id, p)).collect(),
            enum_values: enum_values.into_iter().map(|e| (e.id, e)).collect(),
        })
    }

    fn measure_short(&self, measure_id: Option<i64>) -> String {
        measure_id
            .and_then(|id| self.measures.get(&id))
            .map(|m| m.name_short.clone())
            .unwrap_or_default()
    }

    fn row(&self, product: &product::Model, resolved: &ResolvedValue) -> Option<ProductParameterRow> {
        let param = self.parameters.get(&resolved.value.param_id)?;
        let category = self.categories.get(&product.category_id);
        let enum_value = resolved
            .value
            .value_enum_id
            .and_then(|id| self.enum_values.get(&id));

        Some(ProductParameterRow {
            category_id: product.category_id,
            category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
            product_id: product.id,
            product_name: product.name.clone(),
            amount: product.amount,
            measure: self.measure_short(category.map(|c| c.measure_id)),
            price: product.price,
            param_id: param.id,
            param_name: param.name_short.clone(),
            param_type: param.data_type,
            value: extract_value(param, &resolved.value, enum_value),
            param_measure: self.measure_short(param.measure_id),
            origin: resolved.origin,
        })
    }

    async fn rows_for<C: ConnectionTrait>(
        &self,
        db: &C,
        products: &[product::Model],
    ) -> Result<Vec<ProductParameterRow>> {
        let mut rows = Vec::new();
        for product in products {
            let resolved = resolve_product_parameters(db, product).await?;
            rows.extend(resolved.iter().filter_map(|r| self.row(product, r)));
        }
        Ok(rows)
    }
}

/// The taxonomy with products as a numbered, indented listing.
pub async fn classifier<C: ConnectionTrait>(db: &C) -> Result<Vec<ClassifierLine>> {
    let tree = load_category_tree(db).await?;
    let products = list_products(db, &Default::default()).await?;
    Ok(tree.classifier(&products))
}

/// Categories below `category_id` and their products.
pub async fn descendants<C: ConnectionTrait>(db: &C, category_id: i64) -> Result<DescendantsReport> {
    let category = require_category(db, category_id).await?;
    let tree = load_category_tree(db).await?;
    let descendants: Vec<category::Model> =
        tree.descendants(category_id).into_iter().cloned().collect();
    let ids: Vec<i64> = descendants.iter().map(|c| c.id).collect();
    let products = list_products_in(db, &ids).await?;
    Ok(DescendantsReport {
        category,
        descendants,
        products,
    })
}

/// The ancestor chain of `category_id`, root first.
pub async fn parents<C: ConnectionTrait>(db: &C, category_id: i64) -> Result<CategoryChainReport> {
    let category = require_category(db, category_id).await?;
    let tree = load_category_tree(db).await?;
    Ok(CategoryChainReport {
        entries: tree.ancestors(category_id),
        category,
    })
}

/// Leaf categories under `category_id` with their depth below it.
pub async fn terminals<C: ConnectionTrait>(db: &C, category_id: i64) -> Result<CategoryChainReport> {
    let category = require_category(db, category_id).await?;
    let tree = load_category_tree(db).await?;
    Ok(CategoryChainReport {
        entries: tree.terminals(category_id),
        category,
    })
}

/// Parameter rows for every product in `category_id` or any category below it.
pub async fn products_with_params<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
) -> Result<Vec<ProductParameterRow>> {
    require_category(db, category_id).await?;
    let tree = load_category_tree(db).await?;
    let products = list_products_in(db, &tree.subtree_ids(category_id)).await?;
    let context = RowContext::load(db).await?;
    let rows = context.rows_for(db, &products).await?;
    debug!(category_id, products = products.len(), rows = rows.len(), "Built parameter rows");
    Ok(rows)
}

/// Parameter rows for every product.
pub async fn all_products_with_params<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<ProductParameterRow>> {
    let products = Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    let context = RowContext::load(db).await?;
    context.rows_for(db, &products).await
}

/// The product's own parameter values; inherited values are not included.
pub async fn product_params<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
) -> Result<ProductParamsReport> {
    let product = require_product(db, product_id).await?;
    let context = RowContext::load(db).await?;
    let rows: Vec<ProductParameterRow> = values_for_product(db, product_id)
        .await?
        .into_iter()
        .map(|value| ResolvedValue {
            value,
            origin: Origin::Direct,
        })
        .filter_map(|resolved| context.row(&product, &resolved))
        .collect();

    let message = rows.is_empty().then(|| NO_PARAMETERS_MESSAGE.to_string());
    Ok(ProductParamsReport {
        product,
        rows,
        message,
    })
}

/// Rows of all products restricted to the children of `parent_param_id`.
pub async fn aggregate_params<C: ConnectionTrait>(
    db: &C,
    parent_param_id: i64,
) -> Result<AggregateParamsReport> {
    let parent = require_parameter(db, parent_param_id).await?;
    let children: HashSet<i64> = child_param_ids(db, parent_param_id)
        .await?
        .into_iter()
        .collect();
    let rows = if children.is_empty() {
        Vec::new()
    } else {
        all_products_with_params(db)
            .await?
            .into_iter()
            .filter(|row| children.contains(&row.param_id))
            .collect()
    };
    Ok(AggregateParamsReport { parent, rows })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{
            aggregate::{AggregateInput, create_aggregate},
            validation::{Owner, ValueFields},
        },
        errors::Error,
        test_utils::*,
    };
    use sea_orm::DatabaseConnection;

    fn int(i: i64) -> ValueFields {
        ValueFields {
            value_int: Some(i),
            ..Default::default()
        }
    }

    struct Fixture {
        db: DatabaseConnection,
        fasteners: category::Model,
        anchors: category::Model,
        dowels: category::Model,
        bolt: product::Model,
        dowel: product::Model,
        dims: parameter::Model,
        length: parameter::Model,
        width: parameter::Model,
    }

    /// Fasteners > Anchors (bolt), Fasteners > Dowels (dowel), plus a Material enum.
    async fn fixture() -> Result<Fixture> {
        let (db, measure) = setup_with_measure().await?;
        let fasteners = create_test_category(&db, "Fasteners", None, measure.id).await?;
        let anchors = create_test_category(&db, "Anchors", Some(fasteners.id), measure.id).await?;
        let dowels = create_test_category(&db, "Dowels", Some(fasteners.id), measure.id).await?;
        create_test_enum_category(&db, "Material", Some(fasteners.id), measure.id).await?;
        let bolt = create_test_product(&db, "Anchor bolt", anchors.id).await?;
        let dowel = create_test_product(&db, "Frame dowel", dowels.id).await?;

        let dims = create_test_parameter(&db, "-", DataType::Str, None).await?;
        let length = create_test_parameter(&db, "l", DataType::Int, None).await?;
        let width = create_test_parameter(&db, "w", DataType::Int, None).await?;
        for child in [&length, &width] {
            create_aggregate(
                &db,
                AggregateInput {
                    parent_param_id: dims.id,
                    param_id: child.id,
                },
            )
            .await?;
        }

        create_test_value(&db, Owner::Category(anchors.id), length.id, int(50)).await?;
        create_test_value(&db, Owner::Category(anchors.id), width.id, int(8)).await?;
        create_test_value(&db, Owner::Product(bolt.id), length.id, int(60)).await?;
        create_test_value(
            &db,
            Owner::Product(bolt.id),
            dims.id,
            ValueFields {
                value_str: Some("10x60".to_string()),
                ..Default::default()
            },
        )
        .await?;
        create_test_value(&db, Owner::Product(dowel.id), width.id, int(10)).await?;

        Ok(Fixture {
            db,
            fasteners,
            anchors,
            dowels,
            bolt,
            dowel,
            dims,
            length,
            width,
        })
    }

    #[tokio::test]
    async fn test_classifier_skips_enum_categories() -> Result<()> {
        let f = fixture().await?;
        let lines = classifier(&f.db).await?;
        let rendered: Vec<(usize, &str, usize)> = lines
            .iter()
            .map(|l| (l.id, l.name.as_str(), l.level))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (1, "Fasteners", 0),
                (2, "Anchors", 1),
                (3, "Anchor bolt", 2),
                (4, "Dowels", 1),
                (5, "Frame dowel", 2),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_descendants_report() -> Result<()> {
        let f = fixture().await?;
        let report = descendants(&f.db, f.fasteners.id).await?;
        assert_eq!(report.descendants.len(), 3);
        assert_eq!(report.products, vec![f.bolt.clone(), f.dowel.clone()]);

        let leaf = descendants(&f.db, f.anchors.id).await?;
        assert!(leaf.descendants.is_empty());
        assert!(leaf.products.is_empty());

        assert!(matches!(
            descendants(&f.db, 999).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_parents_and_terminals_reports() -> Result<()> {
        let f = fixture().await?;
        let chain = parents(&f.db, f.anchors.id).await?;
        assert_eq!(chain.entries.len(), 1);
        assert_eq!(chain.entries[0].category.id, f.fasteners.id);
        assert_eq!(chain.entries[0].depth, 1);

        let leaves = terminals(&f.db, f.fasteners.id).await?;
        let ids: Vec<i64> = leaves.entries.iter().map(|e| e.category.id).collect();
        assert!(ids.contains(&f.anchors.id));
        assert!(ids.contains(&f.dowels.id));
        assert!(leaves.entries.iter().all(|e| e.depth == 1));

        let own = terminals(&f.db, f.anchors.id).await?;
        assert_eq!(own.entries.len(), 1);
        assert_eq!(own.entries[0].depth, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_products_with_params_applies_inheritance() -> Result<()> {
        let f = fixture().await?;
        let rows = products_with_params(&f.db, f.anchors.id).await?;
        let summary: Vec<(&str, Option<&str>, Origin)> = rows
            .iter()
            .map(|r| (r.param_name.as_str(), r.value.as_deref(), r.origin))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("l", Some("60"), Origin::Direct),
                ("-", Some("10x60"), Origin::Direct),
                ("w", Some("8"), Origin::Inherited),
            ]
        );
        assert!(rows.iter().all(|r| r.product_id == f.bolt.id));
        assert_eq!(rows[0].measure, "pcs");
        assert_eq!(rows[0].param_measure, "");
        assert_eq!(rows[0].category_name, "Anchors");

        let whole_tree = products_with_params(&f.db, f.fasteners.id).await?;
        assert_eq!(whole_tree.len(), 4);
        assert_eq!(whole_tree, all_products_with_params(&f.db).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_product_params_only_direct() -> Result<()> {
        let f = fixture().await?;
        let report = product_params(&f.db, f.bolt.id).await?;
        assert_eq!(report.rows.len(), 2);
        assert!(report.message.is_none());

        let plain = create_test_product(&f.db, "Plain bolt", f.anchors.id).await?;
        let empty = product_params(&f.db, plain.id).await?;
        assert!(empty.rows.is_empty());
        assert_eq!(empty.message.as_deref(), Some(NO_PARAMETERS_MESSAGE));
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_params_report() -> Result<()> {
        let f = fixture().await?;
        let report = aggregate_params(&f.db, f.dims.id).await?;
        let summary: Vec<(i64, i64, Option<&str>)> = report
            .rows
            .iter()
            .map(|r| (r.product_id, r.param_id, r.value.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (f.bolt.id, f.length.id, Some("60")),
                (f.bolt.id, f.width.id, Some("8")),
                (f.dowel.id, f.width.id, Some("10")),
            ]
        );

        // A parameter without children yields no rows
        assert!(aggregate_params(&f.db, f.length.id).await?.rows.is_empty());
        assert!(matches!(
            aggregate_params(&f.db, 999).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }
}
