//! Product business logic - Catalog items filed under taxonomy categories.
//!
//! Product names are unique within their category. Prices are stored rounded to cents.

use crate::{
    core::{
        category::{as_choice, require_category},
        validation::{NAME_MAX_LEN, required_text},
    },
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Submitted fields of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    /// Category the product is filed under
    pub category_id: i64,
    /// Name, unique within the category
    pub name: String,
    /// Quantity in stock
    #[serde(default)]
    pub amount: i32,
    /// Unit price
    pub price: f64,
}

/// List filters for products
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Only products of this category
    pub category_id: Option<i64>,
    /// Substring of the name
    pub search: Option<String>,
}

/// Checks the price is finite and non-negative and rounds it to cents.
pub fn normalize_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::validation(format!(
            "`price` must be a non-negative number, got {price}"
        )));
    }
    Ok((price * 100.0).round() / 100.0)
}

/// Lists products ordered by category, then name.
pub async fn list_products<C: ConnectionTrait>(
    db: &C,
    filter: &ProductFilter,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find();
    if let Some(category_id) = filter.category_id {
        query = query.filter(product::Column::CategoryId.eq(category_id));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(product::Column::Name.contains(term));
    }
    query
        .order_by_asc(product::Column::CategoryId)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the products of any of `category_ids`, ordered by id.
pub async fn list_products_in<C: ConnectionTrait>(
    db: &C,
    category_ids: &[i64],
) -> Result<Vec<product::Model>> {
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }
    Product::find()
        .filter(product::Column::CategoryId.is_in(category_ids.iter().copied()))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by id.
pub async fn get_product_by_id<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by id, failing with [`Error::NotFound`] when missing.
pub async fn require_product<C: ConnectionTrait>(db: &C, product_id: i64) -> Result<product::Model> {
    get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}

/// Finds a product of `category_id` by name.
pub async fn get_product_by_name<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn validate_input<C: ConnectionTrait>(db: &C, input: ProductInput) -> Result<ProductInput> {
    let name = required_text("name", &input.name, NAME_MAX_LEN)?;
    let price = normalize_price(input.price)?;
    as_choice("category_id", require_category(db, input.category_id).await)?;
    Ok(ProductInput {
        name,
        price,
        ..input
    })
}

/// Creates a new product.
///
/// # Errors
/// Returns an error if:
/// - The name is blank or too long, or already used in the category
/// - The price is negative or not finite (NaN, infinity)
/// - The category does not exist
pub async fn create_product<C: ConnectionTrait>(
    db: &C,
    input: ProductInput,
) -> Result<product::Model> {
    let input = validate_input(db, input).await?;
    let product = product::ActiveModel {
        category_id: Set(input.category_id),
        name: Set(input.name),
        amount: Set(input.amount),
        price: Set(input.price),
        ..Default::default()
    };
    product
        .insert(db)
        .await
        .map_err(|e| Error::from_write("product", e))
}

/// Replaces the fields of an existing product.
pub async fn update_product<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let existing = require_product(db, product_id).await?;
    let input = validate_input(db, input).await?;

    let mut product: product::ActiveModel = existing.into();
    product.category_id = Set(input.category_id);
    product.name = Set(input.name);
    product.amount = Set(input.amount);
    product.price = Set(input.price);
    product
        .update(db)
        .await
        .map_err(|e| Error::from_write("product", e))
}

/// Deletes a product together with its own parameter values.
pub async fn delete_product<C: ConnectionTrait>(db: &C, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id)
        .exec(db)
        .await
        .map_err(|e| Error::from_write("product", e))?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "product",
            id: product_id,
        });
    }
    Ok(())
}
