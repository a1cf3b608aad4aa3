//! Category business logic - Creating, editing and listing catalog tree nodes.
//!
//! Besides the field checks, every write keeps the tree well-formed: parents must be
//! taxonomy (non-enum) categories, an enum category never sits under another enum
//! category, and a category can never be moved below itself.

use crate::{
    core::{
        measure,
        tree::load_category_tree,
        validation::{NAME_MAX_LEN, check_category_parent, required_text},
    },
    entities::{Category, EnumValue, Parameter, category, enum_value, parameter},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Submitted fields of a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    /// Unique name
    pub name: String,
    /// Parent category, None for a root
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Whether the category is an enumeration
    #[serde(default)]
    pub is_enum: bool,
    /// Default measure
    pub measure_id: i64,
}

/// List filters for categories
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFilter {
    /// Only enum (or only taxonomy) categories
    pub is_enum: Option<bool>,
    /// Only direct children of this category
    pub parent_id: Option<i64>,
    /// Substring of the name
    pub search: Option<String>,
}

/// Lists categories ordered by name.
pub async fn list_categories<C: ConnectionTrait>(
    db: &C,
    filter: &CategoryFilter,
) -> Result<Vec<category::Model>> {
    let mut query = Category::find();
    if let Some(is_enum) = filter.is_enum {
        query = query.filter(category::Column::IsEnum.eq(is_enum));
    }
    if let Some(parent_id) = filter.parent_id {
        query = query.filter(category::Column::ParentId.eq(parent_id));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(category::Column::Name.contains(term));
    }
    query
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Categories that may be chosen as a parent: every taxonomy (non-enum) category.
pub async fn parent_choices<C: ConnectionTrait>(db: &C) -> Result<Vec<category::Model>> {
    list_categories(
        db,
        &CategoryFilter {
            is_enum: Some(false),
            ..Default::default()
        },
    )
    .await
}

/// Retrieves a category by id.
pub async fn get_category_by_id<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a category by id, failing with [`Error::NotFound`] when missing.
pub async fn require_category<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
) -> Result<category::Model> {
    get_category_by_id(db, category_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "category",
            id: category_id,
        })
}

/// Finds a category by its unique name.
pub async fn get_category_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves a referenced row, turning "not found" into an invalid selection on `field`.
pub(crate) fn as_choice<T>(field: &'static str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        Error::NotFound { entity, id } => {
            Error::invalid_choice(field, format!("{entity} {id} does not exist"))
        }
        other => other,
    })
}

/// Validates the input and loads the referenced parent.
async fn validate_input<C: ConnectionTrait>(
    db: &C,
    input: &CategoryInput,
) -> Result<(String, Option<category::Model>)> {
    let name = required_text("name", &input.name, NAME_MAX_LEN)?;
    as_choice(
        "measure_id",
        measure::require_measure(db, input.measure_id).await,
    )?;

    let parent = match input.parent_id {
        Some(parent_id) => Some(as_choice("parent_id", require_category(db, parent_id).await)?),
        None => None,
    };
    check_category_parent(input.is_enum, parent.as_ref())?;
    Ok((name, parent))
}

/// Creates a new category.
///
/// # Errors
/// Returns an error if the name is blank, too long or taken, the measure or parent does
/// not exist, or the parent is not a taxonomy category.
pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    input: CategoryInput,
) -> Result<category::Model> {
    let (name, parent) = validate_input(db, &input).await?;

    let category = category::ActiveModel {
        parent_id: Set(parent.map(|p| p.id)),
        is_enum: Set(input.is_enum),
        name: Set(name),
        measure_id: Set(input.measure_id),
        ..Default::default()
    };
    let created = category
        .insert(db)
        .await
        .map_err(|e| Error::from_write("category", e))?;
    info!(id = created.id, name = %created.name, is_enum = created.is_enum, "Created category");
    Ok(created)
}

/// Replaces the fields of an existing category.
///
/// # Errors
/// On top of the creation checks, fails if the new parent is the category itself or one
/// of its descendants, if a category with subcategories is turned into an enum, or if an
/// enum that still has values or enum parameters is turned into a taxonomy category.
pub async fn update_category<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
    input: CategoryInput,
) -> Result<category::Model> {
    let existing = require_category(db, category_id).await?;
    let (name, parent) = validate_input(db, &input).await?;

    if let Some(parent) = &parent {
        let tree = load_category_tree(db).await?;
        if tree.subtree_ids(category_id).contains(&parent.id) {
            return Err(Error::invalid_choice(
                "parent_id",
                format!(
                    "'{}' cannot be moved below itself or one of its subcategories",
                    existing.name
                ),
            ));
        }
    }

    if input.is_enum && !existing.is_enum {
        let children = Category::find()
            .filter(category::Column::ParentId.eq(category_id))
            .count(db)
            .await?;
        if children > 0 {
            return Err(Error::validation(format!(
                "'{}' has subcategories and cannot become an enum category",
                existing.name
            )));
        }
    }
    if !input.is_enum && existing.is_enum {
        let values = EnumValue::find()
            .filter(enum_value::Column::CategoryId.eq(category_id))
            .count(db)
            .await?;
        if values > 0 {
            return Err(Error::validation(format!(
                "'{}' still has enum values and must stay an enum category",
                existing.name
            )));
        }
        let parameters = Parameter::find()
            .filter(parameter::Column::EnumId.eq(category_id))
            .count(db)
            .await?;
        if parameters > 0 {
            return Err(Error::validation(format!(
                "'{}' is the value set of {} parameter(s) and must stay an enum category",
                existing.name, parameters
            )));
        }
    }

    let mut category: category::ActiveModel = existing.into();
    category.parent_id = Set(parent.map(|p| p.id));
    category.is_enum = Set(input.is_enum);
    category.name = Set(name);
    category.measure_id = Set(input.measure_id);
    category
        .update(db)
        .await
        .map_err(|e| Error::from_write("category", e))
}

/// Deletes a category together with its subcategories and category-level parameter values.
///
/// # Errors
/// Fails with [`Error::InUse`] while products, enum values or parameters still reference
/// the category or one of its subcategories.
pub async fn delete_category<C: ConnectionTrait>(db: &C, category_id: i64) -> Result<()> {
    let result = Category::delete_by_id(category_id)
        .exec(db)
        .await
        .map_err(|e| Error::from_write("category", e))?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "category",
            id: category_id,
        });
    }
    info!(id = category_id, "Deleted category");
    Ok(())
}
