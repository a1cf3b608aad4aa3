//! Catalog seed configuration loading from a TOML file.
//!
//! The seed file describes an initial catalog: measures, categories, enum values,
//! parameters, aggregates, products and parameter values. Rows reference each other
//! by name (or short name), never by id, so the file stays readable. Applying the
//! document is done by [`crate::core::seed`].

use crate::entities::DataType;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_SEED_PATH: &str = "catalog.toml";

/// Configuration structure representing the entire seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Units of measurement
    #[serde(default)]
    pub measures: Vec<MeasureSeed>,
    /// Categories, parents listed before their children
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    /// Members of enum categories
    #[serde(default)]
    pub enum_values: Vec<EnumValueSeed>,
    /// Parameter definitions
    #[serde(default)]
    pub parameters: Vec<ParameterSeed>,
    /// Parameter grouping links
    #[serde(default)]
    pub aggregates: Vec<AggregateSeed>,
    /// Products
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Parameter values for products or categories
    #[serde(default)]
    pub parameter_values: Vec<ParameterValueSeed>,
}

/// A measure to create
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureSeed {
    /// Full name
    pub name: String,
    /// Unique short code, used by other rows to reference this measure
    pub name_short: String,
}

/// A category to create
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    /// Unique category name
    pub name: String,
    /// Name of the parent category
    #[serde(default)]
    pub parent: Option<String>,
    /// Short code of the default measure
    pub measure: String,
    /// Whether the category is an enumeration
    #[serde(default)]
    pub is_enum: bool,
}

/// A member of an enum category
#[derive(Debug, Clone, Deserialize)]
pub struct EnumValueSeed {
    /// Name of the enum category
    pub category: String,
    /// Code unique within the category
    pub code: String,
    /// Display ordering
    #[serde(default)]
    pub priority: i16,
    /// String payload
    #[serde(default)]
    pub value_str: Option<String>,
    /// Integer payload
    #[serde(default)]
    pub value_int: Option<i64>,
    /// Real payload
    #[serde(default)]
    pub value_real: Option<f64>,
    /// Path payload
    #[serde(default)]
    pub value_path: Option<String>,
}

/// A parameter definition
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSeed {
    /// Human-readable name
    pub name: String,
    /// Unique short code, used by other rows to reference this parameter
    pub name_short: String,
    /// Declared data type
    pub data_type: DataType,
    /// Short code of the measure
    #[serde(default)]
    pub measure: Option<String>,
    /// Name of the enum category, for `enum` parameters
    #[serde(default)]
    pub enum_category: Option<String>,
    /// Lower bound for numeric values
    #[serde(default)]
    pub min_val: Option<i64>,
    /// Upper bound for numeric values
    #[serde(default)]
    pub max_val: Option<i64>,
}

/// A parameter grouping link, both ends referenced by short code
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateSeed {
    /// Grouping parameter
    pub parent: String,
    /// Grouped parameter
    pub param: String,
}

/// A product to create
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    /// Product name, unique within its category
    pub name: String,
    /// Category name
    pub category: String,
    /// Quantity in stock
    #[serde(default)]
    pub amount: i32,
    /// Unit price
    #[serde(default)]
    pub price: f64,
}

/// Reference to a product by category and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ProductRef {
    /// Category name
    pub category: String,
    /// Product name
    pub name: String,
}

/// A parameter value for a product or a category
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterValueSeed {
    /// Short code of the parameter
    pub param: String,
    /// Owning product
    #[serde(default)]
    pub product: Option<ProductRef>,
    /// Name of the owning category
    #[serde(default)]
    pub category: Option<String>,
    /// Code of the enum value within the parameter's enum category
    #[serde(default)]
    pub value_enum: Option<String>,
    /// String value
    #[serde(default)]
    pub value_str: Option<String>,
    /// Integer value
    #[serde(default)]
    pub value_int: Option<i64>,
    /// Real value
    #[serde(default)]
    pub value_real: Option<f64>,
    /// Path value
    #[serde(default)]
    pub value_path: Option<String>,
}

/// Path of the seed file: `CATALOG_SEED_PATH` or `./catalog.toml`.
#[must_use]
pub fn seed_path() -> PathBuf {
    std::env::var("CATALOG_SEED_PATH")
        .map_or_else(|_| PathBuf::from(DEFAULT_SEED_PATH), PathBuf::from)
}

/// Parses a seed document from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or required fields are missing.
pub fn parse_seed(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads the seed document from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading catalog seed from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path_ref.display()),
    })?;
    parse_seed(&contents)
}
