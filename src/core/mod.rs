/// Parameter grouping links
pub mod aggregate;
/// Category CRUD and tree-shape rules
pub mod category;
/// Members of enum categories
pub mod enum_value;
/// Product-over-category parameter value resolution
pub mod inheritance;
/// Units of measurement
pub mod measure;
/// Typed attribute definitions
pub mod parameter;
/// Parameter values bound to products or categories
pub mod parameter_value;
/// Catalog products
pub mod product;
/// Read-only catalog reports
pub mod report;
/// Applying the seed document
pub mod seed;
/// Category tree walks over a snapshot of the table
pub mod tree;
/// Write-time invariant checks
pub mod validation;
