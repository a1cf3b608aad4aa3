/// Database configuration and connection management
pub mod database;

/// Catalog seed data loading from a TOML file
pub mod seed;

/// HTTP listener configuration from environment variables
pub mod server;
