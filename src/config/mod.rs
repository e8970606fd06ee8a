/// Catalog seeding configuration loaded from config.toml
pub mod catalog;

/// Database connection and table creation
pub mod database;
