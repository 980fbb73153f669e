/// Database connection and schema bootstrap
pub mod database;

/// Application settings from config.toml and the environment
pub mod settings;
