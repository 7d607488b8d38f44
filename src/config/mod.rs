//! Configuration for catalog loading, palettes, classification and the codec
//!
//! Provides types and parsing for `figure.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
