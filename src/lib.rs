//! figurekit - Figure catalog ingestion and figure string codec
//!
//! This library provides functionality to:
//! - Parse the tag-based catalog source document into palettes and sets
//! - Merge supplementary classification records and assign rarity tiers
//! - Resolve palettes, color slots and duotone items per part
//! - Parse, edit and compose canonical figure strings
//! - Query the merged catalog and keep it refreshed behind a TTL cache

pub mod catalog;
pub mod classify;
pub mod cli;
pub mod codec;
pub mod color_policy;
pub mod config;
pub mod correction;
pub mod figuredata;
pub mod furnidata;
pub mod markup;
pub mod models;
pub mod query;
pub mod registry;

pub use catalog::{Catalog, CatalogStore};
pub use codec::{FigureCodec, Selection};
pub use query::{query, CatalogQuery};
