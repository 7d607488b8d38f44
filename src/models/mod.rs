//! Data models for catalog definitions, classification records and merged items.

use serde::Serialize;

mod classification;
mod item;
mod palette;
mod set;

pub use classification::ClassificationRecord;
pub use item::{CatalogItem, ColorOption, RarityTier};
pub use palette::{Color, Palette, PaletteDomain};
pub use set::{ClubTier, Gender, PartDefinition, SetDefinition};

/// A non-fatal problem found while reading a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
