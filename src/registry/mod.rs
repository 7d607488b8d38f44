//! Registries for palettes and classification records.
//!
//! This module provides:
//! - A unified `Registry` trait for consistent lookup interfaces
//! - `PaletteRegistry` for palettes and their selectable color lists
//! - `ClassificationIndex` for supplementary records with candidate-key lookup

mod classification;
mod palette;
mod traits;

pub use classification::{candidate_classnames, ClassificationIndex};
pub use palette::PaletteRegistry;
pub use traits::Registry;
