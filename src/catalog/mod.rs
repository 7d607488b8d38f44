//! The merged catalog and its lifecycle
//!
//! A [`Catalog`] is built once from a parsed source document and an optional
//! supplementary classification document, then never mutated. Refreshing
//! builds a new catalog; [`CatalogStore`] swaps it in atomically.

pub mod source;
mod store;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::classify::RarityClassifier;
use crate::color_policy::{resolve_color_policy, ColorPolicy};
use crate::config::FigureConfig;
use crate::correction::CorrectionTable;
use crate::figuredata::{parse_figuredata, ParsedFigureData};
use crate::furnidata::{parse_furnidata, ParsedFurnidata};
use crate::models::{CatalogItem, ColorOption, Gender, Palette, PartDefinition, RarityTier, Warning};
use crate::registry::{ClassificationIndex, PaletteRegistry, Registry};

pub use source::{DocumentKind, DocumentSource, Fetcher, FileSource, SourceError, StaticSource};
pub use store::{CatalogStore, StoreStatus};

/// Source document of the built-in seed catalog
pub const SEED_FIGUREDATA: &str = include_str!("seed_figuredata.xml");

/// Error for a catalog that could not be built at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    /// The source document contained no palette and no set
    #[error("Source document contains no palette or set definitions")]
    NoDefinitions,
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Where the published catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrigin {
    /// Freshly loaded from the source document
    Source,
    /// An earlier successful load, kept after a failed refresh
    Cached,
    /// The built-in seed catalog
    Seed,
}

/// Summary of how a catalog was built.
///
/// Where the catalog came from and whether it is a stand-in are tracked by
/// the [`CatalogStore`] publishing it, see [`StoreStatus`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Malformed entries skipped across both documents
    pub skipped: usize,
    pub warnings: Vec<Warning>,
    pub classification_records: usize,
}

/// Item counts of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub duotone: usize,
    pub hidden: usize,
    pub by_rarity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

/// Immutable, merged catalog of selectable parts.
#[derive(Debug, Clone)]
pub struct Catalog {
    palettes: PaletteRegistry,
    items: Vec<CatalogItem>,
    /// First item per (category, part id)
    by_key: HashMap<(String, String), usize>,
    fallback_color: String,
    report: LoadReport,
}

impl Catalog {
    /// Load a catalog from raw documents.
    ///
    /// Malformed entries are skipped and reported. An unusable supplementary
    /// document only drops classification records. Fails only when the
    /// source document yields nothing at all.
    pub fn load(
        figuredata: &str,
        furnidata: Option<&str>,
        config: &FigureConfig,
    ) -> Result<Catalog, LoaderError> {
        let figure = parse_figuredata(figuredata);
        if figure.is_empty() {
            return Err(LoaderError::NoDefinitions);
        }

        let furni = match furnidata.map(parse_furnidata).transpose() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Ignoring classification document: {}", e);
                let mut parsed = ParsedFurnidata::default();
                parsed.warnings.push(Warning::new(e.to_string()));
                Some(parsed)
            }
        };

        let catalog = Self::build(figure, furni, config);
        tracing::info!(
            "Loaded catalog: {} items, {} palettes, {} classification records, {} skipped",
            catalog.items.len(),
            catalog.palettes.len(),
            catalog.report.classification_records,
            catalog.report.skipped
        );
        Ok(catalog)
    }

    /// The built-in seed catalog.
    pub fn seed(config: &FigureConfig) -> Catalog {
        Self::build(parse_figuredata(SEED_FIGUREDATA), None, config)
    }

    /// Merge parsed documents into a catalog.
    pub fn build(
        figure: ParsedFigureData,
        furni: Option<ParsedFurnidata>,
        config: &FigureConfig,
    ) -> Catalog {
        let mut warnings = figure.warnings;
        let mut skipped = figure.skipped;

        let classification: ClassificationIndex = match furni {
            Some(furni) => {
                skipped += furni.skipped;
                warnings.extend(furni.warnings);
                furni.records.into_iter().collect()
            }
            None => ClassificationIndex::new(),
        };
        for warning in &warnings {
            tracing::warn!("{}", warning.message);
        }

        let mut palettes = PaletteRegistry::new();
        for palette in figure.palettes {
            palettes.register(palette);
        }

        let corrections = CorrectionTable::new(config.corrections.clone());
        let classifier = RarityClassifier::new(&config.classification);
        let no_colors: Arc<[ColorOption]> = Arc::from(Vec::new());

        let mut items = Vec::new();
        let mut by_key = HashMap::new();
        let mut seen: HashSet<(String, String, Gender)> = HashSet::new();

        for set in &figure.sets {
            for part in &set.parts {
                let category = corrections.correct(&part.category, &part.part_id);
                if !config.catalog.has_category(category) {
                    tracing::debug!("Ignoring part {}-{}: category not in catalog", category, part.part_id);
                    continue;
                }
                if !seen.insert((category.to_string(), part.part_id.clone(), set.gender)) {
                    continue;
                }

                let part = PartDefinition { category: category.to_string(), ..part.clone() };
                let record = classification.lookup(&part.category, &part.part_id);
                let rarity = classifier.classify(set, &part, record);
                let policy = resolve_color_policy(&config.palettes, set, &part);
                let available_colors = palettes.color_options(&policy.palette_id);

                let display_name = match record.and_then(|r| r.name.clone()) {
                    Some(name) => name,
                    None => format!("{} {}", config.display.name_for(&part.category), part.part_id),
                };

                by_key.entry((part.category.clone(), part.part_id.clone())).or_insert(items.len());
                items.push(CatalogItem {
                    rarity,
                    color_slot_count: policy.color_slot_count,
                    is_duotone: policy.is_duotone,
                    palette_id: available_colors.is_some().then_some(policy.palette_id),
                    available_colors: available_colors.unwrap_or_else(|| Arc::clone(&no_colors)),
                    display_name,
                    gender: set.gender,
                    set_id: set.id.clone(),
                    selectable: set.selectable,
                    classname: record.map(|r| r.classname.clone()),
                    category: part.category,
                    part_id: part.part_id,
                });
            }
        }

        let report = LoadReport {
            skipped,
            warnings,
            classification_records: classification.len(),
        };

        Catalog {
            palettes,
            items,
            by_key,
            fallback_color: config.codec.fallback_color.clone(),
            report,
        }
    }

    /// All items in catalog order, hidden ones included.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// The first item for a category and part id.
    pub fn item(&self, category: &str, part_id: &str) -> Option<&CatalogItem> {
        self.by_key
            .get(&(category.to_string(), part_id.to_string()))
            .and_then(|&idx| self.items.get(idx))
    }

    pub fn palettes(&self) -> &PaletteRegistry {
        &self.palettes
    }

    /// Whether any item belongs to `category`.
    pub fn has_category(&self, category: &str) -> bool {
        self.items.iter().any(|item| item.category == category)
    }

    /// The palette serving the items of `category`.
    pub fn palette_for_category(&self, category: &str) -> Option<&Palette> {
        let item = self.items.iter().find(|item| item.category == category)?;
        self.palettes.get(item.palette_id.as_deref()?)
    }

    /// Color policy of a known part.
    pub fn color_policy(&self, category: &str, part_id: &str) -> Option<ColorPolicy> {
        let item = self.item(category, part_id)?;
        Some(ColorPolicy {
            palette_id: item.palette_id.clone().unwrap_or_default(),
            color_slot_count: item.color_slot_count,
            is_duotone: item.is_duotone,
        })
    }

    /// Default color id for an item: its palette's first selectable color,
    /// else the configured fallback.
    pub fn default_color(&self, item: &CatalogItem) -> &str {
        item.palette_id
            .as_deref()
            .and_then(|id| self.palettes.get(id))
            .and_then(Palette::default_color)
            .map_or(self.fallback_color.as_str(), |color| color.id.as_str())
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item counts per rarity tier and category.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.items.len(),
            by_rarity: RarityTier::ALL.iter().map(|tier| (tier.to_string(), 0)).collect(),
            ..CatalogStats::default()
        };
        for item in &self.items {
            *stats.by_rarity.entry(item.rarity.to_string()).or_default() += 1;
            *stats.by_category.entry(item.category.clone()).or_default() += 1;
            if item.is_duotone {
                stats.duotone += 1;
            }
            if !item.selectable {
                stats.hidden += 1;
            }
        }
        stats
    }
}
