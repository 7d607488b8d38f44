//! Canonical figure string codec
//!
//! A figure string lists the chosen part of every category:
//!
//! ```text
//! selection := part ("." part)*
//! part      := category "-" partId ["-" color ("-" color)* "-"]
//! ```
//!
//! e.g. `hd-190-7-.hr-100-7-.ch-3001-66-61-`. The number of colors of a
//! part is fixed by the catalog item's color slot count. Parts the catalog
//! does not know are kept as pass-through entries so that a string survives
//! a parse/compose round trip unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

/// Color slot layout of a known part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPolicy {
    pub slot_count: u8,
    /// Color id used to fill unspecified slots
    pub default_color: String,
}

/// Provides the slot policy of a part.
///
/// `None` means the category or part id is unknown; such parts are handled
/// as pass-through entries.
pub trait SlotPolicySource {
    fn slot_policy(&self, category: &str, part_id: &str) -> Option<SlotPolicy>;
}

impl SlotPolicySource for Catalog {
    fn slot_policy(&self, category: &str, part_id: &str) -> Option<SlotPolicy> {
        let item = self.item(category, part_id)?;
        Some(SlotPolicy {
            slot_count: item.color_slot_count,
            default_color: self.default_color(item).to_string(),
        })
    }
}

/// The chosen part of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartInstance {
    pub category: String,
    pub part_id: String,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Ordered set of part instances, at most one per category.
///
/// Serialized as a plain list; a list naming a category twice does not
/// deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<PartInstance>", try_from = "Vec<PartInstance>")]
pub struct Selection {
    parts: Vec<PartInstance>,
}

impl TryFrom<Vec<PartInstance>> for Selection {
    type Error = SelectionError;

    fn try_from(parts: Vec<PartInstance>) -> Result<Self, Self::Error> {
        for (i, part) in parts.iter().enumerate() {
            if parts[..i].iter().any(|p| p.category == part.category) {
                return Err(SelectionError::DuplicateCategory(part.category.clone()));
            }
        }
        Ok(Self { parts })
    }
}

impl From<Selection> for Vec<PartInstance> {
    fn from(selection: Selection) -> Self {
        selection.parts
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parts in emission order.
    pub fn parts(&self) -> &[PartInstance] {
        &self.parts
    }

    pub fn get(&self, category: &str) -> Option<&PartInstance> {
        self.parts.iter().find(|p| p.category == category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.category.as_str())
    }

    /// Remove a category, closing the gap in the emission order.
    pub fn remove_part(&mut self, category: &str) -> Option<PartInstance> {
        let pos = self.parts.iter().position(|p| p.category == category)?;
        Some(self.parts.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn get_mut(&mut self, category: &str) -> Option<&mut PartInstance> {
        self.parts.iter_mut().find(|p| p.category == category)
    }

    /// Replace in place, or append a new category.
    fn upsert(&mut self, part: PartInstance) {
        match self.get_mut(&part.category) {
            Some(existing) => *existing = part,
            None => self.parts.push(part),
        }
    }
}

/// A token of a figure string that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum FigureTokenError {
    #[error("empty token at position {position}")]
    Empty { position: usize },
    #[error("invalid category in '{token}'")]
    InvalidCategory { token: String },
    #[error("missing or invalid part id in '{token}'")]
    InvalidPartId { token: String },
    #[error("invalid color in '{token}'")]
    InvalidColor { token: String },
    #[error("category repeated in '{token}'")]
    DuplicateCategory { token: String },
}

/// Result of parsing a figure string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFigure {
    pub selection: Selection,
    /// Tokens that were skipped
    pub invalid: Vec<FigureTokenError>,
}

impl ParsedFigure {
    pub fn is_partially_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}

/// A rejected selection edit. The selection is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("no part selected for category '{0}'")]
    NoPart(String),
    #[error("slot {slot} out of range for '{category}' ({slot_count} color slots)")]
    SlotOutOfRange { category: String, slot: usize, slot_count: usize },
    #[error("invalid category '{0}'")]
    InvalidCategory(String),
    #[error("invalid part id '{0}'")]
    InvalidPartId(String),
    #[error("invalid color id '{0}'")]
    InvalidColor(String),
    #[error("category '{0}' selected more than once")]
    DuplicateCategory(String),
}

/// Converts between [`Selection`]s and figure strings.
pub struct FigureCodec<'a, S: SlotPolicySource + ?Sized> {
    source: &'a S,
}

impl<'a, S: SlotPolicySource + ?Sized> FigureCodec<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Compose the figure string of a selection.
    ///
    /// Known parts emit exactly their slot count of colors, padded with the
    /// default color. Pass-through parts emit their colors verbatim.
    pub fn compose(&self, selection: &Selection) -> String {
        selection.parts.iter().map(|part| self.compose_part(part)).collect::<Vec<_>>().join(".")
    }

    fn compose_part(&self, part: &PartInstance) -> String {
        let colors = match self.source.slot_policy(&part.category, &part.part_id) {
            Some(policy) => fit_colors(part.colors.clone(), &policy),
            None => part.colors.clone(),
        };
        if colors.is_empty() {
            format!("{}-{}", part.category, part.part_id)
        } else {
            format!("{}-{}-{}-", part.category, part.part_id, colors.join("-"))
        }
    }

    /// Parse a figure string.
    ///
    /// Invalid tokens are skipped and reported; the rest of the string is
    /// still parsed. A repeated category keeps its first occurrence.
    pub fn parse(&self, figure: &str) -> ParsedFigure {
        let mut parsed = ParsedFigure::default();
        let figure = figure.trim();
        if figure.is_empty() {
            return parsed;
        }

        for (position, token) in figure.split('.').enumerate() {
            match self.parse_token(token, position) {
                Ok(part) if parsed.selection.contains(&part.category) => {
                    tracing::debug!("Skipping repeated category in '{}'", token);
                    parsed.invalid.push(FigureTokenError::DuplicateCategory { token: token.to_string() });
                }
                Ok(part) => parsed.selection.parts.push(part),
                Err(e) => {
                    tracing::debug!("Skipping figure token: {}", e);
                    parsed.invalid.push(e);
                }
            }
        }
        parsed
    }

    fn parse_token(&self, token: &str, position: usize) -> Result<PartInstance, FigureTokenError> {
        if token.is_empty() {
            return Err(FigureTokenError::Empty { position });
        }
        let mut fields = token.split('-');
        let category = fields.next().unwrap_or_default();
        if !is_category(category) {
            return Err(FigureTokenError::InvalidCategory { token: token.to_string() });
        }
        let part_id = fields.next().unwrap_or_default();
        if !is_numeric_id(part_id) {
            return Err(FigureTokenError::InvalidPartId { token: token.to_string() });
        }

        let mut colors = Vec::new();
        for field in fields.filter(|f| !f.is_empty()) {
            if !is_numeric_id(field) {
                return Err(FigureTokenError::InvalidColor { token: token.to_string() });
            }
            colors.push(field.to_string());
        }

        if let Some(policy) = self.source.slot_policy(category, part_id) {
            colors = fit_colors(colors, &policy);
        }
        Ok(PartInstance { category: category.to_string(), part_id: part_id.to_string(), colors })
    }

    /// Choose a part for a category.
    ///
    /// An existing instance is replaced at its position. Without `colors`,
    /// the previous colors of the category are kept up to the new part's
    /// slot count.
    pub fn set_part(
        &self,
        selection: &mut Selection,
        category: &str,
        part_id: &str,
        colors: Option<&[String]>,
    ) -> Result<(), SelectionError> {
        if !is_category(category) {
            return Err(SelectionError::InvalidCategory(category.to_string()));
        }
        if !is_numeric_id(part_id) {
            return Err(SelectionError::InvalidPartId(part_id.to_string()));
        }
        if let Some(bad) = colors.into_iter().flatten().find(|c| !is_numeric_id(c)) {
            return Err(SelectionError::InvalidColor(bad.clone()));
        }

        let colors = match colors {
            Some(colors) => colors.to_vec(),
            None => selection.get(category).map(|p| p.colors.clone()).unwrap_or_default(),
        };
        let colors = match self.source.slot_policy(category, part_id) {
            Some(policy) => fit_colors(colors, &policy),
            None => colors,
        };

        selection.upsert(PartInstance {
            category: category.to_string(),
            part_id: part_id.to_string(),
            colors,
        });
        Ok(())
    }

    /// Change one color slot of a selected part.
    ///
    /// Pass-through parts accept slots within the colors they carry.
    pub fn set_color(
        &self,
        selection: &mut Selection,
        category: &str,
        slot: usize,
        color: &str,
    ) -> Result<(), SelectionError> {
        if !is_numeric_id(color) {
            return Err(SelectionError::InvalidColor(color.to_string()));
        }
        let part = selection.get_mut(category).ok_or_else(|| SelectionError::NoPart(category.to_string()))?;

        let policy = self.source.slot_policy(&part.category, &part.part_id);
        let slot_count = policy.as_ref().map_or(part.colors.len(), |p| usize::from(p.slot_count));
        if slot >= slot_count {
            return Err(SelectionError::SlotOutOfRange { category: category.to_string(), slot, slot_count });
        }

        if let Some(policy) = &policy {
            part.colors = fit_colors(std::mem::take(&mut part.colors), policy);
        }
        part.colors[slot] = color.to_string();
        Ok(())
    }
}

/// Truncate or pad `colors` to the policy's slot count.
fn fit_colors(mut colors: Vec<String>, policy: &SlotPolicy) -> Vec<String> {
    let slots = usize::from(policy.slot_count);
    colors.truncate(slots);
    colors.resize(slots, policy.default_color.clone());
    colors
}

fn is_category(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
