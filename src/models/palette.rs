//! Palette and color types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single color entry of a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Color id as used in figure strings (e.g. "61")
    pub id: String,
    /// Ordering index declared by the source document
    #[serde(default)]
    pub index: u32,
    /// Only available to premium club members
    #[serde(default)]
    pub club_restricted: bool,
    /// Whether the color may be picked in an editor
    #[serde(default)]
    pub selectable: bool,
    /// Hex payload of the color element, when present
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hex: Option<String>,
}

/// The color domain a palette serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteDomain {
    /// Skin tones (body and face categories)
    Skin,
    /// Hair tones
    Hair,
    /// Everything else
    General,
}

impl fmt::Display for PaletteDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaletteDomain::Skin => "skin",
            PaletteDomain::Hair => "hair",
            PaletteDomain::General => "general",
        };
        write!(f, "{}", s)
    }
}

/// An ordered palette whose color ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub id: String,
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), colors: Vec::new() }
    }

    /// Append a color in document order.
    ///
    /// Returns `false` and leaves the palette untouched if a color with the
    /// same id is already present.
    pub fn push(&mut self, color: Color) -> bool {
        if self.get(&color.id).is_some() {
            return false;
        }
        self.colors.push(color);
        true
    }

    /// All colors in palette order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, id: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.id == id)
    }

    /// Selectable colors in palette order.
    pub fn selectable(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter().filter(|c| c.selectable)
    }

    /// The first selectable color, used to pad under-specified color slots.
    pub fn default_color(&self) -> Option<&Color> {
        self.selectable().next()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
