//! Set and part definitions as declared by the source catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Gender affinity of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unisex,
}

impl Gender {
    /// Lenient conversion from a document attribute.
    ///
    /// Anything that is not a recognizable male/female marker is unisex.
    pub fn from_attr(value: &str) -> Self {
        value.parse().unwrap_or(Gender::Unisex)
    }

    /// Single-letter code used by the source documents.
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unisex => "U",
        }
    }

    /// Whether an item with this affinity is offered to `requested`.
    ///
    /// Unisex items match every request; gendered items only match an equal
    /// request.
    pub fn accepts(self, requested: Gender) -> bool {
        self == Gender::Unisex || self == requested
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "u" | "unisex" => Ok(Gender::Unisex),
            other => Err(format!("unknown gender '{}' (expected M, F or U)", other)),
        }
    }
}

/// Club membership tier required by a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubTier {
    #[default]
    None,
    Premium,
}

impl ClubTier {
    /// Lenient conversion from a `club` attribute; unknown values are `None`.
    pub fn from_attr(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "2" | "hc" | "premium" => ClubTier::Premium,
            _ => ClubTier::None,
        }
    }
}

/// One drawable part of a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDefinition {
    /// Category code (e.g. "hr", "ch")
    pub category: String,
    pub part_id: String,
    pub colorable: bool,
    /// Draw order index
    #[serde(default)]
    pub index: u32,
    /// Raw color-index tags ("1", "2", ...)
    #[serde(default)]
    pub color_index_tags: BTreeSet<String>,
}

impl PartDefinition {
    pub fn has_color_index(&self, tag: &str) -> bool {
        self.color_index_tags.contains(tag)
    }
}

/// A group of parts sharing ownership and selectability flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetDefinition {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    /// Type of the enclosing `settype` block, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub settype: Option<String>,
    pub gender: Gender,
    pub club: ClubTier,
    pub sellable: bool,
    pub selectable: bool,
    pub parts: Vec<PartDefinition>,
}
