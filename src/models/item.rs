//! The merged, queryable catalog item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::Gender;

/// Rarity tier assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RarityTier {
    Normal,
    /// Premium club item
    Hc,
    Sellable,
    Nft,
    Rare,
    Ltd,
}

impl RarityTier {
    /// All tiers in classifier rule order (default tier last).
    pub const ALL: [RarityTier; 6] = [
        RarityTier::Hc,
        RarityTier::Sellable,
        RarityTier::Nft,
        RarityTier::Rare,
        RarityTier::Ltd,
        RarityTier::Normal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RarityTier::Normal => "NORMAL",
            RarityTier::Hc => "HC",
            RarityTier::Sellable => "SELLABLE",
            RarityTier::Nft => "NFT",
            RarityTier::Rare => "RARE",
            RarityTier::Ltd => "LTD",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RarityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RarityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown rarity '{}' (expected NORMAL, HC, SELLABLE, NFT, RARE or LTD)", s)
            })
    }
}

/// A color offered for an item, flagged when it needs a club membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub id: String,
    pub club_restricted: bool,
}

/// A part definition merged with its rarity tier and color policy.
///
/// Items are built once per catalog load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub category: String,
    pub part_id: String,
    pub gender: Gender,
    pub rarity: RarityTier,
    /// Number of independently selectable colors (0-3)
    pub color_slot_count: u8,
    pub is_duotone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_id: Option<String>,
    /// Selectable colors of the palette, in palette order
    pub available_colors: Arc<[ColorOption]>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
    /// False for items of hidden (non-selectable) sets
    pub selectable: bool,
    /// Classname of the supplementary record that matched, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
}

impl CatalogItem {
    pub fn available_color_ids(&self) -> impl Iterator<Item = &str> {
        self.available_colors.iter().map(|c| c.id.as_str())
    }

    pub fn is_colorable(&self) -> bool {
        self.color_slot_count > 0
    }
}
