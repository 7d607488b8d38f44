//! Supplementary per-part metadata keyed by synthetic classname.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Synthetic classname, e.g. `clothing_ltd_ha_3409`
    pub classname: String,
    /// Collection tag the item was released under
    #[serde(default)]
    pub lineage: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Human readable name, preferred as the item's display name
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}
