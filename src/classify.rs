//! Rarity classification
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. premium club set -> `HC`
//! 2. sellable set -> `SELLABLE`
//! 3. record lineage is a known NFT collection -> `NFT`
//! 4. record classname starts with the rare prefix -> `RARE`
//! 5. record classname starts with the limited prefix -> `LTD`
//! 6. otherwise `NORMAL`

use std::collections::HashSet;

use crate::config::ClassificationConfig;
use crate::models::{ClassificationRecord, ClubTier, PartDefinition, RarityTier, SetDefinition};

/// Order-sensitive rarity classifier.
#[derive(Debug, Clone)]
pub struct RarityClassifier {
    nft_collections: HashSet<String>,
    rare_prefix: String,
    ltd_prefix: String,
}

impl Default for RarityClassifier {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default())
    }
}

impl RarityClassifier {
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            nft_collections: config.nft_collections.iter().cloned().collect(),
            rare_prefix: config.rare_prefix.clone(),
            ltd_prefix: config.ltd_prefix.clone(),
        }
    }

    /// Classify one part of a set.
    ///
    /// `record` is the classification record found for the part, if any.
    pub fn classify(
        &self,
        set: &SetDefinition,
        part: &PartDefinition,
        record: Option<&ClassificationRecord>,
    ) -> RarityTier {
        let tier = self.evaluate(set, record);
        tracing::trace!("{}-{} classified as {}", part.category, part.part_id, tier);
        tier
    }

    fn evaluate(&self, set: &SetDefinition, record: Option<&ClassificationRecord>) -> RarityTier {
        if set.club == ClubTier::Premium {
            return RarityTier::Hc;
        }
        if set.sellable {
            return RarityTier::Sellable;
        }
        let Some(record) = record else {
            return RarityTier::Normal;
        };
        if self.nft_collections.contains(&record.lineage) {
            RarityTier::Nft
        } else if record.classname.starts_with(&self.rare_prefix) {
            RarityTier::Rare
        } else if record.classname.starts_with(&self.ltd_prefix) {
            RarityTier::Ltd
        } else {
            RarityTier::Normal
        }
    }
}
