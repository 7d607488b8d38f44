//! Data-driven category corrections
//!
//! Some catalog sources file parts under the wrong category. Corrections are
//! expressed as `(from category, id range) -> category` rules read from
//! configuration; the first matching rule wins. The table is empty by default
//! because none of the known ranges come from an authoritative source.

use serde::{Deserialize, Serialize};

/// Remap parts of category `from` whose numeric id lies in `min..=max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRule {
    pub from: String,
    pub to: String,
    pub min: u32,
    pub max: u32,
}

impl CorrectionRule {
    pub fn matches(&self, category: &str, id: u32) -> bool {
        self.from == category && self.min <= id && id <= self.max
    }
}

/// Ordered correction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionTable {
    rules: Vec<CorrectionRule>,
}

impl CorrectionTable {
    pub fn new(rules: Vec<CorrectionRule>) -> Self {
        Self { rules }
    }

    /// The corrected category for a part.
    ///
    /// Parts with non-numeric ids are never corrected.
    pub fn correct<'a>(&'a self, category: &'a str, part_id: &str) -> &'a str {
        let Ok(id) = part_id.parse::<u32>() else {
            return category;
        };
        match self.rules.iter().find(|rule| rule.matches(category, id)) {
            Some(rule) => {
                tracing::debug!("Correcting {}-{} to category '{}'", category, part_id, rule.to);
                &rule.to
            }
            None => category,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
