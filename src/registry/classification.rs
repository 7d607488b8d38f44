//! Classification records indexed by synthetic classname.

use std::collections::HashMap;

use crate::models::ClassificationRecord;

use super::traits::Registry;

/// Candidate classnames for a part, in lookup order.
///
/// The supplementary document does not key records consistently, so a
/// lookup tries the plain `category_partId` form first and then the
/// `clothing_` prefixed variants.
pub fn candidate_classnames(category: &str, part_id: &str) -> [String; 5] {
    [
        format!("{}_{}", category, part_id),
        format!("clothing_{}_{}", category, part_id),
        format!("clothing_{}_{}_special", category, part_id),
        format!("clothing_{}_{}_hc", category, part_id),
        format!("clothing_{}_{}_rare", category, part_id),
    ]
}

/// Index of classification records.
#[derive(Debug, Clone, Default)]
pub struct ClassificationIndex {
    records: HashMap<String, ClassificationRecord>,
}

impl ClassificationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A later record with the same classname replaces the
    /// earlier one.
    pub fn insert(&mut self, record: ClassificationRecord) {
        self.records.insert(record.classname.clone(), record);
    }

    /// Find the record for a part, trying every candidate classname in order.
    pub fn lookup(&self, category: &str, part_id: &str) -> Option<&ClassificationRecord> {
        candidate_classnames(category, part_id).iter().find_map(|name| self.records.get(name))
    }
}

impl FromIterator<ClassificationRecord> for ClassificationIndex {
    fn from_iter<I: IntoIterator<Item = ClassificationRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

impl Registry<ClassificationRecord> for ClassificationIndex {
    fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&ClassificationRecord> {
        self.records.get(key)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(self.records.keys())
    }
}
