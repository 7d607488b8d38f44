//! Filtering of catalog items for presentation

use crate::catalog::Catalog;
use crate::models::{CatalogItem, Gender, RarityTier};

/// Item filter. Every unset criterion matches all items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: Option<String>,
    /// Requested gender; unisex items match any request
    pub gender: Option<Gender>,
    /// Case-insensitive substring of the display name
    pub search: Option<String>,
    pub rarity: Option<RarityTier>,
    /// Also return items of non-selectable sets
    pub include_hidden: bool,
    pub limit: Option<usize>,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn rarity(mut self, rarity: RarityTier) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single item passes the filter (ignores `limit`).
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_with(item, self.search_term().as_deref())
    }

    fn search_term(&self) -> Option<String> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase)
    }

    fn matches_with(&self, item: &CatalogItem, term: Option<&str>) -> bool {
        if !self.include_hidden && !item.selectable {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != item.category) {
            return false;
        }
        if self.gender.is_some_and(|g| !item.gender.accepts(g)) {
            return false;
        }
        if self.rarity.is_some_and(|r| r != item.rarity) {
            return false;
        }
        term.map_or(true, |t| item.display_name.to_lowercase().contains(t))
    }
}

/// Items matching `query`, in catalog order.
pub fn query<'c>(catalog: &'c Catalog, query: &CatalogQuery) -> Vec<&'c CatalogItem> {
    let term = query.search_term();
    catalog
        .items()
        .iter()
        .filter(|item| query.matches_with(item, term.as_deref()))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect()
}
