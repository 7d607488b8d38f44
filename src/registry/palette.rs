//! Palette registry keyed by palette id.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{ColorOption, Palette};

use super::traits::Registry;

/// Registry of palettes in document order.
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    palettes: HashMap<String, Palette>,
    order: Vec<String>,
    /// Selectable color lists, shared by every item using the palette
    options: HashMap<String, Arc<[ColorOption]>>,
}

impl PaletteRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a palette.
    ///
    /// If a palette with the same id already exists, it is replaced and keeps
    /// its original position.
    pub fn register(&mut self, palette: Palette) {
        let options: Arc<[ColorOption]> = palette
            .selectable()
            .map(|c| ColorOption { id: c.id.clone(), club_restricted: c.club_restricted })
            .collect();
        if !self.palettes.contains_key(&palette.id) {
            self.order.push(palette.id.clone());
        }
        self.options.insert(palette.id.clone(), options);
        self.palettes.insert(palette.id.clone(), palette);
    }

    /// Palettes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.order.iter().filter_map(|id| self.palettes.get(id))
    }

    /// Selectable colors of a palette in palette order, club colors flagged.
    pub fn color_options(&self, id: &str) -> Option<Arc<[ColorOption]>> {
        self.options.get(id).cloned()
    }
}

impl Registry<Palette> for PaletteRegistry {
    fn contains(&self, key: &str) -> bool {
        self.palettes.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&Palette> {
        self.palettes.get(key)
    }

    fn len(&self) -> usize {
        self.palettes.len()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(self.order.iter())
    }
}
