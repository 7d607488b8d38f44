//! Common trait for registries that store named items.

/// Common trait for registries that map string keys to values.
///
/// # Example
///
/// ```
/// use figurekit::models::{Color, Palette};
/// use figurekit::registry::{PaletteRegistry, Registry};
///
/// let mut palette = Palette::new("3");
/// palette.push(Color {
///     id: "61".to_string(),
///     index: 0,
///     club_restricted: false,
///     selectable: true,
///     hex: None,
/// });
///
/// let mut registry = PaletteRegistry::new();
/// registry.register(palette);
///
/// assert!(registry.contains("3"));
/// assert_eq!(registry.len(), 1);
/// ```
pub trait Registry<V> {
    /// Check if an item with the given key exists in the registry.
    fn contains(&self, key: &str) -> bool;

    /// Get an item by key.
    fn get(&self, key: &str) -> Option<&V>;

    /// Get the number of items in the registry.
    fn len(&self) -> usize;

    /// Check if the registry is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all keys in the registry.
    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_>;
}
