//! Color slot and palette resolution
//!
//! A part's color policy combines the palette serving its category with the
//! number of independent color slots its set exposes. Slots are counted from
//! the color-index tags on the set's parts: a set whose parts carry tags `1`
//! and `2` is duotone and exposes two slots drawn from the same palette.

use serde::Serialize;

use crate::config::PaletteConfig;
use crate::models::{PartDefinition, SetDefinition};

/// Highest number of color slots a part can expose
pub const MAX_COLOR_SLOTS: u8 = 3;

const SLOT_TAGS: [&str; MAX_COLOR_SLOTS as usize] = ["1", "2", "3"];

/// Resolved color policy of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPolicy {
    pub palette_id: String,
    pub color_slot_count: u8,
    pub is_duotone: bool,
}

/// A set is duotone when some part carries color-index tag `1` and some
/// (possibly the same) part carries tag `2`.
pub fn is_duotone(set: &SetDefinition) -> bool {
    let has = |tag: &str| set.parts.iter().any(|p| p.has_color_index(tag));
    has("1") && has("2")
}

/// Number of color slots `part` exposes within `set`.
///
/// Non-colorable parts have none. Colorable parts get one slot per distinct
/// slot tag found across the set, with at least one.
pub fn color_slot_count(set: &SetDefinition, part: &PartDefinition) -> u8 {
    if !part.colorable {
        return 0;
    }
    let tagged = SLOT_TAGS
        .iter()
        .filter(|tag| set.parts.iter().any(|p| p.has_color_index(tag)))
        .count() as u8;
    tagged.clamp(1, MAX_COLOR_SLOTS)
}

/// Resolve the palette, slot count and duotone flag for a part.
pub fn resolve_color_policy(
    palettes: &PaletteConfig,
    set: &SetDefinition,
    part: &PartDefinition,
) -> ColorPolicy {
    ColorPolicy {
        palette_id: palettes.palette_id_for(&part.category).to_string(),
        color_slot_count: color_slot_count(set, part),
        is_duotone: is_duotone(set),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, colorable: bool, tags: &[&str]) -> PartDefinition {
        PartDefinition {
            category: "ch".to_string(),
            part_id: id.to_string(),
            colorable,
            index: 0,
            color_index_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn set_of(parts: Vec<PartDefinition>) -> SetDefinition {
        SetDefinition { selectable: true, parts, ..Default::default() }
    }

    #[test]
    fn test_duotone_across_distinct_parts() {
        let set = set_of(vec![part("3001", true, &["1"]), part("3002", true, &["2"])]);
        assert!(is_duotone(&set));
        assert_eq!(color_slot_count(&set, &set.parts[0]), 2);
    }

    #[test]
    fn test_duotone_on_a_single_part() {
        let set = set_of(vec![part("3001", true, &["1", "2"])]);
        assert!(is_duotone(&set));
    }

    #[test]
    fn test_only_tag_one_is_not_duotone() {
        let set = set_of(vec![part("210", true, &["1"]), part("211", true, &["1"])]);
        assert!(!is_duotone(&set));
        assert_eq!(color_slot_count(&set, &set.parts[1]), 1);
    }

    #[test]
    fn test_non_colorable_has_no_slots() {
        let set = set_of(vec![part("3001", false, &["1"]), part("3002", true, &["2"])]);
        assert_eq!(color_slot_count(&set, &set.parts[0]), 0);
        assert_eq!(color_slot_count(&set, &set.parts[1]), 2);
    }

    #[test]
    fn test_colorable_without_tags_gets_one_slot() {
        let set = set_of(vec![part("180", true, &["0"])]);
        assert_eq!(color_slot_count(&set, &set.parts[0]), 1);
    }

    #[test]
    fn test_three_slots_maximum() {
        let set = set_of(vec![part("1", true, &["1", "2", "3", "4"])]);
        assert_eq!(color_slot_count(&set, &set.parts[0]), MAX_COLOR_SLOTS);
    }

    #[test]
    fn test_palette_follows_category_domain() {
        let palettes = PaletteConfig::default();
        let mut hair = part("100", true, &["1"]);
        hair.category = "hr".to_string();
        let set = set_of(vec![hair.clone()]);

        let policy = resolve_color_policy(&palettes, &set, &hair);
        assert_eq!(policy, ColorPolicy { palette_id: "2".to_string(), color_slot_count: 1, is_duotone: false });
    }
}
