//! Parsing of the supplementary classification document
//!
//! Two JSON shapes are accepted:
//!
//! ```text
//! {"roomitemtypes": {"furnitype": [{"classname": "clothing_r_ha_1", "furniline": "rares"}]},
//!  "wallitemtypes": {"furnitype": []}}
//!
//! {"clothing_r_ha_1": {"lineage": "rares", "name": "Crown"}}
//! ```
//!
//! Entries without a classname are skipped and counted.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{ClassificationRecord, Warning};

/// Item type lists scanned in the typed shape
const ITEM_TYPE_LISTS: [&str; 2] = ["roomitemtypes", "wallitemtypes"];

/// Error for a supplementary document that is not usable at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FurnidataError {
    #[error("Invalid classification document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Classification document must be a JSON object")]
    NotAnObject,
}

/// Result of parsing a supplementary document.
#[derive(Debug, Clone, Default)]
pub struct ParsedFurnidata {
    pub records: Vec<ClassificationRecord>,
    /// Number of entries dropped as malformed
    pub skipped: usize,
    pub warnings: Vec<Warning>,
}

impl ParsedFurnidata {
    fn skip(&mut self, message: String) {
        self.skipped += 1;
        self.warnings.push(Warning::new(message));
    }
}

/// Parse a supplementary classification document.
pub fn parse_furnidata(input: &str) -> Result<ParsedFurnidata, FurnidataError> {
    let value: Value = serde_json::from_str(input)?;
    let Value::Object(root) = value else {
        return Err(FurnidataError::NotAnObject);
    };

    let mut parsed = ParsedFurnidata::default();
    if ITEM_TYPE_LISTS.iter().any(|key| root.contains_key(*key)) {
        for key in ITEM_TYPE_LISTS {
            parse_typed_list(&root, key, &mut parsed);
        }
    } else {
        for (classname, entry) in &root {
            let Value::Object(fields) = entry else {
                parsed.skip(format!("Skipping classification entry '{}': not an object", classname));
                continue;
            };
            push_record(&mut parsed, classname, fields);
        }
    }
    Ok(parsed)
}

fn parse_typed_list(root: &Map<String, Value>, key: &str, parsed: &mut ParsedFurnidata) {
    let Some(section) = root.get(key) else {
        return;
    };
    let Some(entries) = section.get("furnitype").and_then(Value::as_array) else {
        parsed.warnings.push(Warning::new(format!("'{}' has no furnitype list", key)));
        return;
    };
    for entry in entries {
        let Value::Object(fields) = entry else {
            parsed.skip(format!("Skipping non-object entry in '{}'", key));
            continue;
        };
        let classname = text(fields, "classname").unwrap_or_default();
        push_record(parsed, &classname, fields);
    }
}

fn push_record(parsed: &mut ParsedFurnidata, classname: &str, fields: &Map<String, Value>) {
    let classname = classname.trim();
    if classname.is_empty() {
        parsed.skip("Skipping classification entry without classname".to_string());
        return;
    }
    let lineage = text(fields, "lineage").or_else(|| text(fields, "furniline")).unwrap_or_default();
    parsed.records.push(ClassificationRecord {
        classname: classname.to_string(),
        lineage,
        description: text(fields, "description"),
        name: text(fields, "name"),
    });
}

/// Non-empty string field.
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_shape() {
        let json = r#"{
            "roomitemtypes": {"furnitype": [
                {"id": 1, "classname": "clothing_r_ha_1", "furniline": "rares", "name": "Crown"},
                {"id": 2, "classname": "clothing_nft_hd_5", "furniline": "nft2024", "description": "Glow"}
            ]},
            "wallitemtypes": {"furnitype": [
                {"id": 3, "classname": "poster_1", "furniline": ""}
            ]}
        }"#;
        let parsed = parse_furnidata(json).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.records[0].name.as_deref(), Some("Crown"));
        assert_eq!(parsed.records[1].lineage, "nft2024");
        assert_eq!(parsed.records[1].description.as_deref(), Some("Glow"));
        assert_eq!(parsed.records[2].lineage, "");
    }

    #[test]
    fn test_flat_shape() {
        let json = r#"{
            "clothing_ltd_ha_3409": {"lineage": "ltd"},
            "ch_210": {"furniline": "nft", "name": "Shirt"}
        }"#;
        let parsed = parse_furnidata(json).unwrap();
        assert_eq!(parsed.records.len(), 2);
        let shirt = parsed.records.iter().find(|r| r.classname == "ch_210").unwrap();
        assert_eq!(shirt.lineage, "nft");
        assert_eq!(shirt.name.as_deref(), Some("Shirt"));
    }

    #[test]
    fn test_entries_without_classname_are_skipped() {
        let json = r#"{"roomitemtypes": {"furnitype": [
            {"classname": ""},
            {"furniline": "rares"},
            "junk",
            {"classname": "ok_1"}
        ]}}"#;
        let parsed = parse_furnidata(json).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(parse_furnidata("<html>"), Err(FurnidataError::Json(_))));
        assert!(matches!(parse_furnidata("[1, 2]"), Err(FurnidataError::NotAnObject)));
    }
}
