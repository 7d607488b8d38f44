//! Configuration schema types for `figure.toml`
//!
//! Defines the structure and validation rules for catalog, palette,
//! classification and codec settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::correction::CorrectionRule;
use crate::models::PaletteDomain;

/// Catalog loading and caching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the source catalog document (figuredata markup)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub figuredata: Option<PathBuf>,
    /// Path of the supplementary classification document (JSON)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub furnidata: Option<PathBuf>,
    /// How long a successfully loaded catalog stays current
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// How long a degraded (fallback) catalog stays current before retrying
    #[serde(default = "default_retry_after_secs")]
    pub retry_after_secs: u64,
    /// Upper bound on a single document fetch
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Category codes kept in the catalog, in presentation order
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            figuredata: None,
            furnidata: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            retry_after_secs: default_retry_after_secs(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            categories: default_categories(),
        }
    }
}

impl CatalogConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_after(&self) -> Duration {
        Duration::from_secs(self.retry_after_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

fn default_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_retry_after_secs() -> u64 {
    5 * 60
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_categories() -> Vec<String> {
    ["hd", "hr", "ha", "he", "ea", "fa", "ch", "cc", "cp", "ca", "lg", "sh", "wa"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Which palette serves which categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Palette id of the skin domain
    #[serde(default = "default_skin_palette")]
    pub skin: String,
    /// Palette id of the hair domain
    #[serde(default = "default_hair_palette")]
    pub hair: String,
    /// Palette id for every other category
    #[serde(default = "default_general_palette")]
    pub general: String,
    #[serde(default = "default_skin_categories")]
    pub skin_categories: Vec<String>,
    #[serde(default = "default_hair_categories")]
    pub hair_categories: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            skin: default_skin_palette(),
            hair: default_hair_palette(),
            general: default_general_palette(),
            skin_categories: default_skin_categories(),
            hair_categories: default_hair_categories(),
        }
    }
}

impl PaletteConfig {
    /// Color domain of a category.
    pub fn domain_for(&self, category: &str) -> PaletteDomain {
        if self.skin_categories.iter().any(|c| c == category) {
            PaletteDomain::Skin
        } else if self.hair_categories.iter().any(|c| c == category) {
            PaletteDomain::Hair
        } else {
            PaletteDomain::General
        }
    }

    pub fn palette_id(&self, domain: PaletteDomain) -> &str {
        match domain {
            PaletteDomain::Skin => &self.skin,
            PaletteDomain::Hair => &self.hair,
            PaletteDomain::General => &self.general,
        }
    }

    /// Palette id applying to a category.
    pub fn palette_id_for(&self, category: &str) -> &str {
        self.palette_id(self.domain_for(category))
    }
}

fn default_skin_palette() -> String {
    "1".to_string()
}

fn default_hair_palette() -> String {
    "2".to_string()
}

fn default_general_palette() -> String {
    "3".to_string()
}

fn default_skin_categories() -> Vec<String> {
    vec!["hd".to_string()]
}

fn default_hair_categories() -> Vec<String> {
    vec!["hr".to_string()]
}

/// Rarity classification conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Lineage tags that mark an NFT collection
    #[serde(default = "default_nft_collections")]
    pub nft_collections: Vec<String>,
    /// Classname prefix of rare items
    #[serde(default = "default_rare_prefix")]
    pub rare_prefix: String,
    /// Classname prefix of limited items
    #[serde(default = "default_ltd_prefix")]
    pub ltd_prefix: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            nft_collections: default_nft_collections(),
            rare_prefix: default_rare_prefix(),
            ltd_prefix: default_ltd_prefix(),
        }
    }
}

fn default_nft_collections() -> Vec<String> {
    ["nft2025", "nft2024", "nft2023", "nft", "nftmint", "testing"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_rare_prefix() -> String {
    "clothing_r".to_string()
}

fn default_ltd_prefix() -> String {
    "clothing_ltd".to_string()
}

/// Figure string codec settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Color used to pad slots when a palette has no selectable color
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { fallback_color: default_fallback_color() }
    }
}

fn default_fallback_color() -> String {
    "1".to_string()
}

/// Presentation names for categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Overrides keyed by category code
    #[serde(default)]
    pub names: HashMap<String, String>,
}

impl DisplayConfig {
    /// Display name of a category: configured override, built-in name, or
    /// the code itself.
    pub fn name_for<'a>(&'a self, category: &'a str) -> &'a str {
        self.names.get(category).map(|n| n.as_str()).unwrap_or_else(|| builtin_name(category))
    }
}

fn builtin_name(category: &str) -> &str {
    match category {
        "hd" => "Head",
        "hr" => "Hair",
        "ha" => "Hat",
        "he" => "Head Accessory",
        "ea" => "Glasses",
        "fa" => "Mask",
        "ch" => "Shirt",
        "cc" => "Jacket",
        "cp" => "Chest Print",
        "ca" => "Chest Accessory",
        "lg" => "Trousers",
        "sh" => "Shoes",
        "wa" => "Waist Accessory",
        other => other,
    }
}

/// Complete `figure.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub palettes: PaletteConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Category correction rules, first match wins
    #[serde(default)]
    pub corrections: Vec<CorrectionRule>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "corrections[2].max")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "figure.toml: '{}' {}", self.field, self.message)
    }
}

fn is_category_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphabetic())
}

impl FigureConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(ConfigValidationError { field, message: message.to_string() });
        };

        if self.catalog.categories.is_empty() {
            push("catalog.categories".to_string(), "must list at least one category");
        }
        for (i, category) in self.catalog.categories.iter().enumerate() {
            if !is_category_code(category) {
                push(format!("catalog.categories[{}]", i), "must be a non-empty ASCII letter code");
            }
        }
        if self.catalog.cache_ttl_secs == 0 {
            push("catalog.cache_ttl_secs".to_string(), "must be a positive integer");
        }
        if self.catalog.fetch_timeout_ms == 0 {
            push("catalog.fetch_timeout_ms".to_string(), "must be a positive integer");
        }

        for (field, id) in [
            ("palettes.skin", &self.palettes.skin),
            ("palettes.hair", &self.palettes.hair),
            ("palettes.general", &self.palettes.general),
        ] {
            if id.trim().is_empty() {
                push(field.to_string(), "must be a non-empty palette id");
            }
        }
        for category in &self.palettes.skin_categories {
            if self.palettes.hair_categories.contains(category) {
                push(
                    format!("palettes.hair_categories.{}", category),
                    "is already assigned to the skin palette",
                );
            }
        }

        if self.classification.rare_prefix.is_empty() {
            push("classification.rare_prefix".to_string(), "must be non-empty");
        }
        if self.classification.ltd_prefix.is_empty() {
            push("classification.ltd_prefix".to_string(), "must be non-empty");
        }

        let fallback = &self.codec.fallback_color;
        if fallback.is_empty() || !fallback.chars().all(|c| c.is_ascii_digit()) {
            push("codec.fallback_color".to_string(), "must be a numeric color id");
        }

        for (i, rule) in self.corrections.iter().enumerate() {
            if !is_category_code(&rule.from) {
                push(format!("corrections[{}].from", i), "must be a category code");
            }
            if !is_category_code(&rule.to) {
                push(format!("corrections[{}].to", i), "must be a category code");
            } else if !self.catalog.has_category(&rule.to) {
                push(format!("corrections[{}].to", i), "must be one of catalog.categories");
            }
            if rule.min > rule.max {
                push(format!("corrections[{}].min", i), "must not exceed max");
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FigureConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
        assert_eq!(config.catalog.cache_ttl(), Duration::from_secs(86_400));
        assert_eq!(config.palettes.palette_id_for("hd"), "1");
        assert_eq!(config.palettes.palette_id_for("hr"), "2");
        assert_eq!(config.palettes.palette_id_for("ch"), "3");
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: FigureConfig = toml::from_str("[codec]\nfallback_color = \"7\"\n").unwrap();
        assert_eq!(config.codec.fallback_color, "7");
        assert_eq!(config.classification.rare_prefix, "clothing_r");
        assert!(config.corrections.is_empty());
    }

    #[test]
    fn test_corrections_parse_from_toml() {
        let toml = r#"
[[corrections]]
from = "cc"
to = "ha"
min = 3451
max = 3500
"#;
        let config: FigureConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.corrections.len(), 1);
        assert_eq!(config.corrections[0].to, "ha");
        assert!(config.is_valid());
    }

    #[test]
    fn test_validation_reports_every_problem() {
        let mut config = FigureConfig::default();
        config.catalog.fetch_timeout_ms = 0;
        config.codec.fallback_color = "red".to_string();
        config.corrections.push(CorrectionRule {
            from: "cc".to_string(),
            to: "zz".to_string(),
            min: 10,
            max: 5,
        });

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"catalog.fetch_timeout_ms".to_string()));
        assert!(fields.contains(&"codec.fallback_color".to_string()));
        assert!(fields.contains(&"corrections[0].to".to_string()));
        assert!(fields.contains(&"corrections[0].min".to_string()));
    }

    #[test]
    fn test_display_name_override() {
        let mut display = DisplayConfig::default();
        assert_eq!(display.name_for("hr"), "Hair");
        assert_eq!(display.name_for("xx"), "xx");
        display.names.insert("hr".to_string(), "Cabelo".to_string());
        assert_eq!(display.name_for("hr"), "Cabelo");
    }
}
