//! Catalog inspection commands (catalog, query, palettes)

use std::process::ExitCode;

use crate::config::FigureConfig;
use crate::models::{Gender, RarityTier};
use crate::query::{query, CatalogQuery};

use super::{load_catalog, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the catalog command
pub fn run_catalog(config: &FigureConfig, json: bool) -> ExitCode {
    let (catalog, status) = load_catalog(config);
    let report = catalog.report();
    let stats = catalog.stats();

    if json {
        let output = serde_json::json!({
            "status": status,
            "report": report,
            "stats": stats,
        });
        return match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    println!("Catalog");
    println!("=======");
    println!("Origin:       {:?}{}", status.origin, if status.degraded { " (degraded)" } else { "" });
    println!("Items:        {}", stats.total);
    println!("Hidden:       {}", stats.hidden);
    println!("Duotone:      {}", stats.duotone);
    println!("Palettes:     {}", catalog.palettes().iter().count());
    println!("Records:      {}", report.classification_records);
    println!("Skipped:      {}", report.skipped);
    println!();
    println!("By rarity:");
    for tier in RarityTier::ALL {
        let count = stats.by_rarity.get(tier.as_str()).copied().unwrap_or(0);
        println!("  {:<10} {}", tier.as_str(), count);
    }
    println!();
    println!("By category:");
    for (category, count) in &stats.by_category {
        println!("  {:<4} {:<18} {}", category, config.display.name_for(category), count);
    }
    if !report.warnings.is_empty() {
        println!();
        println!("Warnings: {}", report.warnings.len());
        for warning in &report.warnings {
            println!("  - {}", warning.message);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the query command
pub fn run_query(
    config: &FigureConfig,
    category: Option<String>,
    gender: Option<&str>,
    search: Option<String>,
    rarity: Option<&str>,
    include_hidden: bool,
    limit: Option<usize>,
) -> ExitCode {
    let gender = match gender.map(str::parse::<Gender>).transpose() {
        Ok(gender) => gender,
        Err(e) => {
            eprintln!("Error: --gender: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let rarity = match rarity.map(str::parse::<RarityTier>).transpose() {
        Ok(rarity) => rarity,
        Err(e) => {
            eprintln!("Error: --rarity: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let filter = CatalogQuery { category, gender, search, rarity, include_hidden, limit };
    let (catalog, _) = load_catalog(config);

    for item in query(&catalog, &filter) {
        match serde_json::to_string(item) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the palettes command
pub fn run_palettes(config: &FigureConfig) -> ExitCode {
    let (catalog, _) = load_catalog(config);

    for palette in catalog.palettes().iter() {
        println!("Palette {} ({} colors)", palette.id, palette.len());
        for color in palette.colors() {
            let mut flags = Vec::new();
            if color.selectable {
                flags.push("selectable");
            }
            if color.club_restricted {
                flags.push("club");
            }
            println!(
                "  {:<6} {:<8} {}",
                color.id,
                color.hex.as_deref().unwrap_or("-"),
                flags.join(",")
            );
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
