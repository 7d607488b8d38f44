//! Figure string commands (parse, edit)

use clap::ArgMatches;
use std::process::ExitCode;

use crate::codec::{FigureCodec, Selection};
use crate::config::FigureConfig;

use super::{load_catalog, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// One `fig edit` flag, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditArg {
    Set(String),
    Remove(String),
    Color(String),
}

/// A parsed edit
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Set { category: String, part_id: String, colors: Option<Vec<String>> },
    Remove { category: String },
    Color { category: String, slot: usize, color: String },
}

/// Interleave the edit flags in command-line order.
pub fn ordered_edits(
    matches: Option<&ArgMatches>,
    set: Vec<String>,
    remove: Vec<String>,
    color: Vec<String>,
) -> Vec<EditArg> {
    let indices = |id: &str| -> Vec<usize> {
        matches.and_then(|m| m.indices_of(id)).map(|i| i.collect()).unwrap_or_default()
    };

    let mut edits: Vec<(usize, EditArg)> = Vec::new();
    let groups = [
        (indices("set"), set.into_iter().map(EditArg::Set).collect::<Vec<_>>()),
        (indices("remove"), remove.into_iter().map(EditArg::Remove).collect()),
        (indices("color"), color.into_iter().map(EditArg::Color).collect()),
    ];
    for (group, (positions, args)) in groups.into_iter().enumerate() {
        for (i, arg) in args.into_iter().enumerate() {
            // Without recorded positions, keep flag groups in declaration order
            let position = positions.get(i).copied().unwrap_or(usize::MAX / 4 * group + i);
            edits.push((position, arg));
        }
    }
    edits.sort_by_key(|(position, _)| *position);
    edits.into_iter().map(|(_, arg)| arg).collect()
}

fn parse_edit(arg: &EditArg) -> Result<Edit, String> {
    match arg {
        EditArg::Set(value) => {
            let mut fields = value.splitn(3, ':');
            let category = fields.next().unwrap_or_default();
            let part_id = fields.next().ok_or_else(|| format!("--set '{}': expected CAT:ID[:COLORS]", value))?;
            let colors = fields
                .next()
                .map(|c| c.split(',').map(str::trim).filter(|c| !c.is_empty()).map(str::to_string).collect());
            Ok(Edit::Set { category: category.to_string(), part_id: part_id.to_string(), colors })
        }
        EditArg::Remove(category) => Ok(Edit::Remove { category: category.clone() }),
        EditArg::Color(value) => {
            let fields: Vec<&str> = value.split(':').collect();
            let [category, slot, color] = fields[..] else {
                return Err(format!("--color '{}': expected CAT:SLOT:COLOR", value));
            };
            let slot = slot.parse().map_err(|_| format!("--color '{}': slot must be a number", value))?;
            Ok(Edit::Color { category: category.to_string(), slot, color: color.to_string() })
        }
    }
}

/// Execute the parse command
pub fn run_parse(config: &FigureConfig, figure: &str, strict: bool) -> ExitCode {
    let (catalog, _) = load_catalog(config);
    let codec = FigureCodec::new(catalog.as_ref());
    let parsed = codec.parse(figure);

    for error in &parsed.invalid {
        eprintln!("Warning: {}", error);
    }

    let output = serde_json::json!({
        "figure": codec.compose(&parsed.selection),
        "selection": parsed.selection,
        "invalid": parsed.invalid,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    if strict && parsed.is_partially_invalid() {
        eprintln!("Error: {} invalid token(s) (--strict)", parsed.invalid.len());
        return ExitCode::from(EXIT_ERROR);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the edit command
pub fn run_edit(config: &FigureConfig, figure: &str, edits: Vec<EditArg>) -> ExitCode {
    let edits = match edits.iter().map(parse_edit).collect::<Result<Vec<_>, _>>() {
        Ok(edits) => edits,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let (catalog, _) = load_catalog(config);
    let codec = FigureCodec::new(catalog.as_ref());
    let parsed = codec.parse(figure);
    for error in &parsed.invalid {
        eprintln!("Warning: {}", error);
    }

    let mut selection: Selection = parsed.selection;
    for edit in edits {
        let result = match edit {
            Edit::Set { category, part_id, colors } => {
                codec.set_part(&mut selection, &category, &part_id, colors.as_deref())
            }
            Edit::Remove { category } => {
                if selection.remove_part(&category).is_none() {
                    eprintln!("Warning: no part selected for category '{}'", category);
                }
                Ok(())
            }
            Edit::Color { category, slot, color } => codec.set_color(&mut selection, &category, slot, &color),
        };
        if let Err(e) = result {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    println!("{}", codec.compose(&selection));
    ExitCode::from(EXIT_SUCCESS)
}
