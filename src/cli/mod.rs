//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod catalog;
mod figure;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::catalog::{Catalog, CatalogStore, FileSource, StoreStatus};
use crate::config::{load_config, merge_cli_overrides, CliOverrides, FigureConfig};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// figurekit - Inspect figure catalogs and edit figure strings
#[derive(Parser)]
#[command(name = "fig")]
#[command(about = "figurekit - Inspect figure catalogs and edit figure strings")]
#[command(version)]
pub struct Cli {
    /// Path to figure.toml (default: discovered from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Source catalog document (overrides [catalog].figuredata)
    #[arg(long, global = true)]
    pub figuredata: Option<PathBuf>,

    /// Classification document (overrides [catalog].furnidata)
    #[arg(long, global = true)]
    pub furnidata: Option<PathBuf>,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the catalog and print statistics and the load report
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog items as JSON lines
    Query {
        /// Only items of this category (e.g. hd, hr, ch)
        #[arg(long)]
        category: Option<String>,

        /// Requested gender: M, F or U
        #[arg(long)]
        gender: Option<String>,

        /// Case-insensitive display name search
        #[arg(long)]
        search: Option<String>,

        /// Only items of this rarity tier (NORMAL, HC, SELLABLE, NFT, RARE, LTD)
        #[arg(long)]
        rarity: Option<String>,

        /// Include items of non-selectable sets
        #[arg(long)]
        include_hidden: bool,

        /// Maximum number of items
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Parse a figure string and print the selection as JSON
    Parse {
        /// Figure string, e.g. hd-190-7-.hr-100-7-
        figure: String,

        /// Fail when any token is invalid
        #[arg(long)]
        strict: bool,
    },

    /// Apply edits to a figure string and print the result
    Edit {
        /// Figure string to edit
        figure: String,

        /// Choose a part: CATEGORY:PART[:COLOR,COLOR...]
        #[arg(long, value_name = "CAT:ID[:COLORS]")]
        set: Vec<String>,

        /// Remove a category
        #[arg(long, value_name = "CAT")]
        remove: Vec<String>,

        /// Change one color slot: CATEGORY:SLOT:COLOR
        #[arg(long, value_name = "CAT:SLOT:COLOR")]
        color: Vec<String>,
    },

    /// List palettes and their colors
    Palettes,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    init_logging(cli.verbose);

    let overrides = CliOverrides {
        figuredata: cli.figuredata.clone(),
        furnidata: cli.furnidata.clone(),
        ..CliOverrides::default()
    };
    let config = match load_config(cli.config.as_deref()) {
        Ok(mut config) => {
            merge_cli_overrides(&mut config, &overrides);
            config
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match cli.command {
        Commands::Catalog { json } => catalog::run_catalog(&config, json),
        Commands::Query { category, gender, search, rarity, include_hidden, limit } => {
            catalog::run_query(
                &config,
                category,
                gender.as_deref(),
                search,
                rarity.as_deref(),
                include_hidden,
                limit,
            )
        }
        Commands::Parse { figure, strict } => figure::run_parse(&config, &figure, strict),
        Commands::Edit { figure, set, remove, color } => {
            let edits = figure::ordered_edits(edit_matches(&matches), set, remove, color);
            figure::run_edit(&config, &figure, edits)
        }
        Commands::Palettes => catalog::run_palettes(&config),
    }
}

fn edit_matches(matches: &ArgMatches) -> Option<&ArgMatches> {
    matches.subcommand_matches("edit")
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from `warn`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the catalog configured for this run.
///
/// Falls back to the seed catalog when no document is configured or the
/// document cannot be read.
pub(crate) fn load_catalog(config: &FigureConfig) -> (Arc<Catalog>, StoreStatus) {
    let source = Arc::new(FileSource::from_config(&config.catalog));
    let store = CatalogStore::new(source, config.clone());
    let status = store.refresh();
    (store.current(), status)
}
