//! figurekit - Command-line tool for inspecting figure catalogs and editing figure strings

use std::process::ExitCode;

use figurekit::cli;

fn main() -> ExitCode {
    cli::run()
}
